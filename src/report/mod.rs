//! Presentation of ranked seasons
//!
//! Text tables for the terminal and an SVG scatter plot.

pub mod plot;
pub mod table;

pub use plot::{render_scatter_svg, save_scatter};
pub use table::{format_csv, format_json, format_table, format_tiers, no_data_message, title};
