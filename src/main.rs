//! Season Tiers CLI
//!
//! Groups a team's seasons into performance tiers with k-means clustering.

use clap::{Parser, Subcommand};
use tiers::{Config, Result};

#[derive(Parser)]
#[command(name = "tiers")]
#[command(about = "Rank a team's seasons into performance tiers", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "tiers.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the team's seasons and print the ranked table
    Analyze {
        /// Match data file
        #[arg(long)]
        file: Option<String>,
        /// Team name, matched exactly
        #[arg(long)]
        team: Option<String>,
        /// First season (inclusive)
        #[arg(long)]
        start: Option<i32>,
        /// Last season (inclusive)
        #[arg(long)]
        end: Option<i32>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
        /// Scatter plot output path (SVG)
        #[arg(long)]
        plot: Option<String>,
        /// Skip the scatter plot
        #[arg(long)]
        no_plot: bool,
    },
    /// Show a summary of the match data file
    Status {
        /// Match data file
        #[arg(long)]
        file: Option<String>,
    },
    /// List teams with their match counts
    Teams {
        /// Match data file
        #[arg(long)]
        file: Option<String>,
    },
    /// Write a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Analyze {
            file,
            team,
            start,
            end,
            format,
            plot,
            no_plot,
        } => {
            let mut config = config;
            if let Some(f) = file {
                config.analysis.file_path = f;
            }
            if let Some(t) = team {
                config.analysis.team = t;
            }
            if let Some(s) = start {
                config.analysis.start_year = s;
            }
            if let Some(e) = end {
                config.analysis.end_year = e;
            }
            if let Some(p) = plot {
                config.plot.output_path = p;
            }
            if no_plot {
                config.plot.enabled = false;
            }
            commands::analyze(&config, format)
        }
        Commands::Status { file } => commands::status(&config, file),
        Commands::Teams { file } => commands::teams(&config, file),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use tiers::data::{load_matches, DatasetSummary, LoadedMatches};
    use tiers::pipeline;
    use tiers::report;

    fn load(config: &Config, file: Option<String>) -> Result<(String, LoadedMatches)> {
        let path = file.unwrap_or_else(|| config.analysis.file_path.clone());
        let loaded = load_matches(&path, config.data.delimiter)?;
        Ok((path, loaded))
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to set the team, seasons and data file", config_path);
        println!("  2. Run 'tiers status' to check the match data");
        println!("  3. Run 'tiers analyze' to rank the seasons");

        Ok(())
    }

    pub fn analyze(config: &Config, format: OutputFormat) -> Result<()> {
        let analysis = &config.analysis;
        let loaded = load_matches(&analysis.file_path, config.data.delimiter)?;

        let outcome = pipeline::analyze(&loaded.matches, config)?;
        let Some(clustering) = outcome.clustering() else {
            println!("{}", report::no_data_message(analysis));
            return Ok(());
        };

        match format {
            OutputFormat::Table => {
                println!("{}\n", report::title(analysis));
                print!("{}", report::format_table(&clustering.seasons));
                println!();
                print!("{}", report::format_tiers(&clustering.tiers));
                println!("Inertia (scaled): {:.4}", clustering.inertia);
            }
            OutputFormat::Json => {
                println!("{}", report::format_json(analysis, clustering)?);
            }
            OutputFormat::Csv => {
                print!("{}", report::format_csv(&clustering.seasons)?);
            }
        }

        if config.plot.enabled {
            report::save_scatter(
                clustering,
                &report::title(analysis),
                &config.plot.output_path,
                (config.plot.width, config.plot.height),
            )?;
        }

        Ok(())
    }

    pub fn status(config: &Config, file: Option<String>) -> Result<()> {
        let (path, loaded) = load(config, file)?;
        let summary = DatasetSummary::from_matches(&loaded.matches);
        let report = &loaded.report;

        println!("Dataset Status");
        println!("───────────────────────────────");
        println!("  Path:     {}", path);
        println!("  Matches:  {}", summary.match_count);
        println!("  Teams:    {}", summary.team_count());
        if let (Some(earliest), Some(latest)) = (summary.earliest_season, summary.latest_season) {
            println!("  Seasons:  {} to {}", earliest, latest);
        }
        if report.has_warnings() {
            println!(
                "  Invalid:  {} cells (Season {}, HG {}, AG {})",
                report.missing_cells(),
                report.missing_season,
                report.missing_home_goals,
                report.missing_away_goals
            );
        }

        Ok(())
    }

    pub fn teams(config: &Config, file: Option<String>) -> Result<()> {
        let (_, loaded) = load(config, file)?;
        let summary = DatasetSummary::from_matches(&loaded.matches);

        println!("{:<30} {:>8}", "Team", "Matches");
        println!("{}", "-".repeat(39));
        for (team, count) in summary.teams_by_matches() {
            println!("{:<30} {:>8}", team, count);
        }
        println!("\n{} teams", summary.team_count());

        Ok(())
    }
}
