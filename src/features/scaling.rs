//! Min-max feature scaling

/// Per-feature min-max normalization to [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxNormalization<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> MinMaxNormalization<D> {
    /// Compute bounds from a set of feature rows
    pub fn fit(rows: &[[f64; D]]) -> Self {
        let mut min = [f64::INFINITY; D];
        let mut max = [f64::NEG_INFINITY; D];

        for row in rows {
            for j in 0..D {
                min[j] = min[j].min(row[j]);
                max[j] = max[j].max(row[j]);
            }
        }

        if rows.is_empty() {
            min = [0.0; D];
            max = [0.0; D];
        }

        MinMaxNormalization { min, max }
    }

    /// Scale one row. A feature with no spread maps to 0.
    pub fn normalize(&self, row: &[f64; D]) -> [f64; D] {
        let mut scaled = [0.0; D];
        for j in 0..D {
            let range = self.max[j] - self.min[j];
            if range > 0.0 {
                scaled[j] = (row[j] - self.min[j]) / range;
            }
        }
        scaled
    }

    /// Fit on `rows` and scale them in one pass
    pub fn fit_transform(rows: &[[f64; D]]) -> (Self, Vec<[f64; D]>) {
        let norm = Self::fit(rows);
        let scaled = rows.iter().map(|row| norm.normalize(row)).collect();
        (norm, scaled)
    }
}
