use serde::Serialize;

use crate::consensus::ConsensusRow;

use super::{BlankFilterConfig, BlankSet, MissingValues};

/// Split of consensus columns into blank and sample columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Column indices of blank files
    pub blank_columns: Vec<usize>,
    /// Column indices of sample files
    pub sample_columns: Vec<usize>,
}

impl Partition {
    /// Classify the given column file names against a blank set.
    ///
    /// Only the first `n_real` columns take part; any further columns are
    /// padding added for grouping and belong to neither side.
    pub fn from_columns(columns: &[&str], n_real: usize, blanks: &BlankSet) -> Self {
        let mut partition = Partition::default();
        for (index, name) in columns.iter().enumerate().take(n_real) {
            if blanks.contains(name) {
                partition.blank_columns.push(index);
            } else {
                partition.sample_columns.push(index);
            }
        }
        partition
    }
}

/// Blank filter verdict for one consensus row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowScore {
    /// Consensus id
    pub id: u64,
    /// Mean blank intensity
    pub avg_blank: Option<f64>,
    /// Mean sample intensity
    pub avg_sample: Option<f64>,
    /// `(avg_blank + 1) / (avg_sample + 1)`, missing if either average is
    pub ratio: Option<f64>,
    /// Whether the row is real signal
    pub is_real: bool,
}

/// Smoothed blank/sample ratio.
///
/// Returns `None` when either average is missing or the quotient is NaN.
pub fn blank_ratio(avg_blank: Option<f64>, avg_sample: Option<f64>) -> Option<f64> {
    let ratio = (avg_blank? + 1.0) / (avg_sample? + 1.0);
    (!ratio.is_nan()).then_some(ratio)
}

/// Mean intensity over the given columns of a row under a missing-value policy
pub fn partition_mean(
    intensities: &[Option<f64>],
    columns: &[usize],
    policy: MissingValues,
) -> Option<f64> {
    if columns.is_empty() {
        return match policy {
            MissingValues::Propagate => None,
            MissingValues::Zero => Some(0.0),
        };
    }

    let mut sum = 0.0;
    for &column in columns {
        let value = intensities.get(column).copied().flatten();
        match (value, policy) {
            (Some(v), _) => sum += v,
            (None, MissingValues::Zero) => {}
            (None, MissingValues::Propagate) => return None,
        }
    }
    Some(sum / columns.len() as f64)
}

/// Score every consensus row against the cutoff
pub fn score_rows(
    rows: &[ConsensusRow],
    partition: &Partition,
    config: &BlankFilterConfig,
) -> Vec<RowScore> {
    rows.iter()
        .map(|row| {
            let avg_blank =
                partition_mean(&row.intensities, &partition.blank_columns, config.missing_values);
            let avg_sample =
                partition_mean(&row.intensities, &partition.sample_columns, config.missing_values);
            let ratio = blank_ratio(avg_blank, avg_sample);

            RowScore {
                id: row.id,
                avg_blank,
                avg_sample,
                ratio,
                is_real: ratio.is_some_and(|r| r < config.cutoff),
            }
        })
        .collect()
}
