use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::crawler::TerminalRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("No winning paths to summarize")]
    NoWinningRecords,

    #[error("Records contain no followed links")]
    NoHops,
}

/// Summary of path lengths (links followed) over winning records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStatistics {
    /// Share of all followed links that belong to winning paths
    pub win_fraction: f64,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample variance, `None` when there is a single winning path
    pub variance: Option<f64>,
    pub wins: usize,
    pub fails: usize,
}

/// Computes path statistics. Refuses to summarize a batch without winning paths.
pub fn analyze(records: &[TerminalRecord]) -> Result<PathStatistics, StatsError> {
    let mut win_lengths: Vec<usize> = records.iter().filter(|r| r.is_win()).map(|r| r.hops()).collect();
    if win_lengths.is_empty() {
        return Err(StatsError::NoWinningRecords);
    }

    let win_hops: usize = win_lengths.iter().sum();
    let fail_hops: usize = records.iter().filter(|r| !r.is_win()).map(|r| r.hops()).sum();
    if win_hops + fail_hops == 0 {
        return Err(StatsError::NoHops);
    }

    win_lengths.sort_unstable();
    let count = win_lengths.len();
    let mean = win_hops as f64 / count as f64;
    let median = if count % 2 == 0 {
        (win_lengths[count / 2 - 1] + win_lengths[count / 2]) as f64 / 2.0
    } else {
        win_lengths[count / 2] as f64
    };
    let variance = (count > 1).then(|| {
        win_lengths.iter().map(|&len| (len as f64 - mean).powi(2)).sum::<f64>() / (count - 1) as f64
    });

    Ok(PathStatistics {
        win_fraction: win_hops as f64 / (win_hops + fail_hops) as f64,
        min: win_lengths[0],
        max: win_lengths[count - 1],
        mean,
        median,
        variance,
        wins: count,
        fails: records.len() - count,
    })
}

impl fmt::Display for PathStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variance = match self.variance {
            Some(v) => v.to_string(),
            None => "n/a".to_string(),
        };
        writeln!(f, "Winning paths: {}, failed paths: {}", self.wins, self.fails)?;
        writeln!(f, "Percentage of pages leading to the target: {}", self.win_fraction)?;
        write!(
            f,
            "Distribution of paths leading to the target: min {}, max {}, mean {}, median {}, var {}",
            self.min, self.max, self.mean, self.median, variance
        )
    }
}
