//! Summary statistics for paired comparison data.
//!
//! Error metrics ([`Statistic::Rmse`], [`Statistic::Mue`]) are defined for any non-empty
//! sample. Correlation metrics ([`Statistic::R2`], [`Statistic::Rho`], [`Statistic::Ktau`])
//! are numerically undefined for fewer than [`MIN_CORRELATION_POINTS`] points or when an
//! axis has no spread; those cases surface as [`StatisticsError::Degenerate`], which callers
//! may recover from by dropping the correlation metrics.

pub mod bootstrap;
pub mod metrics;

use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest sample on which correlation statistics are computed.
pub const MIN_CORRELATION_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Root-mean-square error.
    Rmse,
    /// Mean unsigned error.
    Mue,
    /// Coefficient of determination (squared Pearson correlation).
    R2,
    /// Spearman rank correlation.
    Rho,
    /// Kendall rank correlation (tau-b).
    Ktau,
}

static STATISTIC_NAMES: Map<&'static str, Statistic> = phf_map! {
    "RMSE" => Statistic::Rmse, "rmse" => Statistic::Rmse,
    "MUE" => Statistic::Mue, "mue" => Statistic::Mue, "MAE" => Statistic::Mue,
    "R2" => Statistic::R2, "r2" => Statistic::R2,
    "rho" => Statistic::Rho, "RHO" => Statistic::Rho, "Rho" => Statistic::Rho,
    "KTAU" => Statistic::Ktau, "ktau" => Statistic::Ktau, "tau" => Statistic::Ktau,
};

impl Statistic {
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Rmse => "RMSE",
            Statistic::Mue => "MUE",
            Statistic::R2 => "R2",
            Statistic::Rho => "rho",
            Statistic::Ktau => "KTAU",
        }
    }

    /// Whether the statistic measures correlation and may be undefined on small samples.
    pub fn is_correlation(&self) -> bool {
        matches!(self, Statistic::R2 | Statistic::Rho | Statistic::Ktau)
    }

    /// Evaluates the statistic on paired samples.
    pub fn compute(&self, x: &[f64], y: &[f64]) -> Result<f64, StatisticsError> {
        match self {
            Statistic::Rmse => metrics::rmse(x, y),
            Statistic::Mue => metrics::mue(x, y),
            Statistic::R2 => metrics::r_squared(x, y),
            Statistic::Rho => metrics::spearman_rho(x, y),
            Statistic::Ktau => metrics::kendall_tau(x, y),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Statistic {
    type Err = StatisticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATISTIC_NAMES
            .get(s.trim())
            .copied()
            .ok_or_else(|| StatisticsError::UnknownStatistic(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneracyReason {
    InsufficientPoints { found: usize, required: usize },
    ZeroVariance,
}

impl fmt::Display for DegeneracyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegeneracyReason::InsufficientPoints { found, required } => write!(
                f,
                "{} paired points available, at least {} required",
                found, required
            ),
            DegeneracyReason::ZeroVariance => f.write_str("one axis has zero variance"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("Cannot compute statistics on an empty sample")]
    EmptySample,
    #[error("Paired samples differ in length ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },
    #[error("{statistic} is undefined: {reason}")]
    Degenerate {
        statistic: Statistic,
        reason: DegeneracyReason,
    },
    #[error("Unknown statistic '{0}'. Expected one of RMSE, MUE, R2, rho, KTAU.")]
    UnknownStatistic(String),
}

impl StatisticsError {
    /// Whether the error stems from a numerically undefined correlation on a small sample.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, StatisticsError::Degenerate { .. })
    }
}

/// An ordered, duplicate-free selection of statistics to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticSet(Vec<Statistic>);

impl StatisticSet {
    pub fn new(statistics: impl IntoIterator<Item = Statistic>) -> Self {
        let mut selected = Vec::new();
        for statistic in statistics {
            if !selected.contains(&statistic) {
                selected.push(statistic);
            }
        }
        Self(selected)
    }

    /// RMSE, MUE, R² and Spearman ρ.
    pub fn full() -> Self {
        Self::new([
            Statistic::Rmse,
            Statistic::Mue,
            Statistic::R2,
            Statistic::Rho,
        ])
    }

    /// The statistics that remain defined on any non-empty sample: RMSE and MUE.
    pub fn reduced() -> Self {
        Self::new([Statistic::Rmse, Statistic::Mue])
    }

    /// Parses statistic names such as `["RMSE", "MUE", "R2", "rho"]`.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, StatisticsError> {
        names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = Statistic> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, statistic: Statistic) -> bool {
        self.0.contains(&statistic)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
