use thiserror::Error;

use crate::core::statistics::StatisticsError;
use std::path::PathBuf;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimationError {
    #[error("Free-energy map is singular: {unknowns} unknowns could not be resolved")]
    Singular { unknowns: usize },

    #[error("Measurement {from}->{to} has a non-finite value or uncertainty")]
    NonFiniteMeasurement { from: String, to: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to draw '{path}': {message}")]
    Drawing { path: PathBuf, message: String },

    #[error("Cannot create output directory for '{path}': {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Statistics failed for report '{report}': {source}")]
    Statistics {
        report: &'static str,
        #[source]
        source: StatisticsError,
    },

    #[error("Absolute-value estimation failed: {source}")]
    Estimation {
        #[from]
        source: EstimationError,
    },

    #[error("Rendering failed: {source}")]
    Render {
        #[from]
        source: RenderError,
    },
}

impl ReportError {
    /// Whether the failure is a numerically undefined correlation statistic.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ReportError::Statistics { source, .. } if source.is_degenerate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::statistics::{DegeneracyReason, Statistic};

    #[test]
    fn degenerate_statistics_are_recognized() {
        let error = ReportError::Statistics {
            report: "dG",
            source: StatisticsError::Degenerate {
                statistic: Statistic::Rho,
                reason: DegeneracyReason::ZeroVariance,
            },
        };
        assert!(error.is_degenerate());

        let empty = ReportError::Statistics {
            report: "dG",
            source: StatisticsError::EmptySample,
        };
        assert!(!empty.is_degenerate());
        assert!(empty.to_string().contains("empty sample"));
    }
}
