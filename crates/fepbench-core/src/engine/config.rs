use crate::core::statistics::StatisticSet;
use crate::core::statistics::bootstrap::BootstrapConfig;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Output image paths of the comparison report batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutputs {
    /// Computed vs experimental relative free energies.
    pub ddg_plot: PathBuf,
    /// Computed vs experimental absolute free energies.
    pub dg_plot: PathBuf,
    /// Third-party predictions vs experimental absolute free energies.
    pub dg_predicted_plot: PathBuf,
    /// Third-party predictions vs computed absolute free energies.
    pub dg_computed_vs_predicted_plot: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
    /// Edge length of the square figure, in pixels.
    pub size_px: u32,
    pub dg_limits: (f64, f64),
    pub ddg_limits: (f64, f64),
    /// Display name of the method that produced the calculated edges.
    pub computed_method: String,
    /// Display name of the third-party method in the experimental file.
    pub predicted_method: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub outputs: ReportOutputs,
    /// Statistics annotated on the absolute (dG) reports.
    pub dg_statistics: StatisticSet,
    /// Statistics annotated on the relative (ddG) report.
    pub ddg_statistics: StatisticSet,
    pub bootstrap: BootstrapConfig,
    pub figure: FigureConfig,
}

#[derive(Default)]
pub struct ReportConfigBuilder {
    outputs: Option<ReportOutputs>,
    dg_statistics: Option<StatisticSet>,
    ddg_statistics: Option<StatisticSet>,
    bootstrap_samples: Option<usize>,
    confidence: Option<f64>,
    seed: Option<u64>,
    figure_size: Option<u32>,
    dg_limits: Option<(f64, f64)>,
    ddg_limits: Option<(f64, f64)>,
    computed_method: Option<String>,
    predicted_method: Option<String>,
}

fn check_limits(parameter: &'static str, limits: (f64, f64)) -> Result<(f64, f64), ConfigError> {
    if limits.0.is_finite() && limits.1.is_finite() && limits.0 < limits.1 {
        Ok(limits)
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: format!(
                "expected finite limits with low < high, got [{}, {}]",
                limits.0, limits.1
            ),
        })
    }
}

impl ReportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outputs(mut self, outputs: ReportOutputs) -> Self {
        self.outputs = Some(outputs);
        self
    }
    pub fn dg_statistics(mut self, statistics: StatisticSet) -> Self {
        self.dg_statistics = Some(statistics);
        self
    }
    pub fn ddg_statistics(mut self, statistics: StatisticSet) -> Self {
        self.ddg_statistics = Some(statistics);
        self
    }
    pub fn bootstrap_samples(mut self, samples: usize) -> Self {
        self.bootstrap_samples = Some(samples);
        self
    }
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn figure_size(mut self, size_px: u32) -> Self {
        self.figure_size = Some(size_px);
        self
    }
    pub fn dg_limits(mut self, limits: (f64, f64)) -> Self {
        self.dg_limits = Some(limits);
        self
    }
    pub fn ddg_limits(mut self, limits: (f64, f64)) -> Self {
        self.ddg_limits = Some(limits);
        self
    }
    pub fn computed_method(mut self, name: impl Into<String>) -> Self {
        self.computed_method = Some(name.into());
        self
    }
    pub fn predicted_method(mut self, name: impl Into<String>) -> Self {
        self.predicted_method = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ReportConfig, ConfigError> {
        let confidence = self
            .confidence
            .ok_or(ConfigError::MissingParameter("confidence"))?;
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "confidence",
                reason: format!("expected a value in (0, 1), got {}", confidence),
            });
        }
        let bootstrap = BootstrapConfig {
            samples: self
                .bootstrap_samples
                .ok_or(ConfigError::MissingParameter("bootstrap_samples"))?,
            confidence,
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
        };

        let size_px = self
            .figure_size
            .ok_or(ConfigError::MissingParameter("figure_size"))?;
        if size_px == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "figure_size",
                reason: "figure size must be positive".to_string(),
            });
        }
        let figure = FigureConfig {
            size_px,
            dg_limits: check_limits(
                "dg_limits",
                self.dg_limits
                    .ok_or(ConfigError::MissingParameter("dg_limits"))?,
            )?,
            ddg_limits: check_limits(
                "ddg_limits",
                self.ddg_limits
                    .ok_or(ConfigError::MissingParameter("ddg_limits"))?,
            )?,
            computed_method: self
                .computed_method
                .ok_or(ConfigError::MissingParameter("computed_method"))?,
            predicted_method: self
                .predicted_method
                .ok_or(ConfigError::MissingParameter("predicted_method"))?,
        };

        Ok(ReportConfig {
            outputs: self
                .outputs
                .ok_or(ConfigError::MissingParameter("outputs"))?,
            dg_statistics: self
                .dg_statistics
                .ok_or(ConfigError::MissingParameter("dg_statistics"))?,
            ddg_statistics: self
                .ddg_statistics
                .ok_or(ConfigError::MissingParameter("ddg_statistics"))?,
            bootstrap,
            figure,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmberTopologyConfig {
    pub input_pdb: PathBuf,
    pub output_dir: PathBuf,
    /// Leap force-field identifiers, each sourced as `leaprc.<name>`.
    pub force_fields: Vec<String>,
    pub remove_hydrogens: bool,
    pub remove_waters: bool,
    pub pdb4amber_program: PathBuf,
    pub tleap_program: PathBuf,
}

#[derive(Default)]
pub struct AmberTopologyConfigBuilder {
    input_pdb: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    force_fields: Vec<String>,
    remove_hydrogens: Option<bool>,
    remove_waters: Option<bool>,
    pdb4amber_program: Option<PathBuf>,
    tleap_program: Option<PathBuf>,
}

impl AmberTopologyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_pdb(mut self, path: PathBuf) -> Self {
        self.input_pdb = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn force_field(mut self, name: impl Into<String>) -> Self {
        self.force_fields.push(name.into());
        self
    }
    pub fn remove_hydrogens(mut self, remove: bool) -> Self {
        self.remove_hydrogens = Some(remove);
        self
    }
    pub fn remove_waters(mut self, remove: bool) -> Self {
        self.remove_waters = Some(remove);
        self
    }
    pub fn pdb4amber_program(mut self, program: PathBuf) -> Self {
        self.pdb4amber_program = Some(program);
        self
    }
    pub fn tleap_program(mut self, program: PathBuf) -> Self {
        self.tleap_program = Some(program);
        self
    }

    pub fn build(self) -> Result<AmberTopologyConfig, ConfigError> {
        if self.force_fields.is_empty() {
            return Err(ConfigError::MissingParameter("force_fields"));
        }
        if let Some(blank) = self.force_fields.iter().find(|ff| ff.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                parameter: "force_fields",
                reason: format!("force-field name '{}' is empty", blank),
            });
        }
        Ok(AmberTopologyConfig {
            input_pdb: self
                .input_pdb
                .ok_or(ConfigError::MissingParameter("input_pdb"))?,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            force_fields: self.force_fields,
            remove_hydrogens: self.remove_hydrogens.unwrap_or(false),
            remove_waters: self.remove_waters.unwrap_or(false),
            pdb4amber_program: self
                .pdb4amber_program
                .unwrap_or_else(|| PathBuf::from("pdb4amber")),
            tleap_program: self
                .tleap_program
                .unwrap_or_else(|| PathBuf::from("tleap")),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_outputs() -> ReportOutputs {
        ReportOutputs {
            ddg_plot: PathBuf::from("ddg.png"),
            dg_plot: PathBuf::from("dg.png"),
            dg_predicted_plot: PathBuf::from("pred_dg.png"),
            dg_computed_vs_predicted_plot: PathBuf::from("calc_pred_dg.png"),
        }
    }

    pub(crate) fn complete_builder() -> ReportConfigBuilder {
        ReportConfigBuilder::new()
            .outputs(sample_outputs())
            .dg_statistics(StatisticSet::full())
            .ddg_statistics(StatisticSet::reduced())
            .bootstrap_samples(100)
            .confidence(0.95)
            .seed(42)
            .figure_size(500)
            .dg_limits((-15.0, -5.0))
            .ddg_limits((-5.0, 5.0))
            .computed_method("OpenFE")
            .predicted_method("FEP+")
    }

    #[test]
    fn report_builder_succeeds_with_all_parameters() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.bootstrap.samples, 100);
        assert_eq!(config.bootstrap.seed, 42);
        assert_eq!(config.figure.dg_limits, (-15.0, -5.0));
        assert_eq!(config.figure.computed_method, "OpenFE");
        assert_eq!(config.dg_statistics, StatisticSet::full());
    }

    #[test]
    fn report_builder_fails_with_missing_outputs() {
        let result = ReportConfigBuilder::new()
            .dg_statistics(StatisticSet::full())
            .ddg_statistics(StatisticSet::reduced())
            .bootstrap_samples(100)
            .confidence(0.95)
            .seed(42)
            .figure_size(500)
            .dg_limits((-15.0, -5.0))
            .ddg_limits((-5.0, 5.0))
            .computed_method("OpenFE")
            .predicted_method("FEP+")
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("outputs")));
    }

    #[test]
    fn report_builder_rejects_inverted_limits() {
        let result = complete_builder().dg_limits((-5.0, -15.0)).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                parameter: "dg_limits",
                ..
            })
        ));
    }

    #[test]
    fn report_builder_rejects_confidence_outside_unit_interval() {
        let result = complete_builder().confidence(1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                parameter: "confidence",
                ..
            })
        ));
    }

    #[test]
    fn amber_builder_applies_defaults() {
        let config = AmberTopologyConfigBuilder::new()
            .input_pdb(PathBuf::from("protein.pdb"))
            .output_dir(PathBuf::from("out"))
            .force_field("protein.ff14SB")
            .build()
            .unwrap();
        assert_eq!(config.force_fields, vec!["protein.ff14SB".to_string()]);
        assert!(!config.remove_hydrogens);
        assert!(!config.remove_waters);
        assert_eq!(config.pdb4amber_program, PathBuf::from("pdb4amber"));
        assert_eq!(config.tleap_program, PathBuf::from("tleap"));
    }

    #[test]
    fn amber_builder_requires_force_field_and_paths() {
        let missing_ff = AmberTopologyConfigBuilder::new()
            .input_pdb(PathBuf::from("protein.pdb"))
            .output_dir(PathBuf::from("out"))
            .build();
        assert_eq!(missing_ff, Err(ConfigError::MissingParameter("force_fields")));

        let missing_output = AmberTopologyConfigBuilder::new()
            .input_pdb(PathBuf::from("protein.pdb"))
            .force_field("protein.ff14SB")
            .build();
        assert_eq!(
            missing_output,
            Err(ConfigError::MissingParameter("output_dir"))
        );
    }
}
