use crate::cli::PlotArgs;
use crate::error::{CliError, Result};
use fepbench::core::statistics::StatisticSet;
use fepbench::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_DG_STATISTICS: [&str; 4] = ["RMSE", "MUE", "R2", "rho"];
const DEFAULT_DDG_STATISTICS: [&str; 2] = ["RMSE", "MUE"];
const DEFAULT_BOOTSTRAP_SAMPLES: usize = 1000;
const DEFAULT_CONFIDENCE: f64 = 0.95;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_FIGURE_SIZE: u32 = 500;
const DEFAULT_DG_LIMITS: [f64; 2] = [-15.0, -5.0];
const DEFAULT_DDG_LIMITS: [f64; 2] = [-5.0, 5.0];
const DEFAULT_COMPUTED_METHOD: &str = "OpenFE";
const DEFAULT_PREDICTED_METHOD: &str = "FEP+";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialStatisticsConfig {
    dg: Option<Vec<String>>,
    ddg: Option<Vec<String>>,
    #[serde(rename = "bootstrap-samples")]
    bootstrap_samples: Option<usize>,
    confidence: Option<f64>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFigureConfig {
    size: Option<u32>,
    #[serde(rename = "dg-limits")]
    dg_limits: Option<[f64; 2]>,
    #[serde(rename = "ddg-limits")]
    ddg_limits: Option<[f64; 2]>,
    #[serde(rename = "computed-method")]
    computed_method: Option<String>,
    #[serde(rename = "predicted-method")]
    predicted_method: Option<String>,
}

/// Plotting settings as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialReportConfig {
    statistics: Option<PartialStatisticsConfig>,
    figure: Option<PartialFigureConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn parse_limits(key: &str, value: &str) -> Result<[f64; 2]> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 2 {
        return Err(CliError::Config(format!(
            "Invalid limits for {}: '{}'. Expected LOW,HIGH.",
            key, value
        )));
    }
    Ok([
        parse_value(key, parts[0], "float")?,
        parse_value(key, parts[1], "float")?,
    ])
}

fn parse_statistics(key: &str, names: &[String]) -> Result<StatisticSet> {
    StatisticSet::parse(names).map_err(|e| CliError::Config(format!("{}: {}", key, e)))
}

impl PartialReportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final report configuration: command-line options first, then `--set`
    /// overrides, then the file, then built-in defaults.
    pub fn merge_with_cli(mut self, args: &PlotArgs) -> Result<core_config::ReportConfig> {
        self.apply_set_values(&args.set_values)?;

        let stats = self.statistics.take().unwrap_or_default();
        let figure = self.figure.take().unwrap_or_default();

        let dg_statistics = parse_statistics(
            "statistics.dg",
            &stats.dg.unwrap_or_else(|| owned(&DEFAULT_DG_STATISTICS)),
        )?;
        let ddg_statistics = parse_statistics(
            "statistics.ddg",
            &stats
                .ddg
                .unwrap_or_else(|| owned(&DEFAULT_DDG_STATISTICS)),
        )?;

        let dg_limits = figure.dg_limits.unwrap_or(DEFAULT_DG_LIMITS);
        let ddg_limits = figure.ddg_limits.unwrap_or(DEFAULT_DDG_LIMITS);

        core_config::ReportConfigBuilder::new()
            .outputs(core_config::ReportOutputs {
                ddg_plot: args.ddg_plot_filename.clone(),
                dg_plot: args.dg_plot_filename.clone(),
                dg_predicted_plot: args.dg_fepplus_plot_filename.clone(),
                dg_computed_vs_predicted_plot: args.dg_openfe_fepplus_plot_filename.clone(),
            })
            .dg_statistics(dg_statistics)
            .ddg_statistics(ddg_statistics)
            .bootstrap_samples(
                args.bootstrap_samples
                    .or(stats.bootstrap_samples)
                    .unwrap_or(DEFAULT_BOOTSTRAP_SAMPLES),
            )
            .confidence(stats.confidence.unwrap_or(DEFAULT_CONFIDENCE))
            .seed(args.seed.or(stats.seed).unwrap_or(DEFAULT_SEED))
            .figure_size(figure.size.unwrap_or(DEFAULT_FIGURE_SIZE))
            .dg_limits((dg_limits[0], dg_limits[1]))
            .ddg_limits((ddg_limits[0], ddg_limits[1]))
            .computed_method(
                figure
                    .computed_method
                    .unwrap_or_else(|| DEFAULT_COMPUTED_METHOD.to_string()),
            )
            .predicted_method(
                figure
                    .predicted_method
                    .unwrap_or_else(|| DEFAULT_PREDICTED_METHOD.to_string()),
            )
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();

            match key {
                "statistics.dg" => {
                    self.statistics.get_or_insert_with(Default::default).dg =
                        Some(parse_list(value_str));
                }
                "statistics.ddg" => {
                    self.statistics.get_or_insert_with(Default::default).ddg =
                        Some(parse_list(value_str));
                }
                "statistics.bootstrap-samples" => {
                    self.statistics
                        .get_or_insert_with(Default::default)
                        .bootstrap_samples = Some(parse_value(key, value_str, "integer")?);
                }
                "statistics.confidence" => {
                    self.statistics
                        .get_or_insert_with(Default::default)
                        .confidence = Some(parse_value(key, value_str, "float")?);
                }
                "statistics.seed" => {
                    self.statistics.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "figure.size" => {
                    self.figure.get_or_insert_with(Default::default).size =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "figure.dg-limits" => {
                    self.figure.get_or_insert_with(Default::default).dg_limits =
                        Some(parse_limits(key, value_str)?);
                }
                "figure.ddg-limits" => {
                    self.figure.get_or_insert_with(Default::default).ddg_limits =
                        Some(parse_limits(key, value_str)?);
                }
                "figure.computed-method" => {
                    self.figure
                        .get_or_insert_with(Default::default)
                        .computed_method = Some(value_str.trim().to_string());
                }
                "figure.predicted-method" => {
                    self.figure
                        .get_or_insert_with(Default::default)
                        .predicted_method = Some(value_str.trim().to_string());
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
