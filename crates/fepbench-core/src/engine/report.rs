use super::config::ReportConfig;
use super::error::ReportError;
use crate::core::models::femap::FeMap;
use crate::core::models::records::{ExperimentalData, edge_tag};
use crate::core::statistics::StatisticSet;
use crate::core::statistics::bootstrap::{self, StatisticSummary};
use crate::core::statistics::metrics;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::debug;

/// The four comparison reports produced by a plotting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Computed relative free energies against experimental differences.
    RelativeVsExperiment,
    /// Computed absolute free energies against experiment.
    AbsoluteVsExperiment,
    /// Third-party predictions against experiment.
    PredictedVsExperiment,
    /// Computed absolute free energies against third-party predictions.
    AbsoluteVsPredicted,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::RelativeVsExperiment,
        ReportKind::AbsoluteVsExperiment,
        ReportKind::PredictedVsExperiment,
        ReportKind::AbsoluteVsPredicted,
    ];

    /// Short identifier used in logs and error messages.
    pub fn key(&self) -> &'static str {
        match self {
            ReportKind::RelativeVsExperiment => "computed-ddg",
            ReportKind::AbsoluteVsExperiment => "computed-dg",
            ReportKind::PredictedVsExperiment => "predicted-dg",
            ReportKind::AbsoluteVsPredicted => "computed-vs-predicted-dg",
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, ReportKind::RelativeVsExperiment)
    }

    pub fn quantity(&self) -> &'static str {
        if self.is_relative() { "ΔΔG" } else { "ΔG" }
    }
}

/// Paired points of a comparison plot with their per-point uncertainties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub xerr: Vec<f64>,
    pub yerr: Vec<f64>,
    /// Ligand name or edge tag of each point.
    pub labels: Vec<String>,
}

impl ComparisonSeries {
    fn push(&mut self, label: String, x: f64, xerr: f64, y: f64, yerr: f64) {
        self.labels.push(label);
        self.x.push(x);
        self.xerr.push(xerr);
        self.y.push(y);
        self.yerr.push(yerr);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// A report whose data and statistics are fully computed and ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReport {
    pub kind: ReportKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: ComparisonSeries,
    pub statistics: Vec<StatisticSummary>,
    pub confidence: f64,
    pub limits: (f64, f64),
    pub size_px: u32,
    pub output: PathBuf,
}

/// Shifts `values` to zero mean, then adds `shift`.
pub fn center(values: &[f64], shift: f64) -> Vec<f64> {
    match metrics::mean(values) {
        Some(mean) => values.iter().map(|v| v - mean + shift).collect(),
        None => Vec::new(),
    }
}

/// Calculated edges whose two ligands both have experimental values.
///
/// The experimental difference is `dG(j) - dG(i)` and its uncertainty combines the two
/// experimental errors in quadrature.
pub fn relative_series(map: &FeMap, experimental: &ExperimentalData) -> ComparisonSeries {
    let mut series = ComparisonSeries::default();
    for m in map.relative_measurements() {
        let (Some(name_i), Some(name_j)) = (map.ligand_name(m.from), map.ligand_name(m.to))
        else {
            continue;
        };
        let (Some(exp_i), Some(exp_j)) = (experimental.get(name_i), experimental.get(name_j))
        else {
            continue;
        };
        series.push(
            edge_tag(name_i, name_j),
            exp_j.exp_dg - exp_i.exp_dg,
            exp_i.exp_dg_err.hypot(exp_j.exp_dg_err),
            m.value,
            m.uncertainty,
        );
    }
    series
}

/// Estimated absolute values of computed ligands against experiment, both axes centred.
pub fn absolute_series(
    map: &FeMap,
    experimental: &ExperimentalData,
    shift: f64,
) -> ComparisonSeries {
    let mut series = ComparisonSeries::default();
    for id in map.computed_ligands() {
        let Some(name) = map.ligand_name(id) else {
            continue;
        };
        let (Some(record), Some(estimate)) = (experimental.get(name), map.estimate(name)) else {
            continue;
        };
        series.push(
            name.to_string(),
            record.exp_dg,
            record.exp_dg_err,
            estimate.value,
            estimate.uncertainty,
        );
    }
    series.x = center(&series.x, shift);
    series.y = center(&series.y, shift);
    series
}

/// Third-party predictions against experiment for every experimental entry, both axes centred.
pub fn predicted_series(experimental: &ExperimentalData, shift: f64) -> ComparisonSeries {
    let mut series = ComparisonSeries::default();
    for record in experimental.iter() {
        series.push(
            record.name.clone(),
            record.exp_dg,
            record.exp_dg_err,
            record.pred_dg,
            record.pred_dg_err,
        );
    }
    series.x = center(&series.x, shift);
    series.y = center(&series.y, shift);
    series
}

/// Estimated absolute values against third-party predictions.
///
/// Only ligands present both in the experimental data and among the computed ligands
/// are paired; others are skipped. The computed axis is centred on the mean
/// experimental value of the paired ligands, the prediction axis is left as is.
pub fn computed_vs_predicted_series(
    map: &FeMap,
    experimental: &ExperimentalData,
) -> ComparisonSeries {
    let computed: Vec<&str> = map
        .computed_ligands()
        .into_iter()
        .filter_map(|id| map.ligand_name(id))
        .collect();

    let mut series = ComparisonSeries::default();
    let mut paired_exp = Vec::new();
    for record in experimental.iter() {
        if !computed.contains(&record.name.as_str()) {
            continue;
        }
        let Some(estimate) = map.estimate(&record.name) else {
            continue;
        };
        series.push(
            record.name.clone(),
            record.pred_dg,
            record.pred_dg_err,
            estimate.value,
            estimate.uncertainty,
        );
        paired_exp.push(record.exp_dg);
    }
    if let Some(shift) = metrics::mean(&paired_exp) {
        series.y = center(&series.y, shift);
    }
    series
}

fn summarize_all(
    kind: ReportKind,
    series: &ComparisonSeries,
    statistics: &StatisticSet,
    config: &ReportConfig,
    rng: &mut StdRng,
) -> Result<Vec<StatisticSummary>, ReportError> {
    statistics
        .iter()
        .map(|statistic| {
            bootstrap::summarize(statistic, &series.x, &series.y, &config.bootstrap, rng).map_err(
                |source| ReportError::Statistics {
                    report: kind.key(),
                    source,
                },
            )
        })
        .collect()
}

fn prepare(
    kind: ReportKind,
    series: ComparisonSeries,
    statistics: &StatisticSet,
    config: &ReportConfig,
    rng: &mut StdRng,
) -> Result<PreparedReport, ReportError> {
    let summaries = summarize_all(kind, &series, statistics, config, rng)?;
    let figure = &config.figure;
    let (title, x_label, y_label, limits, output) = match kind {
        ReportKind::RelativeVsExperiment => (
            format!("Experiment vs {}", figure.computed_method),
            "Experimental".to_string(),
            figure.computed_method.clone(),
            figure.ddg_limits,
            &config.outputs.ddg_plot,
        ),
        ReportKind::AbsoluteVsExperiment => (
            format!("Experiment vs {}", figure.computed_method),
            "Experimental".to_string(),
            figure.computed_method.clone(),
            figure.dg_limits,
            &config.outputs.dg_plot,
        ),
        ReportKind::PredictedVsExperiment => (
            format!("Experiment vs {}", figure.predicted_method),
            "Experimental".to_string(),
            figure.predicted_method.clone(),
            figure.dg_limits,
            &config.outputs.dg_predicted_plot,
        ),
        ReportKind::AbsoluteVsPredicted => (
            format!("{} vs {}", figure.predicted_method, figure.computed_method),
            figure.predicted_method.clone(),
            figure.computed_method.clone(),
            figure.dg_limits,
            &config.outputs.dg_computed_vs_predicted_plot,
        ),
    };
    debug!(
        "Prepared report '{}' with {} points and {} statistics.",
        kind.key(),
        series.len(),
        summaries.len()
    );
    Ok(PreparedReport {
        kind,
        title,
        x_label: format!("{} {} (kcal/mol)", x_label, kind.quantity()),
        y_label: format!("{} {} (kcal/mol)", y_label, kind.quantity()),
        series,
        statistics: summaries,
        confidence: config.bootstrap.confidence,
        limits,
        size_px: figure.size_px,
        output: output.clone(),
    })
}

/// Collects the data of all four reports and evaluates their statistics.
///
/// Nothing is drawn here; a failure on any report fails the whole batch. Absolute
/// reports use `dg_statistics`, the relative report uses `ddg_statistics`. The bootstrap
/// generator is seeded once per batch, so repeated calls give identical intervals.
pub fn prepare_batch(
    map: &FeMap,
    experimental: &ExperimentalData,
    config: &ReportConfig,
    dg_statistics: &StatisticSet,
    ddg_statistics: &StatisticSet,
) -> Result<Vec<PreparedReport>, ReportError> {
    let shift = experimental.mean_exp_dg().unwrap_or(0.0);
    let mut rng = bootstrap::seeded_rng(&config.bootstrap);

    ReportKind::ALL
        .iter()
        .map(|&kind| {
            let (series, statistics) = match kind {
                ReportKind::RelativeVsExperiment => {
                    (relative_series(map, experimental), ddg_statistics)
                }
                ReportKind::AbsoluteVsExperiment => {
                    (absolute_series(map, experimental, shift), dg_statistics)
                }
                ReportKind::PredictedVsExperiment => {
                    (predicted_series(experimental, shift), dg_statistics)
                }
                ReportKind::AbsoluteVsPredicted => {
                    (computed_vs_predicted_series(map, experimental), dg_statistics)
                }
            };
            prepare(kind, series, statistics, config, &mut rng)
        })
        .collect()
}
