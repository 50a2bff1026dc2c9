use crate::core::models::records::{CalculatedData, ExperimentalData};
use crate::core::statistics::StatisticSet;
use crate::engine::config::ReportConfig;
use crate::engine::error::ReportError;
use crate::engine::estimator::{self, EstimationSummary};
use crate::engine::render::ReportRenderer;
use crate::engine::report::{self, PreparedReport};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

pub const REDUCED_STATISTICS_NOTICE: &str =
    "Correlation statistics (R2 and rho) for DG plots cannot be calculated due to small sample size.";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub estimation: EstimationSummary,
    /// Files written, in report order.
    pub written: Vec<PathBuf>,
    /// Whether the batch fell back to the reduced statistic set.
    pub degraded: bool,
    /// User-facing message explaining a fallback.
    pub notice: Option<&'static str>,
}

#[instrument(skip_all, name = "report_workflow")]
pub fn run(
    experimental: &ExperimentalData,
    calculated: &CalculatedData,
    config: &ReportConfig,
    renderer: &mut impl ReportRenderer,
) -> Result<ReportOutcome, ReportError> {
    // === Phase 1: Assemble the free-energy map and resolve absolute values ===
    info!(
        "Building free-energy map from {} experimental entries and {} calculated edges.",
        experimental.len(),
        calculated.len()
    );
    let (map, estimation) = estimator::build_femap(experimental, calculated)?;

    // === Phase 2: Prepare all reports, falling back once to the reduced statistic set ===
    let (reports, degraded) = match report::prepare_batch(
        &map,
        experimental,
        config,
        &config.dg_statistics,
        &config.ddg_statistics,
    ) {
        Ok(reports) => (reports, false),
        Err(error) if error.is_degenerate() => {
            let requested = StatisticSet::new(
                config.dg_statistics.iter().chain(config.ddg_statistics.iter()),
            );
            let dropped: Vec<String> = requested
                .iter()
                .filter(|s| s.is_correlation())
                .map(|s| s.to_string())
                .collect();
            warn!(
                "{} Dropping {} and falling back to RMSE and MUE.",
                error,
                dropped.join(", ")
            );
            let reduced = StatisticSet::reduced();
            let reports = report::prepare_batch(&map, experimental, config, &reduced, &reduced)?;
            (reports, true)
        }
        Err(error) => return Err(error),
    };

    // === Phase 3: Draw ===
    let written = render_all(&reports, renderer)?;

    info!("Report workflow complete. Wrote {} plot(s).", written.len());
    Ok(ReportOutcome {
        estimation,
        written,
        degraded,
        notice: degraded.then_some(REDUCED_STATISTICS_NOTICE),
    })
}

fn render_all(
    reports: &[PreparedReport],
    renderer: &mut impl ReportRenderer,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::with_capacity(reports.len());
    for report in reports {
        renderer.render(report)?;
        info!("Saved '{}' plot to {}.", report.kind.key(), report.output.display());
        written.push(report.output.clone());
    }
    Ok(written)
}
