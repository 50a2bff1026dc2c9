use crate::cli::PlotArgs;
use crate::config::PartialReportConfig;
use crate::error::Result;
use fepbench::core::io::{calculated::CalculatedFile, experimental::ExperimentalFile};
use fepbench::engine::config::ReportConfig;
use fepbench::engine::render::PlottersRenderer;
use fepbench::workflows;
use tracing::{debug, info, warn};

fn load_config(args: &PlotArgs) -> Result<ReportConfig> {
    let partial = match &args.config {
        Some(path) => PartialReportConfig::from_file(path)?,
        None => PartialReportConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial.merge_with_cli(args)?;
    debug!("Resolved report configuration: {:?}", config);
    Ok(config)
}

pub fn run(args: &PlotArgs) -> Result<()> {
    let config = load_config(args)?;

    let experimental = super::read_input::<ExperimentalFile>(&args.experiment)?;
    let calculated = super::read_input::<CalculatedFile>(&args.calculated)?;

    let mut renderer = PlottersRenderer::new();
    let outcome = workflows::report::run(&experimental, &calculated, &config, &mut renderer)?;

    if outcome.estimation.disconnected > 0 {
        warn!(
            "{} ligand(s) are not connected to an experimental reference and were left out of the absolute-value plots.",
            outcome.estimation.disconnected
        );
    }
    if let Some(notice) = outcome.notice {
        println!("{}", notice);
    }
    for path in &outcome.written {
        println!("Saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn config_file_is_optional() {
        let args = PlotArgs::parse_from(["fep-plot", "--seed", "3"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.bootstrap.seed, 3);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let args = PlotArgs::parse_from(["fep-plot", "-c", missing.to_str().unwrap()]);
        assert!(matches!(load_config(&args), Err(CliError::Io(_))));
    }

    #[test]
    fn unreadable_input_stops_before_plotting() {
        let dir = tempdir().unwrap();
        let experiment = dir.path().join("experiment.csv");
        let calculated = dir.path().join("ddg.tsv");
        let plot = dir.path().join("ddg.png");
        fs::write(
            &experiment,
            "Ligand name,Exp. dG (kcal/mol),Pred. dG (kcal/mol),Pred. dG std. error (kcal/mol)\nA,-9.0,-8.5,0.2\n",
        )
        .unwrap();

        let args = PlotArgs::parse_from([
            "fep-plot",
            "--experiment",
            experiment.to_str().unwrap(),
            "--calculated",
            calculated.to_str().unwrap(),
            "--ddg_plot_filename",
            plot.to_str().unwrap(),
        ]);
        let result = run(&args);
        assert!(matches!(result, Err(CliError::FileParsing { path, .. }) if path == calculated));
        assert!(!plot.exists());
    }
}
