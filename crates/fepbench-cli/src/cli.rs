use clap::{Args, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

/// Logging options shared by every tool.
#[derive(Args, Debug, Clone, Default)]
pub struct LoggingArgs {
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(
    name = "fep-plot",
    version,
    about = "Estimate absolute free energies from calculated relative free energies and plot them against experiment and FEP+.",
    help_template = HELP_TEMPLATE,
)]
pub struct PlotArgs {
    // --- Inputs ---
    /// Path to the tab-separated calculated ddG file (ligand_i, ligand_j, ddG, ddG error).
    #[arg(long, value_name = "PATH", default_value = "ddg.tsv")]
    pub calculated: PathBuf,

    /// Path to the experimental data CSV with FEP+ predictions.
    #[arg(long, value_name = "PATH", default_value = "experiment.csv")]
    pub experiment: PathBuf,

    // --- Outputs ---
    /// Output file of the computed vs experiment ddG plot.
    #[arg(
        long = "ddg_plot_filename",
        value_name = "PATH",
        default_value = "openfe_experiment_ddg.png"
    )]
    pub ddg_plot_filename: PathBuf,

    /// Output file of the computed vs experiment dG plot.
    #[arg(
        long = "dg_plot_filename",
        value_name = "PATH",
        default_value = "openfe_experiment_dg.png"
    )]
    pub dg_plot_filename: PathBuf,

    /// Output file of the FEP+ vs experiment dG plot.
    #[arg(
        long = "dg_fepplus_plot_filename",
        value_name = "PATH",
        default_value = "schrodinger_experiment_dg.png"
    )]
    pub dg_fepplus_plot_filename: PathBuf,

    /// Output file of the computed vs FEP+ dG plot.
    #[arg(
        long = "dg_openfe_fepplus_plot_filename",
        value_name = "PATH",
        default_value = "openfe_schrodinger_dg.png"
    )]
    pub dg_openfe_fepplus_plot_filename: PathBuf,

    // --- Configuration ---
    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of bootstrap resamples for confidence intervals (0 disables them).
    #[arg(long, value_name = "INT")]
    pub bootstrap_samples: Option<usize>,

    /// Override the seed of the bootstrap random number generator.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S statistics.dg=RMSE,MUE
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "fep-blind",
    version,
    about = "Rename the ligands of an experimental CSV file using a private-to-public name mapping.",
    help_template = HELP_TEMPLATE,
)]
pub struct BlindArgs {
    /// The CSV file containing the experimental data and the private ligand names.
    #[arg(long, value_name = "PATH", required = true)]
    pub experimental_data: PathBuf,

    /// The JSON file mapping private ligand names to their blinded versions.
    #[arg(
        long,
        value_name = "PATH",
        default_value = "./ligand_name_mapping_PRIVATE.json"
    )]
    pub name_mapping_file: PathBuf,

    /// The name of the new blinded CSV file.
    #[arg(long, value_name = "PATH", default_value = "blinded_experimental_data.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "fep-amber-top",
    version,
    about = "Generate an AMBER topology and coordinates from a PDB file with pdb4amber and tleap.",
    help_template = HELP_TEMPLATE,
)]
pub struct AmberTopArgs {
    /// Path to the PDB file (also accepted as -pdb).
    #[arg(long, value_name = "PATH", required = true)]
    pub pdb: PathBuf,

    /// Force field to use (also accepted as -ff). Can be repeated.
    #[arg(long = "ff", value_name = "NAME", default_value = "protein.ff14SB")]
    pub force_fields: Vec<String>,

    /// Path to the output folder with AMBER topology files.
    #[arg(short = 'o', long = "output", value_name = "DIR", required = true)]
    pub output: PathBuf,

    /// Ask pdb4amber to strip hydrogens.
    #[arg(long)]
    pub remove_hydrogens: bool,

    /// Ask pdb4amber to strip waters.
    #[arg(long)]
    pub remove_waters: bool,

    /// The pdb4amber executable.
    #[arg(long, value_name = "PATH", default_value = "pdb4amber")]
    pub pdb4amber: PathBuf,

    /// The tleap executable.
    #[arg(long, value_name = "PATH", default_value = "tleap")]
    pub tleap: PathBuf,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

const LEGACY_FLAGS: [(&str, &str); 2] = [("-pdb", "--pdb"), ("-ff", "--ff")];

/// Rewrites the single-dash long flags `-pdb` and `-ff` (also in `-pdb=PATH` form) to
/// their double-dash spelling. Everything else passes through untouched.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (legacy, modern) in LEGACY_FLAGS {
                if text == legacy {
                    return OsString::from(modern);
                }
                if let Some(value) = text.strip_prefix(legacy).and_then(|r| r.strip_prefix('=')) {
                    return OsString::from(format!("{}={}", modern, value));
                }
            }
            arg
        })
        .collect()
}
