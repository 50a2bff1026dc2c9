use clap::Parser;
use fepbench_cli::{cli::PlotArgs, commands, finish, logging};
use tracing::debug;

fn main() {
    let args = PlotArgs::parse();
    let result = logging::setup_logging(&args.logging).and_then(|()| {
        debug!("Parsed arguments: {:?}", &args);
        commands::plot::run(&args)
    });
    finish("fep-plot", result);
}
