use clap::Parser;
use fepbench_cli::{cli::BlindArgs, commands, finish, logging};
use tracing::debug;

fn main() {
    let args = BlindArgs::parse();
    let result = logging::setup_logging(&args.logging).and_then(|()| {
        debug!("Parsed arguments: {:?}", &args);
        commands::blind::run(&args)
    });
    finish("fep-blind", result);
}
