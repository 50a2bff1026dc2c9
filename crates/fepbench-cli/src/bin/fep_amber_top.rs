use clap::Parser;
use fepbench_cli::{
    cli::{AmberTopArgs, normalize_legacy_flags},
    commands, finish, logging,
};
use tracing::debug;

fn main() {
    let args = AmberTopArgs::parse_from(normalize_legacy_flags(std::env::args_os()));
    let result = logging::setup_logging(&args.logging).and_then(|()| {
        debug!("Parsed arguments: {:?}", &args);
        commands::amber::run(&args)
    });
    finish("fep-amber-top", result);
}
