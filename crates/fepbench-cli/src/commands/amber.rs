use crate::cli::AmberTopArgs;
use crate::error::{CliError, Result};
use fepbench::engine::config::{AmberTopologyConfig, AmberTopologyConfigBuilder};
use fepbench::engine::tools::SystemToolRunner;
use fepbench::workflows;
use tracing::debug;

fn build_config(args: &AmberTopArgs) -> Result<AmberTopologyConfig> {
    let builder = args.force_fields.iter().fold(
        AmberTopologyConfigBuilder::new()
            .input_pdb(args.pdb.clone())
            .output_dir(args.output.clone())
            .remove_hydrogens(args.remove_hydrogens)
            .remove_waters(args.remove_waters)
            .pdb4amber_program(args.pdb4amber.clone())
            .tleap_program(args.tleap.clone()),
        |builder, ff| builder.force_field(ff.as_str()),
    );
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

pub fn run(args: &AmberTopArgs) -> Result<()> {
    let config = build_config(args)?;
    debug!("Resolved topology configuration: {:?}", config);

    let outputs = workflows::amber::run(&config, &SystemToolRunner)?;
    println!("Cleaned structure: {}", outputs.cleaned_pdb.display());
    println!("Topology: {}", outputs.topology.display());
    println!("Coordinates: {}", outputs.coordinates.display());
    Ok(())
}
