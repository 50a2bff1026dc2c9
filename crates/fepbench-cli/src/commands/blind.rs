use crate::cli::BlindArgs;
use crate::error::Result;
use fepbench::core::io::name_mapping::NameMappingFile;
use fepbench::workflows;
use tracing::info;

pub fn run(args: &BlindArgs) -> Result<()> {
    let mapping = super::read_input::<NameMappingFile>(&args.name_mapping_file)?;
    info!("Loaded {} name mapping(s).", mapping.len());

    let summary = workflows::blind::run(&args.experimental_data, &mapping, &args.output)?;
    println!(
        "Blinded {} row(s); written to {}",
        summary.rows,
        args.output.display()
    );
    Ok(())
}
