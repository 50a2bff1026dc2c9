pub mod amber;
pub mod blind;
pub mod plot;

use crate::error::{CliError, Result};
use fepbench::core::io::traits::DataFile;
use std::path::Path;
use tracing::{info, warn};

/// Reads one input file, logging every parser warning and attaching the path to failures.
pub(crate) fn read_input<F>(path: &Path) -> Result<F::Data>
where
    F: DataFile,
    F::Error: Send + Sync + 'static,
{
    info!("Loading {}", path.display());
    let parsed = F::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let (data, diagnostics) = parsed.into_parts();
    for diagnostic in &diagnostics {
        warn!("{}: {}", path.display(), diagnostic);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fepbench::core::io::calculated::CalculatedFile;
    use fepbench::core::io::experimental::ExperimentalFile;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_failures_carry_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("experiment.csv");
        fs::write(&path, "Name,Value\nA,1\n").unwrap();

        match read_input::<ExperimentalFile>(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileParsing, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_parse_failure() {
        let dir = tempdir().unwrap();
        let result = read_input::<CalculatedFile>(&dir.path().join("absent.tsv"));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn warnings_do_not_prevent_loading() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ddg.tsv");
        fs::write(&path, "header\nA\tB\t1.0\t0.0\n").unwrap();

        let data = read_input::<CalculatedFile>(&path).unwrap();
        assert_eq!(data.len(), 1);
    }
}
