use super::diagnostics::Parsed;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Defines the interface for reading the flat data files of a benchmark run.
///
/// Implementors handle format-specific parsing; the path-based entry point is shared.
pub trait DataFile {
    /// The in-memory representation produced by the reader.
    type Data;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads and parses data from a reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed data and any warnings produced along the way.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues. No partial
    /// data is returned on error.
    fn read_from(reader: impl Read) -> Result<Parsed<Self::Data>, Self::Error>;

    /// Reads and parses data from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Parsed<Self::Data>, Self::Error> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}
