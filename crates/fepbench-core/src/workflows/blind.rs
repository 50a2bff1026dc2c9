use crate::core::io::name_mapping::NameMapping;
use csv::ReaderBuilder;
use std::fs;
use std::io::{self, Read};
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const LIGAND_NAME_COLUMN: &str = "Ligand Name";

#[derive(Debug, Error)]
pub enum BlindError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column '{0}' not found in header")]
    ColumnNotFound(&'static str),
    #[error("Ligand name on line {line} is not valid UTF-8")]
    InvalidName { line: u64 },
    #[error("Could not convert {0} as it was not found in the name mapping.")]
    UnmappedName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlindSummary {
    pub rows: usize,
}

/// Byte range of field `index` within one raw CSV record.
fn field_span(record: &[u8], index: usize) -> Option<Range<usize>> {
    let mut field = 0;
    let mut start = 0;
    let mut end = record.len();
    let mut quoted = false;
    for (pos, &byte) in record.iter().enumerate() {
        match byte {
            b'"' => quoted = !quoted,
            b',' if !quoted => {
                if field == index {
                    return Some(start..pos);
                }
                field += 1;
                start = pos + 1;
            }
            b'\r' | b'\n' if !quoted => {
                end = pos;
                break;
            }
            _ => {}
        }
    }
    (field == index).then_some(start..end)
}

/// Encodes a replacement name, quoting it when the original was quoted or the name needs it.
fn encode_name(name: &str, was_quoted: bool) -> Vec<u8> {
    let needs_quotes = name.contains([',', '"', '\r', '\n']);
    if !(was_quoted || needs_quotes) {
        return name.as_bytes().to_vec();
    }
    format!("\"{}\"", name.replace('"', "\"\"")).into_bytes()
}

/// Rewrites the `Ligand Name` column of a CSV through `mapping`.
///
/// Only the bytes of the name fields change; quoting, line endings and every other field
/// are copied from the input as they are. The complete output is built in memory and
/// returned only when every name was found in the mapping.
pub fn blind_records(
    mut input: impl Read,
    mapping: &NameMapping,
) -> Result<(Vec<u8>, BlindSummary), BlindError> {
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(raw.as_slice());
    let mut records = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        // A record never begins with a line break; any reported there belong to the previous line.
        let mut start = record.position().map_or(0, |p| p.byte() as usize);
        while matches!(raw.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        records.push((start, record));
    }

    let Some((_, header)) = records.first() else {
        return Err(BlindError::ColumnNotFound(LIGAND_NAME_COLUMN));
    };
    let name_index = header
        .iter()
        .position(|field| field.trim_ascii() == LIGAND_NAME_COLUMN.as_bytes())
        .ok_or(BlindError::ColumnNotFound(LIGAND_NAME_COLUMN))?;

    let mut output = Vec::with_capacity(raw.len());
    let first_row = records.get(1).map_or(raw.len(), |(start, _)| *start);
    output.extend_from_slice(&raw[..first_row]);

    let mut rows = 0;
    for (n, (start, record)) in records.iter().enumerate().skip(1) {
        let end = records.get(n + 1).map_or(raw.len(), |(next, _)| *next);
        let slice = &raw[*start..end];
        let line = record.position().map_or(0, |p| p.line());

        let field = record
            .get(name_index)
            .ok_or(BlindError::ColumnNotFound(LIGAND_NAME_COLUMN))?;
        let name = std::str::from_utf8(field).map_err(|_| BlindError::InvalidName { line })?;
        let renamed = mapping
            .get(name)
            .ok_or_else(|| BlindError::UnmappedName(name.to_string()))?;
        debug!("Line {}: '{}' -> '{}'", line, name, renamed);

        let span = field_span(slice, name_index).ok_or(BlindError::InvalidName { line })?;
        let was_quoted = slice[span.clone()].first() == Some(&b'"');
        output.extend_from_slice(&slice[..span.start]);
        output.extend_from_slice(&encode_name(renamed, was_quoted));
        output.extend_from_slice(&slice[span.end..]);
        rows += 1;
    }

    Ok((output, BlindSummary { rows }))
}

#[instrument(skip_all, name = "blind_workflow")]
pub fn run(input: &Path, mapping: &NameMapping, output: &Path) -> Result<BlindSummary, BlindError> {
    info!(
        "Blinding ligand names in {} using {} mapped names.",
        input.display(),
        mapping.len()
    );
    let file = fs::File::open(input)?;
    let (blinded, summary) = blind_records(io::BufReader::new(file), mapping)?;
    fs::write(output, blinded)?;
    info!("Wrote {} blinded rows to {}.", summary.rows, output.display());
    Ok(summary)
}
