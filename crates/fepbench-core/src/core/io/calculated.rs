use super::diagnostics::{Diagnostic, Parsed};
use super::traits::DataFile;
use crate::core::models::records::{CalculatedData, CalculatedRecord};
use std::io::{self, Read};
use thiserror::Error;
use tracing::trace;

/// Standard errors below this value (kcal/mol) are padded by the same amount.
pub const MIN_UNCERTAINTY: f64 = 0.01;

const COLUMN_NAMES: [&str; 4] = ["ligand_i", "ligand_j", "ddG", "ddG_std_error"];

#[derive(Debug, Error)]
pub enum CalculatedDataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Line {line} is missing column {index} ({name})")]
    MissingField {
        line: u64,
        index: usize,
        name: &'static str,
    },
    #[error("Invalid number on line {line} in column {name} (value: '{value}')")]
    InvalidNumber {
        line: u64,
        name: &'static str,
        value: String,
    },
}

/// Pads a standard error that falls below [`MIN_UNCERTAINTY`].
///
/// Returns the value to use and whether padding was applied.
pub fn pad_uncertainty(err: f64) -> (f64, bool) {
    if err < MIN_UNCERTAINTY {
        (err + MIN_UNCERTAINTY, true)
    } else {
        (err, false)
    }
}

/// Reader for a tab-separated file of computed relative free energies.
///
/// Columns are positional: `ligand_i`, `ligand_j`, `ddG`, `ddG_std_error`. The first row
/// is a header and is discarded whatever it contains.
pub struct CalculatedFile;

impl DataFile for CalculatedFile {
    type Data = CalculatedData;
    type Error = CalculatedDataError;

    fn read_from(reader: impl Read) -> Result<Parsed<Self::Data>, Self::Error> {
        let mut tsv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quote(b'"')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut data = CalculatedData::new();
        let mut diagnostics = Vec::new();

        for (row, result) in tsv_reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map_or(row as u64 + 2, |p| p.line());

            let text = |index: usize| {
                record
                    .get(index)
                    .ok_or(CalculatedDataError::MissingField {
                        line,
                        index,
                        name: COLUMN_NAMES[index],
                    })
            };
            let number = |index: usize| -> Result<f64, CalculatedDataError> {
                let raw = text(index)?;
                raw.trim()
                    .parse()
                    .map_err(|_| CalculatedDataError::InvalidNumber {
                        line,
                        name: COLUMN_NAMES[index],
                        value: raw.to_string(),
                    })
            };

            let ligand_i = text(0)?.to_string();
            let ligand_j = text(1)?.to_string();
            let ddg = number(2)?;
            let raw_err = number(3)?;

            let (ddg_err, padded) = pad_uncertainty(raw_err);
            let record = CalculatedRecord {
                ligand_i,
                ligand_j,
                ddg,
                ddg_err,
            };
            let tag = record.tag();
            if padded {
                diagnostics.push(Diagnostic::UncertaintyPadded {
                    tag: tag.clone(),
                    original: raw_err,
                    padded: ddg_err,
                });
            }
            trace!("Read edge {} (ddG = {}, err = {})", tag, ddg, ddg_err);

            if data.insert(record) {
                diagnostics.push(Diagnostic::DuplicateEdge { tag, line });
            }
        }

        Ok(Parsed::new(data, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ligand_i\tligand_j\tcalc_DDG\tcalc_dDDG(MBAR)\n";

    #[test]
    fn reads_edges_keyed_by_tag() {
        let input = format!("{}lig_a\tlig_b\t1.5\t0.2\nlig_b\tlig_c\t-0.5\t0.1\n", HEADER);
        let parsed = CalculatedFile::read_from(input.as_bytes()).unwrap();
        assert!(parsed.diagnostics.is_empty());

        let edge = parsed.data.get("lig_a->lig_b").unwrap();
        assert_eq!(edge.ligand_i, "lig_a");
        assert_eq!(edge.ligand_j, "lig_b");
        assert_eq!(edge.ddg, 1.5);
        assert_eq!(edge.ddg_err, 0.2);
        assert_eq!(parsed.data.len(), 2);
    }

    #[test]
    fn first_row_is_discarded_even_if_it_looks_like_data() {
        let input = "lig_x\tlig_y\t9.0\t0.5\nlig_a\tlig_b\t1.0\t0.2\n";
        let data = CalculatedFile::read_from(input.as_bytes()).unwrap().data;
        assert_eq!(data.len(), 1);
        assert!(data.get("lig_x->lig_y").is_none());
    }

    #[test]
    fn small_uncertainty_is_padded_with_warning() {
        let input = format!("{}lig_a\tlig_b\t1.0\t0.003\n", HEADER);
        let parsed = CalculatedFile::read_from(input.as_bytes()).unwrap();

        let err = parsed.data.get("lig_a->lig_b").unwrap().ddg_err;
        assert!((err - 0.013).abs() < 1e-12);
        assert_eq!(parsed.diagnostics.len(), 1);
        match &parsed.diagnostics[0] {
            Diagnostic::UncertaintyPadded { tag, original, .. } => {
                assert_eq!(tag, "lig_a->lig_b");
                assert_eq!(*original, 0.003);
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn uncertainty_above_floor_is_unchanged() {
        let input = format!("{}lig_a\tlig_b\t1.0\t0.02\n", HEADER);
        let parsed = CalculatedFile::read_from(input.as_bytes()).unwrap();
        assert_eq!(parsed.data.get("lig_a->lig_b").unwrap().ddg_err, 0.02);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn uncertainty_exactly_at_floor_is_unchanged() {
        assert_eq!(pad_uncertainty(0.01), (0.01, false));
        assert_eq!(pad_uncertainty(0.0), (0.01, true));
    }

    #[test]
    fn short_row_reports_missing_field() {
        let input = format!("{}lig_a\tlig_b\t1.0\n", HEADER);
        let result = CalculatedFile::read_from(input.as_bytes());
        assert!(matches!(
            result,
            Err(CalculatedDataError::MissingField { line: 2, index: 3, .. })
        ));
    }

    #[test]
    fn malformed_ddg_is_a_parse_error() {
        let input = format!("{}lig_a\tlig_b\tnot-a-number\t0.1\n", HEADER);
        let result = CalculatedFile::read_from(input.as_bytes());
        assert!(matches!(
            result,
            Err(CalculatedDataError::InvalidNumber { name: "ddG", .. })
        ));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let input = format!("{}lig_a\tlig_b\t1.0\t0.2\tnote\n", HEADER);
        let data = CalculatedFile::read_from(input.as_bytes()).unwrap().data;
        assert_eq!(data.get("lig_a->lig_b").unwrap().ddg_err, 0.2);
    }

    #[test]
    fn repeated_edge_replaces_earlier_row_with_warning() {
        let input = format!("{}lig_a\tlig_b\t1.0\t0.2\nlig_a\tlig_b\t2.0\t0.2\n", HEADER);
        let parsed = CalculatedFile::read_from(input.as_bytes()).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data.get("lig_a->lig_b").unwrap().ddg, 2.0);
        assert!(matches!(
            parsed.diagnostics.as_slice(),
            [Diagnostic::DuplicateEdge { line: 3, .. }]
        ));
    }
}
