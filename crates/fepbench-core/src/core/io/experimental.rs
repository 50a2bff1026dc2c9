use super::diagnostics::{Diagnostic, Parsed};
use super::traits::DataFile;
use crate::core::models::records::{ExperimentalData, ExperimentalRecord};
use std::io::{self, Read};
use thiserror::Error;

pub const LIGAND_NAME_COLUMN: &str = "Ligand name";
pub const EXP_DG_COLUMN: &str = "Exp. dG (kcal/mol)";
pub const EXP_DG_ERROR_COLUMN: &str = "Exp. dG error (kcal/mol)";
pub const PRED_DG_COLUMN: &str = "Pred. dG (kcal/mol)";
pub const PRED_DG_ERROR_COLUMN: &str = "Pred. dG std. error (kcal/mol)";

#[derive(Debug, Error)]
pub enum ExperimentalDataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column '{0}' not found in header")]
    ColumnNotFound(&'static str),
    #[error("Invalid number on line {line} in column '{column}' (value: '{value}')")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("Line {line} has no value for column '{column}'")]
    MissingField { line: u64, column: &'static str },
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    name: usize,
    exp_dg: usize,
    exp_dg_err: Option<usize>,
    pred_dg: usize,
    pred_dg_err: usize,
}

impl ColumnLayout {
    fn locate(headers: &csv::StringRecord) -> Result<Self, ExperimentalDataError> {
        let find = |column: &str| headers.iter().position(|h| h.trim() == column);
        let require = |column: &'static str| {
            find(column).ok_or(ExperimentalDataError::ColumnNotFound(column))
        };

        Ok(Self {
            name: require(LIGAND_NAME_COLUMN)?,
            exp_dg: require(EXP_DG_COLUMN)?,
            exp_dg_err: find(EXP_DG_ERROR_COLUMN),
            pred_dg: require(PRED_DG_COLUMN)?,
            pred_dg_err: require(PRED_DG_ERROR_COLUMN)?,
        })
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    column: &'static str,
    line: u64,
) -> Result<&'r str, ExperimentalDataError> {
    record
        .get(index)
        .ok_or(ExperimentalDataError::MissingField { line, column })
}

fn number(
    record: &csv::StringRecord,
    index: usize,
    column: &'static str,
    line: u64,
) -> Result<f64, ExperimentalDataError> {
    let raw = field(record, index, column, line)?;
    raw.trim()
        .parse()
        .map_err(|_| ExperimentalDataError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        })
}

/// Reader for a comma-separated ligand predictions file with experimental affinities.
///
/// The header must name the ligand, experimental dG and third-party prediction columns;
/// the experimental error column is optional and defaults to zero.
pub struct ExperimentalFile;

impl DataFile for ExperimentalFile {
    type Data = ExperimentalData;
    type Error = ExperimentalDataError;

    fn read_from(reader: impl Read) -> Result<Parsed<Self::Data>, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = ColumnLayout::locate(&headers)?;

        let mut data = ExperimentalData::new();
        let mut diagnostics = Vec::new();

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map_or(row as u64 + 2, |p| p.line());

            let name = field(&record, layout.name, LIGAND_NAME_COLUMN, line)?.to_string();
            let exp_dg = number(&record, layout.exp_dg, EXP_DG_COLUMN, line)?;
            let exp_dg_err = match layout.exp_dg_err {
                Some(index) => number(&record, index, EXP_DG_ERROR_COLUMN, line)?,
                None => 0.0,
            };
            let pred_dg = number(&record, layout.pred_dg, PRED_DG_COLUMN, line)?;
            let pred_dg_err = number(&record, layout.pred_dg_err, PRED_DG_ERROR_COLUMN, line)?;

            let replaced = data.insert(ExperimentalRecord {
                name: name.clone(),
                exp_dg,
                exp_dg_err,
                pred_dg,
                pred_dg_err,
            });
            if replaced {
                diagnostics.push(Diagnostic::DuplicateLigand { name, line });
            }
        }

        Ok(Parsed::new(data, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const FULL_HEADER: &str = "Ligand name,Exp. dG (kcal/mol),Exp. dG error (kcal/mol),Pred. dG (kcal/mol),Pred. dG std. error (kcal/mol)";

    #[test]
    fn reads_all_columns_in_file_order() {
        let input = format!(
            "{}\nlig_1,-10.0,0.1,-9.5,0.3\nlig_2,-8.25,0.2,-8.0,0.4\n",
            FULL_HEADER
        );
        let parsed = ExperimentalFile::read_from(input.as_bytes()).unwrap();
        assert!(parsed.diagnostics.is_empty());

        let data = parsed.data;
        assert_eq!(data.len(), 2);
        let first = data.get("lig_1").unwrap();
        assert_eq!(first.exp_dg, -10.0);
        assert_eq!(first.exp_dg_err, 0.1);
        assert_eq!(first.pred_dg, -9.5);
        assert_eq!(first.pred_dg_err, 0.3);

        let names: Vec<_> = data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["lig_1", "lig_2"]);
    }

    #[test]
    fn missing_error_column_defaults_to_zero() {
        let input = "Ligand name,Exp. dG (kcal/mol),Pred. dG (kcal/mol),Pred. dG std. error (kcal/mol)\nlig,-7.5,-7.0,0.5\n";
        let data = ExperimentalFile::read_from(input.as_bytes()).unwrap().data;
        assert_eq!(data.get("lig").unwrap().exp_dg_err, 0.0);
    }

    #[test]
    fn columns_are_located_by_name_not_position() {
        let input = "Pred. dG std. error (kcal/mol),Extra,Pred. dG (kcal/mol),Exp. dG (kcal/mol),Ligand name\n0.5,x,-7.0,-7.5,lig\n";
        let data = ExperimentalFile::read_from(input.as_bytes()).unwrap().data;
        let record = data.get("lig").unwrap();
        assert_eq!(record.exp_dg, -7.5);
        assert_eq!(record.pred_dg, -7.0);
        assert_eq!(record.pred_dg_err, 0.5);
    }

    #[test]
    fn missing_pred_dg_column_fails_before_returning_data() {
        let input = "Ligand name,Exp. dG (kcal/mol),Exp. dG error (kcal/mol),Pred. dG std. error (kcal/mol)\nlig,-7.5,0.1,0.5\n";
        let result = ExperimentalFile::read_from(input.as_bytes());
        assert!(matches!(
            result,
            Err(ExperimentalDataError::ColumnNotFound(PRED_DG_COLUMN))
        ));
    }

    #[test]
    fn empty_file_reports_missing_ligand_column() {
        let result = ExperimentalFile::read_from("".as_bytes());
        assert!(matches!(
            result,
            Err(ExperimentalDataError::ColumnNotFound(LIGAND_NAME_COLUMN))
        ));
    }

    #[test]
    fn malformed_number_is_reported_with_line_and_column() {
        let input = format!("{}\nlig_1,-10.0,0.1,-9.5,0.3\nlig_2,abc,0.2,-8.0,0.4\n", FULL_HEADER);
        let result = ExperimentalFile::read_from(input.as_bytes());
        match result {
            Err(ExperimentalDataError::InvalidNumber {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, EXP_DG_COLUMN);
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let input = format!("{}\nlig_1,-10.0,0.1\n", FULL_HEADER);
        let result = ExperimentalFile::read_from(input.as_bytes());
        assert!(matches!(result, Err(ExperimentalDataError::Csv(_))));
    }

    #[test]
    fn duplicate_ligand_keeps_last_row_and_warns() {
        let input = format!(
            "{}\nlig,-10.0,0.1,-9.5,0.3\nlig,-9.0,0.1,-9.5,0.3\n",
            FULL_HEADER
        );
        let parsed = ExperimentalFile::read_from(input.as_bytes()).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data.get("lig").unwrap().exp_dg, -9.0);
        assert_eq!(
            parsed.diagnostics,
            vec![Diagnostic::DuplicateLigand {
                name: "lig".to_string(),
                line: 3
            }]
        );
    }

    #[test]
    fn quoted_names_with_commas_are_supported() {
        let input = format!("{}\n\"lig, 1\",-10.0,0.1,-9.5,0.3\n", FULL_HEADER);
        let data = ExperimentalFile::read_from(input.as_bytes()).unwrap().data;
        assert!(data.contains("lig, 1"));
    }

    #[test]
    fn read_from_path_reports_missing_file_as_io_error() {
        let dir = tempdir().unwrap();
        let result = ExperimentalFile::read_from_path(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(ExperimentalDataError::Io(_))));
    }

    #[test]
    fn read_from_path_parses_file_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("experiment.csv");
        fs::write(&path, format!("{}\nlig,-10.0,0.1,-9.5,0.3\n", FULL_HEADER)).unwrap();
        let data = ExperimentalFile::read_from_path(&path).unwrap().data;
        assert_eq!(data.len(), 1);
    }
}
