mod parser;

use std::io::Read;
use std::path::Path;

use super::subjects::{ApprovalSettings, GradeLedger, LedgerError};

#[derive(Debug)]
pub enum GradeImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Ledger { row: usize, source: LedgerError },
}

impl std::fmt::Display for GradeImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeImportError::Io(err) => write!(f, "failed to read grade sheet: {}", err),
            GradeImportError::Csv(err) => write!(f, "invalid grade sheet data: {}", err),
            GradeImportError::Ledger { row, source } => {
                write!(f, "row {} could not be applied to the ledger: {}", row, source)
            }
        }
    }
}

impl std::error::Error for GradeImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GradeImportError::Io(err) => Some(err),
            GradeImportError::Csv(err) => Some(err),
            GradeImportError::Ledger { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for GradeImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for GradeImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds a validated ledger from a CSV grade-sheet export with `Grade` and
/// `Percentage` columns.
pub struct GradeSheetImporter;

impl GradeSheetImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        settings: ApprovalSettings,
    ) -> Result<GradeLedger, GradeImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, settings)
    }

    /// Every populated row passes through `GradeLedger::add_entry`, so a
    /// sheet is held to the same rules as interactive input. A half-filled
    /// row fails ledger validation rather than being silently dropped.
    pub fn from_reader<R: Read>(
        reader: R,
        settings: ApprovalSettings,
    ) -> Result<GradeLedger, GradeImportError> {
        let mut ledger = GradeLedger::new(settings);

        for (position, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            if row.is_blank() {
                continue;
            }

            let grade = row.grade.unwrap_or(f64::NAN);
            let weight_percent = row.weight_percent.unwrap_or(f64::NAN);
            ledger
                .add_entry(grade, weight_percent)
                .map_err(|source| GradeImportError::Ledger {
                    row: position + 1,
                    source,
                })?;
        }

        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn settings() -> ApprovalSettings {
        ApprovalSettings::default()
    }

    #[test]
    fn importer_builds_ledger_from_sheet() {
        let csv = "Grade,Percentage\n4.5,20\n3.0,30\n";
        let ledger =
            GradeSheetImporter::from_reader(Cursor::new(csv), settings()).expect("import succeeds");

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_percent(), 50.0);
        assert_eq!(ledger.entries()[0].grade, 4.5);
        assert_eq!(ledger.entries()[1].weight_percent, 30.0);
    }

    #[test]
    fn importer_skips_blank_template_rows() {
        let csv = "Grade,Percentage\n4.5,20\n,\n  ,  \n3.0,30\n";
        let ledger =
            GradeSheetImporter::from_reader(Cursor::new(csv), settings()).expect("import succeeds");

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_percent(), 50.0);
    }

    #[test]
    fn importer_rejects_half_filled_rows() {
        let csv = "Grade,Percentage\n4.5,\n";
        let error = GradeSheetImporter::from_reader(Cursor::new(csv), settings())
            .expect_err("half-filled row must fail");

        match error {
            GradeImportError::Ledger { row: 1, source } => {
                assert!(matches!(source, LedgerError::InvalidPercentage { .. }));
            }
            other => panic!("expected ledger rejection, got {other:?}"),
        }
    }

    #[test]
    fn importer_reports_row_breaching_weight_cap() {
        let csv = "Grade,Percentage\n4.0,60\n3.0,30\n5.0,20\n";
        let error = GradeSheetImporter::from_reader(Cursor::new(csv), settings())
            .expect_err("cap breach must fail");

        match error {
            GradeImportError::Ledger { row: 3, source } => {
                assert!(matches!(
                    source,
                    LedgerError::PercentageCapExceeded { .. }
                ));
            }
            other => panic!("expected cap rejection on row 3, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_non_numeric_cells() {
        let csv = "Grade,Percentage\nfour,20\n";
        let error = GradeSheetImporter::from_reader(Cursor::new(csv), settings())
            .expect_err("non-numeric cell must fail");

        match error {
            GradeImportError::Csv(_) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = GradeSheetImporter::from_path("./does-not-exist.csv", settings())
            .expect_err("expected io error");

        match error {
            GradeImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
