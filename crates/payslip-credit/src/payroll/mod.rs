//! Flat payroll exports turned into scoring requests.

mod parser;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::scoring::CreditScoreRequest;

#[derive(Debug)]
pub enum PayrollImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for PayrollImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayrollImportError::Io(err) => write!(f, "failed to read payroll export: {}", err),
            PayrollImportError::Csv(err) => write!(f, "invalid payroll CSV data: {}", err),
            PayrollImportError::InvalidValue {
                line,
                column,
                value,
            } => write!(
                f,
                "line {line}: column '{column}' holds unparseable value '{value}'"
            ),
        }
    }
}

impl std::error::Error for PayrollImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayrollImportError::Io(err) => Some(err),
            PayrollImportError::Csv(err) => Some(err),
            PayrollImportError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for PayrollImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PayrollImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads payroll CSV exports with one applicant per row.
pub struct PayrollCsvImporter;

impl PayrollCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CreditScoreRequest>, PayrollImportError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CreditScoreRequest>, PayrollImportError> {
        parser::parse_requests(reader)
    }
}
