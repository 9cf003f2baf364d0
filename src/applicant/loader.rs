//! Load applicant batches from CSV

use super::{ApplicantRecord, Country};
use anyhow::{Context, Result};
use csv::{Reader, Trim};
use std::path::Path;

/// Raw CSV row matching the applicant batch columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: Option<String>,
    country: String,
    credit_score: u32,
    income: f64,
    loan_amount: f64,
    existing_debt: Option<f64>,
    employment_years: Option<f64>,
}

impl CsvRow {
    fn to_applicant(self) -> Result<ApplicantRecord> {
        let country: Country = self.country.parse()?;

        let mut applicant = ApplicantRecord::new(
            country,
            self.credit_score,
            self.income,
            self.loan_amount,
            self.existing_debt.unwrap_or(0.0),
            self.employment_years.unwrap_or(0.0),
        );
        applicant.id = self.id.filter(|id| !id.is_empty());
        Ok(applicant)
    }
}

/// Load all applicants from a CSV file
pub fn load_applicants<P: AsRef<Path>>(path: P) -> Result<Vec<ApplicantRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening applicant file {}", path.display()))?;
    load_applicants_from_reader(file)
        .with_context(|| format!("reading applicants from {}", path.display()))
}

/// Load applicants from any reader (e.g., string buffer, stdin)
pub fn load_applicants_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ApplicantRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    read_rows(&mut csv_reader)
}

fn read_rows<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<ApplicantRecord>> {
    let mut applicants = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row: CsvRow = result.with_context(|| format!("malformed row at line {}", line))?;
        let applicant = row
            .to_applicant()
            .with_context(|| format!("invalid applicant at line {}", line))?;
        applicants.push(applicant);
    }

    log::debug!("loaded {} applicants", applicants.len());
    Ok(applicants)
}
