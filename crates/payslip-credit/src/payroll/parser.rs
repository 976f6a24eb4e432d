use std::io::Read;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use super::PayrollImportError;
use crate::scoring::{CreditScoreRequest, PayslipFeatures, PayslipIndicators};

pub(crate) fn parse_requests<R: Read>(
    reader: R,
) -> Result<Vec<CreditScoreRequest>, PayrollImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut requests = Vec::new();

    for (index, record) in csv_reader.deserialize::<PayrollRow>().enumerate() {
        let row = record?;
        // header occupies line 1
        requests.push(row.into_request(index + 2)?);
    }

    Ok(requests)
}

#[derive(Debug, Deserialize)]
struct PayrollRow {
    user_id: String,
    loan_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    requested_loan_amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    net_salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gross_salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    basic_salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employment_start_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pension: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    garnishments: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    net_to_gross_ratio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    loan_to_net_ratio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    disposable_income: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    income_stability_flag: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    estimated_monthly_payment: Option<String>,
}

impl PayrollRow {
    fn into_request(self, line: usize) -> Result<CreditScoreRequest, PayrollImportError> {
        let amount = |value: &Option<String>, column: &'static str| decimal(value, column, line);

        let indicators = PayslipIndicators {
            net_to_gross_ratio: amount(&self.net_to_gross_ratio, "net_to_gross_ratio")?,
            loan_to_net_ratio: amount(&self.loan_to_net_ratio, "loan_to_net_ratio")?,
            disposable_income: amount(&self.disposable_income, "disposable_income")?,
            income_stability_flag: flag(&self.income_stability_flag, "income_stability_flag", line)?,
            ..PayslipIndicators::default()
        };

        Ok(CreditScoreRequest {
            requested_loan_amount: amount(&self.requested_loan_amount, "requested_loan_amount")?,
            estimated_monthly_payment: amount(
                &self.estimated_monthly_payment,
                "estimated_monthly_payment",
            )?,
            evaluation_date: None,
            features: PayslipFeatures {
                net_salary: amount(&self.net_salary, "net_salary")?,
                gross_salary: amount(&self.gross_salary, "gross_salary")?,
                basic_salary: amount(&self.basic_salary, "basic_salary")?,
                employment_start_date: self.employment_start_date,
                pension: amount(&self.pension, "pension")?,
                garnishments: amount(&self.garnishments, "garnishments")?,
                indicators,
            },
            user_id: self.user_id,
            loan_id: self.loan_id,
        })
    }
}

fn decimal(
    value: &Option<String>,
    column: &'static str,
    line: usize,
) -> Result<Option<Decimal>, PayrollImportError> {
    value
        .as_deref()
        .map(|raw| {
            Decimal::from_str(raw).map_err(|_| PayrollImportError::InvalidValue {
                line,
                column,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn flag(
    value: &Option<String>,
    column: &'static str,
    line: usize,
) -> Result<Option<bool>, PayrollImportError> {
    let Some(raw) = value.as_deref() else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(Some(true)),
        "false" | "no" | "n" | "0" => Ok(Some(false)),
        _ => Err(PayrollImportError::InvalidValue {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
