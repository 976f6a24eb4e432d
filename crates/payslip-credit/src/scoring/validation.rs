use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;

use super::domain::{CreditScoreRequest, FinancialRecord, IndicatorSet, PayslipFeatures};
use super::error::ScoringError;

/// Convert an inbound request into a validated record.
///
/// Net and gross salary are required divisors; the remaining amounts default to zero when
/// absent. Ratio indicators outside their domain are rejected rather than clamped.
pub fn record_from_request(
    request: &CreditScoreRequest,
    default_requested_loan_amount: Decimal,
) -> Result<FinancialRecord, ScoringError> {
    let features = &request.features;

    let net_salary = required_positive(features.net_salary, "net_salary")?;
    let gross_salary = required_positive(features.gross_salary, "gross_salary")?;
    let basic_salary = non_negative(features.basic_salary, "basic_salary")?;
    let pension = non_negative(features.pension, "pension")?;
    let garnishments = non_negative(features.garnishments, "garnishments")?;
    let requested_loan_amount = non_negative(
        Some(
            request
                .requested_loan_amount
                .unwrap_or(default_requested_loan_amount),
        ),
        "requested_loan_amount",
    )?;
    let estimated_monthly_payment = request
        .estimated_monthly_payment
        .map(|payment| non_negative(Some(payment), "estimated_monthly_payment"))
        .transpose()?;

    let indicators = indicator_set(features, net_salary, gross_salary)?;
    let employment_start_date = features
        .employment_start_date
        .as_deref()
        .map(parse_start_date)
        .transpose()?;

    Ok(FinancialRecord {
        net_salary,
        gross_salary,
        basic_salary,
        employment_start_date,
        pension,
        garnishments,
        indicators,
        requested_loan_amount,
        estimated_monthly_payment,
    })
}

fn indicator_set(
    features: &PayslipFeatures,
    net_salary: Decimal,
    gross_salary: Decimal,
) -> Result<IndicatorSet, ScoringError> {
    let raw = &features.indicators;

    let net_to_gross_ratio = match raw.net_to_gross_ratio {
        Some(ratio) => ratio,
        None => net_salary
            .checked_div(gross_salary)
            .ok_or_else(|| ScoringError::overflow("net-to-gross ratio"))?,
    };
    if net_to_gross_ratio < Decimal::ZERO || net_to_gross_ratio > Decimal::ONE {
        return Err(ScoringError::InvalidIndicator {
            field: "net_to_gross_ratio",
            value: net_to_gross_ratio,
            expected: "[0, 1]",
        });
    }

    if let Some(ratio) = raw.loan_to_net_ratio {
        if ratio < Decimal::ZERO {
            return Err(ScoringError::InvalidIndicator {
                field: "loan_to_net_ratio",
                value: ratio,
                expected: ">= 0",
            });
        }
    }

    Ok(IndicatorSet {
        net_to_gross_ratio,
        loan_to_net_ratio: raw.loan_to_net_ratio,
        disposable_income: raw.disposable_income,
        income_stability_flag: raw.income_stability_flag.unwrap_or(false),
    })
}

fn required_positive(value: Option<Decimal>, field: &'static str) -> Result<Decimal, ScoringError> {
    match value {
        Some(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(ScoringError::MissingCriticalData { field }),
    }
}

fn non_negative(value: Option<Decimal>, field: &'static str) -> Result<Decimal, ScoringError> {
    let amount = value.unwrap_or(Decimal::ZERO);
    if amount < Decimal::ZERO {
        return Err(ScoringError::InvalidAmount {
            field,
            value: amount,
        });
    }
    Ok(amount)
}

/// Accepts `YYYY-MM-DD` or a timestamp whose date part is `YYYY-MM-DD`.
pub(crate) fn parse_start_date(raw: &str) -> Result<NaiveDate, ScoringError> {
    let trimmed = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }

    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|err| {
        ScoringError::InternalComputation(format!(
            "failed to parse employment_start_date '{raw}' ({err})"
        ))
    })
}
