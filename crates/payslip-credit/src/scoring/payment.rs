use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::ScoringError;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Strategy used to estimate the monthly instalment of a requested loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentPolicy {
    /// Fixed share of the principal due every month.
    FlatRate { monthly_rate: Decimal },
    /// Level annuity over `term_months` at a nominal `annual_rate`.
    Amortized {
        annual_rate: Decimal,
        term_months: u32,
    },
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        PaymentPolicy::FlatRate {
            monthly_rate: dec!(0.01),
        }
    }
}

impl PaymentPolicy {
    pub fn monthly_payment(&self, principal: Decimal) -> Result<Decimal, ScoringError> {
        match self {
            PaymentPolicy::FlatRate { monthly_rate } => principal
                .checked_mul(*monthly_rate)
                .ok_or_else(|| ScoringError::overflow("flat-rate payment")),
            PaymentPolicy::Amortized {
                annual_rate,
                term_months,
            } => amortized_payment(principal, *annual_rate, *term_months),
        }
    }

    pub(crate) fn problem(&self) -> Option<String> {
        match self {
            PaymentPolicy::FlatRate { monthly_rate } if *monthly_rate < Decimal::ZERO => {
                Some(format!("monthly_rate {monthly_rate} must not be negative"))
            }
            PaymentPolicy::Amortized { annual_rate, .. } if *annual_rate < Decimal::ZERO => {
                Some(format!("annual_rate {annual_rate} must not be negative"))
            }
            PaymentPolicy::Amortized { term_months: 0, .. } => {
                Some("term_months must be positive".to_string())
            }
            _ => None,
        }
    }
}

fn amortized_payment(
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
) -> Result<Decimal, ScoringError> {
    if term_months == 0 {
        return Err(ScoringError::InternalComputation(
            "amortization term must be positive".to_string(),
        ));
    }

    let periods = Decimal::from(term_months);
    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate.is_zero() {
        return principal
            .checked_div(periods)
            .ok_or_else(|| ScoringError::overflow("amortized payment"));
    }

    // P * r * (1 + r)^n / ((1 + r)^n - 1)
    let growth = (Decimal::ONE + monthly_rate)
        .checked_powi(i64::from(term_months))
        .ok_or_else(|| ScoringError::overflow("amortization growth factor"))?;
    principal
        .checked_mul(monthly_rate)
        .and_then(|value| value.checked_mul(growth))
        .and_then(|value| value.checked_div(growth - Decimal::ONE))
        .ok_or_else(|| ScoringError::overflow("amortized payment"))
}
