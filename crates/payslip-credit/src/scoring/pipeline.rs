use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::adjustments;
use super::config::ScoringConfig;
use super::domain::{FinancialRecord, PillarScores, RedFlag, ScoreBreakdown};
use super::error::ScoringError;
use super::pillars;

/// Inputs shared by every stage of one evaluation.
pub(crate) struct ScoringContext<'a> {
    pub config: &'a ScoringConfig,
    pub evaluation_date: NaiveDate,
}

/// Accumulator folded through the stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RunningScore {
    pub pillars: PillarScores,
    pub affordability_adjustment: i16,
    pub large_loan_adjustment: i16,
    pub estimated_monthly_payment: Option<Decimal>,
    pub red_flag_cap: Option<u8>,
    pub red_flags: Vec<RedFlag>,
}

impl RunningScore {
    pub fn into_breakdown(self) -> ScoreBreakdown {
        let pillar_subtotal = self.pillars.subtotal();
        let adjusted = pillar_subtotal
            .saturating_add(self.affordability_adjustment)
            .saturating_add(self.large_loan_adjustment);
        let ceiling = self.red_flag_cap.map(i16::from).unwrap_or(100);
        let final_score = adjusted.min(ceiling).clamp(0, 100) as u8;

        ScoreBreakdown {
            pillars: self.pillars,
            pillar_subtotal,
            affordability_adjustment: self.affordability_adjustment,
            large_loan_adjustment: self.large_loan_adjustment,
            estimated_monthly_payment: self.estimated_monthly_payment,
            red_flag_cap: self.red_flag_cap,
            red_flags: self.red_flags,
            final_score,
        }
    }
}

pub(crate) type Stage =
    fn(&FinancialRecord, RunningScore, &ScoringContext<'_>) -> Result<RunningScore, ScoringError>;

/// Fixed stage order: pillars first, then additive adjustments, then ceilings.
pub(crate) const PIPELINE: [(&str, Stage); 7] = [
    ("income_strength", pillars::income_strength),
    ("debt_burden", pillars::debt_burden),
    ("financial_discipline", pillars::financial_discipline),
    ("employment_stability", pillars::employment_stability),
    ("income_multiple", adjustments::income_multiple),
    ("large_loan", adjustments::large_loan),
    ("red_flags", adjustments::red_flags),
];

pub(crate) fn run(
    record: &FinancialRecord,
    context: &ScoringContext<'_>,
) -> Result<ScoreBreakdown, ScoringError> {
    let running = PIPELINE
        .iter()
        .try_fold(RunningScore::default(), |score, (_, stage)| {
            stage(record, score, context)
        })?;
    Ok(running.into_breakdown())
}

/// `numerator / denominator`, reporting a non-positive denominator as missing data.
pub(crate) fn ratio(
    numerator: Decimal,
    denominator: Decimal,
    field: &'static str,
) -> Result<Decimal, ScoringError> {
    if denominator <= Decimal::ZERO {
        return Err(ScoringError::MissingCriticalData { field });
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| ScoringError::overflow(field))
}
