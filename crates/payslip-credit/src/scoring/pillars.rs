use rust_decimal::Decimal;

use super::config::PensionBasis;
use super::domain::FinancialRecord;
use super::error::ScoringError;
use super::pipeline::{ratio, RunningScore, ScoringContext};

/// Retention of gross pay, base-pay share of gross, and the upstream stability flag.
pub(crate) fn income_strength(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let rules = &context.config.income;
    let composition = ratio(record.basic_salary, record.gross_salary, "gross_salary")?;

    let mut points = rules
        .net_to_gross
        .points_for(record.indicators.net_to_gross_ratio);
    points = points.saturating_add(rules.basic_to_gross.points_for(composition));
    if record.indicators.income_stability_flag {
        points = points.saturating_add(rules.stability_bonus);
    }

    score.pillars.income_strength = points;
    Ok(score)
}

/// Existing debt service relative to net pay, plus a bonus for no active garnishment.
pub(crate) fn debt_burden(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let rules = &context.config.debt;

    let mut points = record
        .indicators
        .loan_to_net_ratio
        .map(|ratio| rules.loan_to_net.points_for(ratio))
        .unwrap_or(0);
    if record.garnishments.is_zero() {
        points = points.saturating_add(rules.no_garnishment_bonus);
    }

    score.pillars.debt_burden = points;
    Ok(score)
}

/// Share of net pay left after obligations, plus pension contribution habit.
pub(crate) fn financial_discipline(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let rules = &context.config.discipline;

    let mut points = match record.indicators.disposable_income {
        Some(disposable) => {
            let share = ratio(disposable, record.net_salary, "net_salary")?;
            rules.disposable_ratio.points_for(share)
        }
        None => 0,
    };

    let basis = match rules.pension_basis {
        PensionBasis::Basic => record.basic_salary,
        PensionBasis::Gross => record.gross_salary,
        PensionBasis::Net => record.net_salary,
    };
    if basis > Decimal::ZERO {
        let contribution = ratio(record.pension, basis, "pension_basis")?;
        points = points.saturating_add(rules.pension_ratio.points_for(contribution));
    }

    score.pillars.financial_discipline = points;
    Ok(score)
}

/// Tenure in years at the evaluation date.
pub(crate) fn employment_stability(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let rules = &context.config.employment;

    let points = match record.employment_start_date {
        Some(started) => {
            let days = (context.evaluation_date - started).num_days();
            let tenure = ratio(Decimal::from(days), rules.days_per_year, "days_per_year")?;
            rules.tenure_years.points_for(tenure)
        }
        None => 0,
    };

    score.pillars.employment_stability = points;
    Ok(score)
}
