use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::domain::{FinancialRecord, RedFlag};
use super::error::ScoringError;
use super::pipeline::{ratio, RunningScore, ScoringContext};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Optional penalty on the requested amount as a multiple of annual net pay.
pub(crate) fn income_multiple(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let Some(bands) = &context.config.affordability_bands else {
        return Ok(score);
    };

    let annual_income = record
        .net_salary
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| ScoringError::overflow("annual net income"))?;
    let multiple = ratio(record.requested_loan_amount, annual_income, "net_salary")?;

    score.affordability_adjustment = bands.points_for(multiple).min(0);
    Ok(score)
}

/// Payment-capacity penalties, only for loans at or above the configured threshold.
pub(crate) fn large_loan(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let rules = &context.config.large_loan;
    if record.requested_loan_amount < rules.threshold {
        return Ok(score);
    }

    let payment = match record.estimated_monthly_payment {
        Some(payment) => payment,
        None => rules
            .payment_policy
            .monthly_payment(record.requested_loan_amount)?,
    };
    let payment_share = ratio(payment, record.net_salary, "net_salary")?;

    let mut adjustment = rules.payment_to_net.points_for(payment_share);
    if record
        .indicators
        .disposable_income
        .is_some_and(|disposable| disposable < payment)
    {
        adjustment = adjustment.saturating_add(rules.disposable_shortfall_penalty);
    }

    score.large_loan_adjustment = adjustment.min(0);
    score.estimated_monthly_payment = Some(payment);
    Ok(score)
}

/// Ceilings for active garnishment and excessive existing debt; the lowest one wins.
pub(crate) fn red_flags(
    record: &FinancialRecord,
    mut score: RunningScore,
    context: &ScoringContext<'_>,
) -> Result<RunningScore, ScoringError> {
    let rules = &context.config.red_flags;

    if record.has_active_garnishment() {
        score.red_flags.push(RedFlag::ActiveGarnishment);
        score.red_flag_cap = tighter(score.red_flag_cap, rules.garnishment_cap);
    }

    if record
        .indicators
        .loan_to_net_ratio
        .is_some_and(|ratio| ratio > rules.debt_ratio_limit)
    {
        score.red_flags.push(RedFlag::ExcessiveDebtRatio);
        score.red_flag_cap = tighter(score.red_flag_cap, rules.debt_ratio_cap);
    }

    Ok(score)
}

fn tighter(current: Option<u8>, candidate: u8) -> Option<u8> {
    Some(current.map_or(candidate, |cap| cap.min(candidate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::ScoringConfig;
    use crate::scoring::domain::IndicatorSet;
    use crate::scoring::payment::PaymentPolicy;
    use crate::scoring::pipeline::Stage;
    use chrono::NaiveDate;

    fn record() -> FinancialRecord {
        FinancialRecord {
            net_salary: dec!(2700),
            gross_salary: dec!(3200),
            basic_salary: dec!(2800),
            employment_start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            pension: Decimal::ZERO,
            garnishments: Decimal::ZERO,
            indicators: IndicatorSet {
                net_to_gross_ratio: dec!(0.84),
                loan_to_net_ratio: Some(dec!(0.05)),
                disposable_income: Some(dec!(1000)),
                income_stability_flag: true,
            },
            requested_loan_amount: dec!(150000),
            estimated_monthly_payment: None,
        }
    }

    fn run(
        stage: Stage,
        record: &FinancialRecord,
        config: &ScoringConfig,
    ) -> RunningScore {
        let context = ScoringContext {
            config,
            evaluation_date: NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
        };
        stage(record, RunningScore::default(), &context).expect("stage succeeds")
    }

    #[test]
    fn large_loan_stacks_band_and_shortfall_penalties() {
        let score = run(large_loan, &record(), &ScoringConfig::default());

        assert_eq!(score.estimated_monthly_payment, Some(dec!(1500)));
        assert_eq!(score.large_loan_adjustment, -35);
    }

    #[test]
    fn large_loan_middle_band_without_shortfall() {
        let mut record = record();
        record.net_salary = dec!(3600);
        record.indicators.disposable_income = Some(dec!(1500));

        let score = run(large_loan, &record, &ScoringConfig::default());
        assert_eq!(score.large_loan_adjustment, -10);
    }

    #[test]
    fn payment_share_bounds_are_exclusive_below() {
        let config = ScoringConfig::default();
        let mut record = record();
        record.indicators.disposable_income = None;

        record.estimated_monthly_payment = Some(dec!(1350));
        assert_eq!(run(large_loan, &record, &config).large_loan_adjustment, -10);

        record.estimated_monthly_payment = Some(dec!(945));
        assert_eq!(run(large_loan, &record, &config).large_loan_adjustment, 0);
    }

    #[test]
    fn small_loans_skip_the_large_loan_path() {
        let mut record = record();
        record.requested_loan_amount = dec!(99999.99);

        let score = run(large_loan, &record, &ScoringConfig::default());
        assert_eq!(score.large_loan_adjustment, 0);
        assert!(score.estimated_monthly_payment.is_none());
    }

    #[test]
    fn threshold_amount_triggers_the_path() {
        let mut record = record();
        record.requested_loan_amount = dec!(100000);
        record.net_salary = dec!(5000);

        let score = run(large_loan, &record, &ScoringConfig::default());
        assert_eq!(score.estimated_monthly_payment, Some(dec!(1000)));
        assert_eq!(score.large_loan_adjustment, 0);
    }

    #[test]
    fn supplied_payment_overrides_policy() {
        let mut config = ScoringConfig::default();
        config.large_loan.payment_policy = PaymentPolicy::Amortized {
            annual_rate: dec!(0.05),
            term_months: 240,
        };
        let mut record = record();
        record.estimated_monthly_payment = Some(dec!(400));

        let score = run(large_loan, &record, &config);
        assert_eq!(score.estimated_monthly_payment, Some(dec!(400)));
        assert_eq!(score.large_loan_adjustment, 0);
    }

    #[test]
    fn income_multiple_is_disabled_by_default() {
        let score = run(income_multiple, &record(), &ScoringConfig::default());
        assert_eq!(score.affordability_adjustment, 0);
    }

    #[test]
    fn income_multiple_penalises_large_multiples() {
        let config = ScoringConfig::with_income_multiple_rules();
        let mut record = record();

        for (amount, expected) in [
            (dec!(64800), 0),
            (dec!(64801), -5),
            (dec!(100000), -10),
            (dec!(170000), -20),
            (dec!(300000), -30),
        ] {
            record.requested_loan_amount = amount;
            assert_eq!(
                run(income_multiple, &record, &config).affordability_adjustment,
                expected,
                "amount {amount}"
            );
        }
    }

    #[test]
    fn red_flags_take_the_lowest_cap() {
        let config = ScoringConfig::default();
        let mut record = record();

        record.garnishments = dec!(500);
        let score = run(red_flags, &record, &config);
        assert_eq!(score.red_flag_cap, Some(30));
        assert_eq!(score.red_flags, vec![RedFlag::ActiveGarnishment]);

        record.indicators.loan_to_net_ratio = Some(dec!(0.51));
        let score = run(red_flags, &record, &config);
        assert_eq!(score.red_flag_cap, Some(30));
        assert_eq!(
            score.red_flags,
            vec![RedFlag::ActiveGarnishment, RedFlag::ExcessiveDebtRatio]
        );

        record.garnishments = Decimal::ZERO;
        let score = run(red_flags, &record, &config);
        assert_eq!(score.red_flag_cap, Some(40));
    }

    #[test]
    fn debt_ratio_at_limit_is_not_flagged() {
        let mut record = record();
        record.indicators.loan_to_net_ratio = Some(dec!(0.50));

        let score = run(red_flags, &record, &ScoringConfig::default());
        assert!(score.red_flag_cap.is_none());
        assert!(score.red_flags.is_empty());
    }
}
