use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::bands::{Band, BandTable};
use super::payment::PaymentPolicy;

/// Complete rule set consumed by the scoring pipeline.
///
/// `Default` yields the reference rule set. Every section deserializes with defaults so a rules
/// file only needs to name the tables it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub income: IncomeRules,
    pub debt: DebtRules,
    pub discipline: DisciplineRules,
    pub employment: EmploymentRules,
    pub large_loan: LargeLoanRules,
    pub red_flags: RedFlagRules,
    /// Penalty table over `requested_loan_amount / (net_salary * 12)`; disabled when `None`.
    pub affordability_bands: Option<BandTable>,
    /// Loan amount scored when a request does not name one.
    pub default_requested_loan_amount: Decimal,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            income: IncomeRules::default(),
            debt: DebtRules::default(),
            discipline: DisciplineRules::default(),
            employment: EmploymentRules::default(),
            large_loan: LargeLoanRules::default(),
            red_flags: RedFlagRules::default(),
            affordability_bands: None,
            default_requested_loan_amount: dec!(100000),
        }
    }
}

impl ScoringConfig {
    /// Reference rules plus the income-multiple affordability penalties.
    pub fn with_income_multiple_rules() -> Self {
        Self {
            affordability_bands: Some(BandTable::new(
                vec![
                    Band::above(dec!(8), -30),
                    Band::above(dec!(5), -20),
                    Band::above(dec!(3), -10),
                    Band::above(dec!(2), -5),
                ],
                0,
            )),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if self.large_loan.threshold <= Decimal::ZERO {
            return Err(ScoringConfigError::NonPositive {
                field: "large_loan.threshold",
                value: self.large_loan.threshold,
            });
        }
        if self.default_requested_loan_amount < Decimal::ZERO {
            return Err(ScoringConfigError::NonPositive {
                field: "default_requested_loan_amount",
                value: self.default_requested_loan_amount,
            });
        }
        if self.employment.days_per_year <= Decimal::ZERO {
            return Err(ScoringConfigError::NonPositive {
                field: "employment.days_per_year",
                value: self.employment.days_per_year,
            });
        }
        if let Some(reason) = self.large_loan.payment_policy.problem() {
            return Err(ScoringConfigError::PaymentPolicy(reason));
        }

        let mut penalties = vec![
            (
                "large_loan.payment_to_net",
                self.large_loan.payment_to_net.min_points(),
                self.large_loan.payment_to_net.max_points(),
            ),
            (
                "large_loan.disposable_shortfall_penalty",
                self.large_loan.disposable_shortfall_penalty,
                self.large_loan.disposable_shortfall_penalty,
            ),
        ];
        if let Some(bands) = &self.affordability_bands {
            penalties.push(("affordability_bands", bands.min_points(), bands.max_points()));
        }
        for (table, lowest, highest) in penalties {
            if highest > 0 {
                return Err(ScoringConfigError::PositiveAdjustment { table });
            }
            if lowest < MAX_PENALTY {
                return Err(ScoringConfigError::PenaltyTooSevere {
                    table,
                    points: lowest,
                });
            }
        }

        let mut total = 0;
        for (component, lowest, highest) in self.pillar_components() {
            if lowest < 0 {
                return Err(ScoringConfigError::NegativePillarPoints {
                    component,
                    points: lowest,
                });
            }
            total += i32::from(highest);
        }
        if total > MAX_SCORE {
            return Err(ScoringConfigError::PillarTotalExceeded { total });
        }

        for (field, cap) in [
            ("red_flags.garnishment_cap", self.red_flags.garnishment_cap),
            ("red_flags.debt_ratio_cap", self.red_flags.debt_ratio_cap),
        ] {
            if cap > 100 {
                return Err(ScoringConfigError::CapOutOfRange { field, cap });
            }
        }

        Ok(())
    }

    /// Lowest and highest points each pillar component can award.
    fn pillar_components(&self) -> [(&'static str, i16, i16); 8] {
        let table = |name: &'static str, bands: &BandTable| {
            (name, bands.min_points(), bands.max_points())
        };
        let bonus = |name: &'static str, points: i16| (name, points, points);
        [
            table("income.net_to_gross", &self.income.net_to_gross),
            table("income.basic_to_gross", &self.income.basic_to_gross),
            bonus("income.stability_bonus", self.income.stability_bonus),
            table("debt.loan_to_net", &self.debt.loan_to_net),
            bonus("debt.no_garnishment_bonus", self.debt.no_garnishment_bonus),
            table("discipline.disposable_ratio", &self.discipline.disposable_ratio),
            table("discipline.pension_ratio", &self.discipline.pension_ratio),
            table("employment.tenure_years", &self.employment.tenure_years),
        ]
    }
}

const MAX_SCORE: i32 = 100;
const MAX_PENALTY: i16 = -100;

/// Income strength pillar, worth at most 35 points under the reference rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeRules {
    pub net_to_gross: BandTable,
    pub basic_to_gross: BandTable,
    pub stability_bonus: i16,
}

impl Default for IncomeRules {
    fn default() -> Self {
        Self {
            net_to_gross: BandTable::new(
                vec![
                    Band::at_least(dec!(0.85), 20),
                    Band::at_least(dec!(0.75), 15),
                    Band::at_least(dec!(0.65), 10),
                ],
                5,
            ),
            basic_to_gross: BandTable::new(
                vec![Band::at_least(dec!(0.80), 10), Band::at_least(dec!(0.60), 5)],
                0,
            ),
            stability_bonus: 5,
        }
    }
}

/// Existing debt burden pillar (max 35).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtRules {
    pub loan_to_net: BandTable,
    pub no_garnishment_bonus: i16,
}

impl Default for DebtRules {
    fn default() -> Self {
        Self {
            loan_to_net: BandTable::new(
                vec![
                    Band::at_most(dec!(0.10), 25),
                    Band::at_most(dec!(0.25), 15),
                    Band::at_most(dec!(0.40), 5),
                ],
                0,
            ),
            no_garnishment_bonus: 10,
        }
    }
}

/// Denominator used for the pension contribution ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionBasis {
    Basic,
    Gross,
    Net,
}

/// Spending and saving behaviour pillar (max 20).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisciplineRules {
    pub disposable_ratio: BandTable,
    pub pension_ratio: BandTable,
    pub pension_basis: PensionBasis,
}

impl Default for DisciplineRules {
    fn default() -> Self {
        Self {
            disposable_ratio: BandTable::new(
                vec![
                    Band::above(dec!(0.40), 15),
                    Band::at_least(dec!(0.25), 10),
                    Band::at_least(dec!(0.15), 5),
                ],
                0,
            ),
            pension_ratio: BandTable::new(vec![Band::at_least(dec!(0.05), 5)], 0),
            pension_basis: PensionBasis::Basic,
        }
    }
}

/// Tenure pillar (max 10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentRules {
    pub tenure_years: BandTable,
    pub days_per_year: Decimal,
}

impl Default for EmploymentRules {
    fn default() -> Self {
        Self {
            tenure_years: BandTable::new(
                vec![Band::above(dec!(3), 10), Band::above(dec!(1), 5)],
                0,
            ),
            days_per_year: dec!(365.25),
        }
    }
}

/// Penalties applied when the requested loan is at or above `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LargeLoanRules {
    pub threshold: Decimal,
    pub payment_policy: PaymentPolicy,
    /// Penalty table over `estimated_payment / net_salary`.
    pub payment_to_net: BandTable,
    /// Added when disposable income does not cover the estimated payment.
    pub disposable_shortfall_penalty: i16,
}

impl Default for LargeLoanRules {
    fn default() -> Self {
        Self {
            threshold: dec!(100000),
            payment_policy: PaymentPolicy::default(),
            payment_to_net: BandTable::new(
                vec![Band::above(dec!(0.50), -20), Band::above(dec!(0.35), -10)],
                0,
            ),
            disposable_shortfall_penalty: -15,
        }
    }
}

/// Hard ceilings for distress signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedFlagRules {
    pub garnishment_cap: u8,
    pub debt_ratio_limit: Decimal,
    pub debt_ratio_cap: u8,
}

impl Default for RedFlagRules {
    fn default() -> Self {
        Self {
            garnishment_cap: 30,
            debt_ratio_limit: dec!(0.50),
            debt_ratio_cap: 40,
        }
    }
}

/// Rejected rule set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{field} must be positive (found {value})")]
    NonPositive { field: &'static str, value: Decimal },
    #[error("invalid payment policy: {0}")]
    PaymentPolicy(String),
    #[error("{table} may only contain penalties (points <= 0)")]
    PositiveAdjustment { table: &'static str },
    #[error("{table} penalty {points} is below -100")]
    PenaltyTooSevere { table: &'static str, points: i16 },
    #[error("{component} can award negative points ({points})")]
    NegativePillarPoints { component: &'static str, points: i16 },
    #[error("pillar maxima sum to {total}, above 100")]
    PillarTotalExceeded { total: i32 },
    #[error("{field} must lie within 0..=100 (found {cap})")]
    CapOutOfRange { field: &'static str, cap: u8 },
}
