use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inbound scoring request as produced by the payslip analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreRequest {
    pub user_id: String,
    pub loan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_loan_amount: Option<Decimal>,
    /// Instalment supplied by an upstream pricing service; overrides the configured policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_payment: Option<Decimal>,
    /// Date tenure is measured against. The transport layer fills in today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_date: Option<NaiveDate>,
    pub features: PayslipFeatures,
}

/// Payslip-derived amounts. Everything is optional on the wire so absence can be reported
/// field by field during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayslipFeatures {
    #[serde(default)]
    pub net_salary: Option<Decimal>,
    #[serde(default)]
    pub gross_salary: Option<Decimal>,
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    #[serde(default)]
    pub employment_start_date: Option<String>,
    #[serde(default)]
    pub pension: Option<Decimal>,
    #[serde(default)]
    pub garnishments: Option<Decimal>,
    pub indicators: PayslipIndicators,
}

/// Ratios and flags computed upstream from the payslip.
///
/// Only four of these feed the score; the rest are part of the request contract and are kept
/// as-is, together with any indicator this crate does not know about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayslipIndicators {
    #[serde(default)]
    pub net_to_gross_ratio: Option<Decimal>,
    #[serde(default)]
    pub deduction_ratio: Option<Decimal>,
    #[serde(default)]
    pub allowance_ratio: Option<Decimal>,
    #[serde(default)]
    pub overtime_ratio: Option<Decimal>,
    #[serde(default)]
    pub bonus_ratio: Option<Decimal>,
    #[serde(default)]
    pub loan_to_net_ratio: Option<Decimal>,
    #[serde(default)]
    pub estimated_tax_rate: Option<Decimal>,
    #[serde(default)]
    pub disposable_income: Option<Decimal>,
    #[serde(default)]
    pub savings_potential: Option<Decimal>,
    #[serde(default)]
    pub income_stability_flag: Option<bool>,
    #[serde(default)]
    pub benefits_value_estimate: Option<Decimal>,
    #[serde(default)]
    pub probable_student_flag: Option<bool>,
    #[serde(flatten)]
    pub additional: BTreeMap<String, serde_json::Value>,
}

/// Outbound score, clamped to 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScoreResponse {
    pub user_id: String,
    pub loan_id: String,
    pub credit_score: u8,
}

/// Debugging view exposing every intermediate stage result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditBreakdownResponse {
    pub user_id: String,
    pub loan_id: String,
    pub evaluation_date: NaiveDate,
    pub breakdown: ScoreBreakdown,
}

/// Validated, immutable snapshot the pipeline scores.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    pub net_salary: Decimal,
    pub gross_salary: Decimal,
    pub basic_salary: Decimal,
    pub employment_start_date: Option<NaiveDate>,
    pub pension: Decimal,
    pub garnishments: Decimal,
    pub indicators: IndicatorSet,
    pub requested_loan_amount: Decimal,
    pub estimated_monthly_payment: Option<Decimal>,
}

impl FinancialRecord {
    pub fn has_active_garnishment(&self) -> bool {
        self.garnishments > Decimal::ZERO
    }
}

/// Indicators consumed by the scoring rules.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub net_to_gross_ratio: Decimal,
    pub loan_to_net_ratio: Option<Decimal>,
    pub disposable_income: Option<Decimal>,
    pub income_stability_flag: bool,
}

/// Points awarded by each of the four pillars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScores {
    pub income_strength: i16,
    pub debt_burden: i16,
    pub financial_discipline: i16,
    pub employment_stability: i16,
}

impl PillarScores {
    pub fn subtotal(&self) -> i16 {
        self.income_strength
            .saturating_add(self.debt_burden)
            .saturating_add(self.financial_discipline)
            .saturating_add(self.employment_stability)
    }
}

/// Distress signal that imposed a ceiling on the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    ActiveGarnishment,
    ExcessiveDebtRatio,
}

/// Full result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub pillars: PillarScores,
    pub pillar_subtotal: i16,
    pub affordability_adjustment: i16,
    pub large_loan_adjustment: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_payment: Option<Decimal>,
    pub red_flag_cap: Option<u8>,
    pub red_flags: Vec<RedFlag>,
    pub final_score: u8,
}
