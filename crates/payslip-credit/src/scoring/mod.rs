//! Payslip credit scoring: four pillar evaluators, a large-loan adjuster, and red-flag ceilings
//! folded over a validated financial record.

mod adjustments;
pub mod bands;
mod config;
pub mod domain;
mod error;
mod payment;
mod pillars;
mod pipeline;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

pub use bands::{Band, BandTable, Comparison};
pub use config::{
    DebtRules, DisciplineRules, EmploymentRules, IncomeRules, LargeLoanRules, PensionBasis,
    RedFlagRules, ScoringConfig, ScoringConfigError,
};
pub use domain::{
    CreditBreakdownResponse, CreditScoreRequest, CreditScoreResponse, FinancialRecord,
    IndicatorSet, PayslipFeatures, PayslipIndicators, PillarScores, RedFlag, ScoreBreakdown,
};
pub use error::ScoringError;
pub use payment::PaymentPolicy;
pub use router::credit_router;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use pipeline::ScoringContext;

/// Stateless evaluator applying an immutable rule set to financial records.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: Arc<ScoringConfig>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self::shared(Arc::new(config))
    }

    pub fn shared(config: Arc<ScoringConfig>) -> Self {
        Self { config }
    }

    /// Score a validated record as of `evaluation_date`.
    pub fn evaluate(
        &self,
        record: &FinancialRecord,
        evaluation_date: NaiveDate,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let context = ScoringContext {
            config: &self.config,
            evaluation_date,
        };
        let breakdown = pipeline::run(record, &context)?;

        debug!(
            pillar_subtotal = breakdown.pillar_subtotal,
            affordability_adjustment = breakdown.affordability_adjustment,
            large_loan_adjustment = breakdown.large_loan_adjustment,
            red_flag_cap = ?breakdown.red_flag_cap,
            final_score = breakdown.final_score,
            "credit score evaluated"
        );

        Ok(breakdown)
    }

    /// Validate an inbound request and score it.
    pub fn score_request(
        &self,
        request: &CreditScoreRequest,
        evaluation_date: NaiveDate,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let record =
            validation::record_from_request(request, self.config.default_requested_loan_amount)?;
        self.evaluate(&record, evaluation_date)
    }

    /// Score a request and shape the public response.
    pub fn respond(
        &self,
        request: &CreditScoreRequest,
        evaluation_date: NaiveDate,
    ) -> Result<CreditScoreResponse, ScoringError> {
        let breakdown = self.score_request(request, evaluation_date)?;
        Ok(CreditScoreResponse {
            user_id: request.user_id.clone(),
            loan_id: request.loan_id.clone(),
            credit_score: breakdown.final_score,
        })
    }
}
