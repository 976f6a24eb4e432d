use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::scoring::{
    credit_router, CreditScoreRequest, PayslipFeatures, PayslipIndicators, ScoringConfig,
    ScoringEngine,
};

pub(super) fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

/// Profile that earns every pillar point on a small loan.
pub(super) fn strong_request() -> CreditScoreRequest {
    CreditScoreRequest {
        user_id: "user-100".to_string(),
        loan_id: "loan-100".to_string(),
        requested_loan_amount: Some(dec!(50000)),
        estimated_monthly_payment: None,
        evaluation_date: Some(evaluation_date()),
        features: PayslipFeatures {
            net_salary: Some(dec!(4000)),
            gross_salary: Some(dec!(4600)),
            basic_salary: Some(dec!(3700)),
            employment_start_date: Some("2019-01-01".to_string()),
            pension: Some(dec!(200)),
            garnishments: Some(Decimal::ZERO),
            indicators: PayslipIndicators {
                net_to_gross_ratio: Some(dec!(0.86)),
                loan_to_net_ratio: Some(dec!(0.10)),
                disposable_income: Some(dec!(1700)),
                income_stability_flag: Some(true),
                ..PayslipIndicators::default()
            },
        },
    }
}

/// Mid-range profile (pillar subtotal 80) asking for a loan above the large-loan threshold.
pub(super) fn large_loan_request() -> CreditScoreRequest {
    CreditScoreRequest {
        user_id: "user-200".to_string(),
        loan_id: "loan-200".to_string(),
        requested_loan_amount: Some(dec!(150000)),
        estimated_monthly_payment: None,
        evaluation_date: Some(evaluation_date()),
        features: PayslipFeatures {
            net_salary: Some(dec!(2700)),
            gross_salary: Some(dec!(3200)),
            basic_salary: Some(dec!(2800)),
            employment_start_date: Some("2023-06-01".to_string()),
            pension: Some(Decimal::ZERO),
            garnishments: None,
            indicators: PayslipIndicators {
                net_to_gross_ratio: Some(dec!(0.80)),
                loan_to_net_ratio: Some(dec!(0.05)),
                disposable_income: Some(dec!(1000)),
                income_stability_flag: Some(true),
                ..PayslipIndicators::default()
            },
        },
    }
}

pub(super) fn router() -> axum::Router {
    credit_router(Arc::new(engine()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
