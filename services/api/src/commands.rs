use crate::infra::{parse_date, today};
use chrono::NaiveDate;
use clap::Args;
use payslip_credit::config::AppConfig;
use payslip_credit::error::AppError;
use payslip_credit::payroll::PayrollCsvImporter;
use payslip_credit::scoring::{CreditBreakdownResponse, CreditScoreRequest, ScoringEngine};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding one scoring request
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Date tenure is measured against (YYYY-MM-DD, defaults to the request's date or today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) evaluation_date: Option<NaiveDate>,
    /// Print every intermediate stage result instead of the public response
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Payroll CSV export with one applicant per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Date tenure is measured against (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) evaluation_date: Option<NaiveDate>,
}

/// One line of batch output; rows that fail carry the error instead of a score.
#[derive(Debug, Serialize)]
pub(crate) struct BatchOutcome {
    pub(crate) user_id: String,
    pub(crate) loan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) credit_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let output = score_file(&engine, &args.input, args.evaluation_date, args.breakdown)?;
    println!("{output}");
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let evaluation_date = args.evaluation_date.unwrap_or_else(today);
    for outcome in score_payroll(&engine, &args.csv, evaluation_date)? {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}

fn configured_engine() -> Result<ScoringEngine, AppError> {
    let config = AppConfig::load()?;
    Ok(ScoringEngine::new(config.scoring))
}

pub(crate) fn score_file(
    engine: &ScoringEngine,
    path: &Path,
    evaluation_date: Option<NaiveDate>,
    breakdown: bool,
) -> Result<String, AppError> {
    let raw = fs::read_to_string(path)?;
    let request: CreditScoreRequest = serde_json::from_str(&raw)?;
    let evaluation_date = evaluation_date
        .or(request.evaluation_date)
        .unwrap_or_else(today);

    let rendered = if breakdown {
        let view = CreditBreakdownResponse {
            user_id: request.user_id.clone(),
            loan_id: request.loan_id.clone(),
            evaluation_date,
            breakdown: engine.score_request(&request, evaluation_date)?,
        };
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string_pretty(&engine.respond(&request, evaluation_date)?)?
    };
    Ok(rendered)
}

pub(crate) fn score_payroll(
    engine: &ScoringEngine,
    path: &Path,
    evaluation_date: NaiveDate,
) -> Result<Vec<BatchOutcome>, AppError> {
    let requests = PayrollCsvImporter::from_path(path)?;

    Ok(requests
        .into_iter()
        .map(|request| {
            let (credit_score, error) = match engine.score_request(&request, evaluation_date) {
                Ok(breakdown) => (Some(breakdown.final_score), None),
                Err(err) => {
                    tracing::warn!(
                        user_id = %request.user_id,
                        loan_id = %request.loan_id,
                        error = %err,
                        "payroll row could not be scored"
                    );
                    (None, Some(err.to_string()))
                }
            };
            BatchOutcome {
                user_id: request.user_id,
                loan_id: request.loan_id,
                credit_score,
                error,
            }
        })
        .collect())
}
