use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::json;

use asirex_domain::activity::ActivityKind;
use asirex_domain::otp::{OtpPurpose, Subject};

use crate::domain::repository::ActivityLog;
use crate::domain::types::ActivityRecord;
use crate::error::StorefrontError;
use crate::state::AppState;
use crate::usecase::otp::{IssueOtpInput, IssueOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

#[derive(Deserialize)]
pub struct OtpRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub purpose: String,
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub purpose: String,
    pub code: String,
}

fn parse_subject(email: Option<String>, phone: Option<String>) -> Result<Subject, StorefrontError> {
    match (email, phone) {
        (Some(email), None) => Ok(Subject::Email(email)),
        (None, Some(phone)) => Ok(Subject::Phone(phone)),
        _ => Err(StorefrontError::MissingData),
    }
}

fn parse_purpose(s: &str) -> Result<OtpPurpose, StorefrontError> {
    OtpPurpose::parse(s).ok_or(StorefrontError::MissingData)
}

/// `POST /otp` — issue a one-time code. Cancellation codes are only
/// issued through the order cancel endpoint, never directly.
pub async fn issue_otp(
    State(state): State<AppState>,
    Json(body): Json<OtpRequest>,
) -> Result<StatusCode, StorefrontError> {
    let purpose = parse_purpose(&body.purpose)?;
    if purpose == OtpPurpose::OrderCancel {
        return Err(StorefrontError::PurposeNotAllowed);
    }
    let subject = parse_subject(body.email, body.phone)?;

    let usecase = IssueOtpUseCase {
        otps: state.otp_repo(),
        limiter: state.rate_limiter(),
        sender: state.otp_sender(),
    };
    usecase.execute(IssueOtpInput { subject, purpose }).await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /otp/verify` — check a submitted code.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, StorefrontError> {
    let purpose = parse_purpose(&body.purpose)?;
    if purpose == OtpPurpose::OrderCancel {
        return Err(StorefrontError::PurposeNotAllowed);
    }
    let subject = parse_subject(body.email, body.phone)?;
    let subject_key = subject.key();

    let usecase = VerifyOtpUseCase {
        otps: state.otp_repo(),
    };
    usecase
        .execute(VerifyOtpInput {
            subject,
            purpose,
            code: body.code,
        })
        .await?;

    if purpose == OtpPurpose::PhoneVerify {
        let mut entry = ActivityRecord::new(ActivityKind::PhoneVerified, None, json!({}));
        entry.subject = Some(subject_key);
        state.activity_log().record(&entry).await?;
    }

    Ok(Json(json!({ "verified": true })))
}
