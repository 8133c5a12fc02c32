use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Storefront service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("verification code not found")]
    OtpNotFound,
    #[error("verification code expired")]
    OtpExpired,
    #[error("too many wrong attempts")]
    OtpAttemptsExceeded,
    #[error("invalid verification code")]
    InvalidOtp { remaining: i32 },
    #[error("please wait before requesting another code")]
    TooManyRequests,
    #[error("this code cannot be verified here")]
    PurposeNotAllowed,
    #[error("order not found")]
    OrderNotFound,
    #[error("campaign not found")]
    CampaignNotFound,
    #[error("shipment not found")]
    ShipmentNotFound,
    #[error("payment signature mismatch")]
    SignatureInvalid,
    #[error("payment verification locked, contact support")]
    VerificationLocked,
    #[error("invalid order status transition")]
    InvalidTransition,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("provider unavailable, try Cash on Delivery")]
    UpstreamUnavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StorefrontError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OtpNotFound => "OTP_NOT_FOUND",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::OtpAttemptsExceeded => "OTP_ATTEMPTS_EXCEEDED",
            Self::InvalidOtp { .. } => "INVALID_OTP",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::PurposeNotAllowed => "PURPOSE_NOT_ALLOWED",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::CampaignNotFound => "CAMPAIGN_NOT_FOUND",
            Self::ShipmentNotFound => "SHIPMENT_NOT_FOUND",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::VerificationLocked => "VERIFICATION_LOCKED",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::OtpNotFound | Self::OrderNotFound | Self::CampaignNotFound
            | Self::ShipmentNotFound => StatusCode::NOT_FOUND,
            Self::OtpExpired
            | Self::InvalidOtp { .. }
            | Self::PurposeNotAllowed
            | Self::SignatureInvalid
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::OtpAttemptsExceeded | Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::VerificationLocked | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidTransition => StatusCode::CONFLICT,
            Self::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::InvalidOtp { remaining } = self {
            body["remaining_attempts"] = serde_json::json!(remaining);
        }
        (status, axum::Json(body)).into_response()
    }
}
