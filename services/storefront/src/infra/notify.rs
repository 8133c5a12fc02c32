//! Outbound OTP delivery over the transactional email and SMS providers.
//! Callers treat delivery failure as non-fatal, so errors here only need
//! enough context to be diagnosable from the logs.

use serde_json::json;

use asirex_domain::otp::OtpPurpose;

use crate::domain::repository::OtpSender;
use crate::error::StorefrontError;

#[derive(Clone)]
pub struct HttpOtpSender {
    pub http: reqwest::Client,
    pub resend_api_key: String,
    pub email_from: String,
    pub msg91_auth_key: String,
    pub msg91_template_id: String,
}

fn subject_line(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::Signup => "Your ASIREX signup code",
        OtpPurpose::PhoneVerify => "Your ASIREX verification code",
        OtpPurpose::OrderCancel => "Confirm your order cancellation",
        OtpPurpose::EventRegister => "Your ASIREX event registration code",
    }
}

impl OtpSender for HttpOtpSender {
    async fn send_email_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), StorefrontError> {
        let body = json!({
            "from": self.email_from,
            "to": [to],
            "subject": subject_line(purpose),
            "text": format!(
                "Your one-time code is {code}. It expires in {} minutes. \
                 Do not share it with anyone.",
                purpose.ttl_secs() / 60
            ),
        });

        self.http
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.resend_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorefrontError::Internal(anyhow::Error::from(e)))?
            .error_for_status()
            .map_err(|e| StorefrontError::Internal(anyhow::Error::from(e)))?;
        Ok(())
    }

    async fn send_sms_code(
        &self,
        to: &str,
        code: &str,
        _purpose: OtpPurpose,
    ) -> Result<(), StorefrontError> {
        let body = json!({
            "template_id": self.msg91_template_id,
            "mobile": to,
            "otp": code,
        });

        self.http
            .post("https://control.msg91.com/api/v5/otp")
            .header("authkey", &self.msg91_auth_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorefrontError::Internal(anyhow::Error::from(e)))?
            .error_for_status()
            .map_err(|e| StorefrontError::Internal(anyhow::Error::from(e)))?;
        Ok(())
    }
}
