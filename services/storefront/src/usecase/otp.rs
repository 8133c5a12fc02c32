//! One-time code issuance and verification.
//!
//! A single parameterized machine keyed by `(subject, purpose)` serves
//! signup, phone verification, order cancellation, and event registration.
//! Purpose-specific side effects run after a successful verify, dispatched
//! by the calling usecase (see `usecase::order::ConfirmCancellationUseCase`).

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use asirex_domain::otp::{OtpPurpose, Subject};

use crate::domain::repository::{OtpRepository, OtpSender, RateLimiter};
use crate::domain::types::OtpRecord;
use crate::error::StorefrontError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000u32))
}

/// SHA-256 hex digest of a code; only digests are ever stored.
pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

pub struct IssueOtpInput {
    pub subject: Subject,
    pub purpose: OtpPurpose,
}

pub struct IssueOtpUseCase<R, L, S>
where
    R: OtpRepository,
    L: RateLimiter,
    S: OtpSender,
{
    pub otps: R,
    pub limiter: L,
    pub sender: S,
}

impl<R, L, S> IssueOtpUseCase<R, L, S>
where
    R: OtpRepository,
    L: RateLimiter,
    S: OtpSender,
{
    /// Issue a fresh code, replacing any prior one for the same subject +
    /// purpose. Delivery failure never rolls the stored code back.
    pub async fn execute(&self, input: IssueOtpInput) -> Result<(), StorefrontError> {
        let key = input.subject.key();

        // 1. Minimum inter-issue interval, enforced in the shared store.
        if !self.limiter.try_acquire_issue_slot(&key).await? {
            return Err(StorefrontError::TooManyRequests);
        }

        // 2. Generate + store the digest, replacing any prior record.
        let code = generate_code();
        let now = Utc::now();
        let record = OtpRecord {
            id: Uuid::now_v7(),
            subject_key: key,
            purpose: input.purpose,
            code_hash: hash_code(&code),
            attempts: 0,
            verified: false,
            expires_at: now + Duration::seconds(input.purpose.ttl_secs()),
            created_at: now,
        };
        self.otps.replace(&record).await?;

        // 3. Fire-and-forget delivery.
        let sent = match &input.subject {
            Subject::Email(addr) => self.sender.send_email_code(addr, &code, input.purpose).await,
            Subject::Phone(number) => self.sender.send_sms_code(number, &code, input.purpose).await,
        };
        if let Err(e) = sent {
            tracing::warn!(
                subject = %record.subject_key,
                purpose = input.purpose.as_str(),
                error = %e,
                "otp delivery failed, code remains valid"
            );
        }

        Ok(())
    }
}

pub struct VerifyOtpInput {
    pub subject: Subject,
    pub purpose: OtpPurpose,
    pub code: String,
}

pub struct VerifyOtpUseCase<R: OtpRepository> {
    pub otps: R,
}

impl<R: OtpRepository> VerifyOtpUseCase<R> {
    /// Run the verification machine. On success the record is marked
    /// verified, so a replay of the same code answers `OtpNotFound`.
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<(), StorefrontError> {
        let key = input.subject.key();
        let record = self
            .otps
            .find_latest_unverified(&key, input.purpose)
            .await?
            .ok_or(StorefrontError::OtpNotFound)?;

        if record.is_expired(Utc::now()) {
            self.otps.delete(record.id).await?;
            return Err(StorefrontError::OtpExpired);
        }

        if record.attempts >= input.purpose.max_attempts() {
            return Err(StorefrontError::OtpAttemptsExceeded);
        }

        let digest_matches: bool = hash_code(&input.code)
            .as_bytes()
            .ct_eq(record.code_hash.as_bytes())
            .into();
        if !digest_matches {
            self.otps.increment_attempts(record.id).await?;
            return Err(StorefrontError::InvalidOtp {
                remaining: record.remaining_attempts() - 1,
            });
        }

        self.otps.mark_verified(record.id).await?;
        Ok(())
    }
}
