//! Store-backed counters (Redis). Rate-limit stamps and lockout counters
//! must hold across server instances, so nothing here is process-local.

use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};
use uuid::Uuid;

use asirex_domain::otp::OTP_ISSUE_INTERVAL_SECS;

use crate::domain::repository::RateLimiter;
use crate::domain::types::PAYMENT_FAILURE_TTL_SECS;
use crate::error::StorefrontError;

#[derive(Clone)]
pub struct RedisRateLimiter {
    pub pool: Pool,
}

fn issue_key(subject_key: &str) -> String {
    format!("otp_issue:{subject_key}")
}

fn failure_key(order_id: Uuid) -> String {
    format!("pay_fail:{order_id}")
}

impl RedisRateLimiter {
    async fn conn(&self) -> Result<deadpool_redis::Connection, StorefrontError> {
        self.pool
            .get()
            .await
            .map_err(|e| StorefrontError::Internal(e.into()))
    }
}

impl RateLimiter for RedisRateLimiter {
    async fn try_acquire_issue_slot(&self, subject_key: &str) -> Result<bool, StorefrontError> {
        let mut conn = self.conn().await?;
        // SET NX EX is the atomic claim; a live key means a recent issue.
        let reply: Option<String> = redis::cmd("SET")
            .arg(issue_key(subject_key))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(OTP_ISSUE_INTERVAL_SECS)
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| StorefrontError::Internal(e.into()))?;
        Ok(reply.is_some())
    }

    async fn incr_payment_failures(&self, order_id: Uuid) -> Result<u32, StorefrontError> {
        let mut conn = self.conn().await?;
        let key = failure_key(order_id);
        let count: u32 = conn
            .incr(&key, 1)
            .await
            .map_err(|e: redis::RedisError| StorefrontError::Internal(e.into()))?;
        let (): () = conn
            .expire(&key, PAYMENT_FAILURE_TTL_SECS)
            .await
            .map_err(|e: redis::RedisError| StorefrontError::Internal(e.into()))?;
        Ok(count)
    }

    async fn payment_failures(&self, order_id: Uuid) -> Result<u32, StorefrontError> {
        let mut conn = self.conn().await?;
        let count: Option<u32> = conn
            .get(failure_key(order_id))
            .await
            .map_err(|e: redis::RedisError| StorefrontError::Internal(e.into()))?;
        Ok(count.unwrap_or(0))
    }

    async fn clear_payment_failures(&self, order_id: Uuid) -> Result<(), StorefrontError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .del(failure_key(order_id))
            .await
            .map_err(|e: redis::RedisError| StorefrontError::Internal(e.into()))?;
        Ok(())
    }
}
