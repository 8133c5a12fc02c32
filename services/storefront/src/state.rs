use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::config::StorefrontConfig;
use crate::infra::counters::RedisRateLimiter;
use crate::infra::db::{
    DbActivityLog, DbCampaignRepository, DbOrderRepository, DbOtpRepository, DbShipmentRepository,
};
use crate::infra::gateway::RazorpayClient;
use crate::infra::notify::HttpOtpSender;
use crate::infra::shipping::ShipRocketClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub http: reqwest::Client,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_base_url: String,
    pub payu_merchant_key: String,
    pub payu_salt: String,
    pub shiprocket_base_url: String,
    pub shiprocket_email: String,
    pub shiprocket_password: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub msg91_auth_key: String,
    pub msg91_template_id: String,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        redis: RedisPool,
        http: reqwest::Client,
        config: StorefrontConfig,
    ) -> Self {
        Self {
            db,
            redis,
            http,
            razorpay_key_id: config.razorpay_key_id,
            razorpay_key_secret: config.razorpay_key_secret,
            razorpay_base_url: config.razorpay_base_url,
            payu_merchant_key: config.payu_merchant_key,
            payu_salt: config.payu_salt,
            shiprocket_base_url: config.shiprocket_base_url,
            shiprocket_email: config.shiprocket_email,
            shiprocket_password: config.shiprocket_password,
            resend_api_key: config.resend_api_key,
            email_from: config.email_from,
            msg91_auth_key: config.msg91_auth_key,
            msg91_template_id: config.msg91_template_id,
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn campaign_repo(&self) -> DbCampaignRepository {
        DbCampaignRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn activity_log(&self) -> DbActivityLog {
        DbActivityLog {
            db: self.db.clone(),
        }
    }

    pub fn shipment_repo(&self) -> DbShipmentRepository {
        DbShipmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn rate_limiter(&self) -> RedisRateLimiter {
        RedisRateLimiter {
            pool: self.redis.clone(),
        }
    }

    pub fn otp_sender(&self) -> HttpOtpSender {
        HttpOtpSender {
            http: self.http.clone(),
            resend_api_key: self.resend_api_key.clone(),
            email_from: self.email_from.clone(),
            msg91_auth_key: self.msg91_auth_key.clone(),
            msg91_template_id: self.msg91_template_id.clone(),
        }
    }

    pub fn payment_gateway(&self) -> RazorpayClient {
        RazorpayClient {
            http: self.http.clone(),
            base_url: self.razorpay_base_url.clone(),
            key_id: self.razorpay_key_id.clone(),
            key_secret: self.razorpay_key_secret.clone(),
        }
    }

    pub fn shipping(&self) -> ShipRocketClient {
        ShipRocketClient {
            http: self.http.clone(),
            redis: self.redis.clone(),
            base_url: self.shiprocket_base_url.clone(),
            email: self.shiprocket_email.clone(),
            password: self.shiprocket_password.clone(),
        }
    }
}
