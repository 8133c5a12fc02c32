/// Storefront service configuration loaded from environment variables.
#[derive(Debug)]
pub struct StorefrontConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (rate-limit stamps, lockout counters, token cache).
    pub redis_url: String,
    /// TCP port to listen on (default 3140). Env var: `STOREFRONT_PORT`.
    pub port: u16,
    /// Razorpay API key id (basic-auth user for order creation).
    pub razorpay_key_id: String,
    /// Razorpay API key secret; also the HMAC secret for callback signatures.
    pub razorpay_key_secret: String,
    /// Razorpay API base URL (override for tests).
    pub razorpay_base_url: String,
    /// PayU merchant key (first field of the request hash).
    pub payu_merchant_key: String,
    /// PayU salt (shared secret in the SHA-512 response hash).
    pub payu_salt: String,
    /// Shipping aggregator base URL.
    pub shiprocket_base_url: String,
    /// Shipping aggregator login email.
    pub shiprocket_email: String,
    /// Shipping aggregator login password.
    pub shiprocket_password: String,
    /// Transactional email provider API key.
    pub resend_api_key: String,
    /// Sender address for OTP emails.
    pub email_from: String,
    /// SMS provider auth key.
    pub msg91_auth_key: String,
    /// SMS provider template id for OTP messages.
    pub msg91_template_id: String,
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            port: std::env::var("STOREFRONT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3140),
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID").expect("RAZORPAY_KEY_ID"),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET"),
            razorpay_base_url: std::env::var("RAZORPAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_owned()),
            payu_merchant_key: std::env::var("PAYU_MERCHANT_KEY").expect("PAYU_MERCHANT_KEY"),
            payu_salt: std::env::var("PAYU_SALT").expect("PAYU_SALT"),
            shiprocket_base_url: std::env::var("SHIPROCKET_BASE_URL")
                .unwrap_or_else(|_| "https://apiv2.shiprocket.in".to_owned()),
            shiprocket_email: std::env::var("SHIPROCKET_EMAIL").expect("SHIPROCKET_EMAIL"),
            shiprocket_password: std::env::var("SHIPROCKET_PASSWORD").expect("SHIPROCKET_PASSWORD"),
            resend_api_key: std::env::var("RESEND_API_KEY").expect("RESEND_API_KEY"),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@asirex.in".to_owned()),
            msg91_auth_key: std::env::var("MSG91_AUTH_KEY").expect("MSG91_AUTH_KEY"),
            msg91_template_id: std::env::var("MSG91_TEMPLATE_ID").expect("MSG91_TEMPLATE_ID"),
        }
    }
}
