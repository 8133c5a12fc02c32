//! OTP purposes and delivery subjects.
//!
//! One parameterized state machine serves every verification flow; the
//! purpose decides TTL, attempt cap, and the post-verification side effect.

use serde::{Deserialize, Serialize};

/// What a one-time code is proving. Each purpose has its own TTL and
/// attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Signup,
    PhoneVerify,
    OrderCancel,
    EventRegister,
}

impl OtpPurpose {
    /// Code lifetime in seconds (5–10 minutes depending on purpose).
    pub fn ttl_secs(self) -> i64 {
        match self {
            Self::Signup | Self::EventRegister => 600,
            Self::PhoneVerify | Self::OrderCancel => 300,
        }
    }

    /// Maximum wrong-code attempts before lockout.
    pub fn max_attempts(self) -> i32 {
        match self {
            Self::Signup | Self::OrderCancel => 5,
            Self::PhoneVerify | Self::EventRegister => 3,
        }
    }

    /// Stable string tag used as the store key component.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::PhoneVerify => "phone_verify",
            Self::OrderCancel => "order_cancel",
            Self::EventRegister => "event_register",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "signup" => Some(Self::Signup),
            "phone_verify" => Some(Self::PhoneVerify),
            "order_cancel" => Some(Self::OrderCancel),
            "event_register" => Some(Self::EventRegister),
            _ => None,
        }
    }
}

/// Delivery channel a code is sent over. The string form is the stored
/// subject key (`email:...` / `phone:...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "channel", content = "address")]
pub enum Subject {
    Email(String),
    Phone(String),
}

impl Subject {
    pub fn address(&self) -> &str {
        match self {
            Self::Email(a) | Self::Phone(a) => a,
        }
    }

    /// Store key, unique per channel + address.
    pub fn key(&self) -> String {
        match self {
            Self::Email(a) => format!("email:{a}"),
            Self::Phone(a) => format!("phone:{a}"),
        }
    }
}

/// Minimum interval between two `issue` calls for the same subject.
pub const OTP_ISSUE_INTERVAL_SECS: u64 = 30;

/// OTP codes are 6-digit numeric.
pub const OTP_CODE_LEN: usize = 6;
