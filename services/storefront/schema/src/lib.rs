//! SeaORM entities for the storefront service tables.

pub mod activity_logs;
pub mod campaigns;
pub mod orders;
pub mod otp_codes;
pub mod shipments;
