pub mod activity;
pub mod campaigns;
pub mod orders;
pub mod otp;
pub mod payments;
pub mod shipments;
