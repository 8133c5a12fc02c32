pub mod discount;
pub mod order;
pub mod otp;
pub mod payment;
pub mod shipping;
