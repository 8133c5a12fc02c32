//! Domain types shared across the ASIREX backend.
//!
//! This crate contains only pure types and arithmetic with no framework
//! dependencies, so the same rules apply identically in every service.

pub mod activity;
pub mod money;
pub mod order;
pub mod otp;
pub mod pagination;
