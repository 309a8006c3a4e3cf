// crates/petmart-core/src/runtime/mod.rs
// ============================================================================
// Module: Petmart Runtime
// Description: Pure marketplace decisions shared by stores and services.
// Purpose: Keep pricing, checkout, and OTP rules out of storage code.
// Dependencies: crate::core, rand, subtle
// ============================================================================

//! ## Overview
//! Runtime helpers compute decisions from already-loaded records: how a
//! checkout line is priced, whether stock suffices, and whether an OTP is
//! accepted. Stores call them inside transactions so each decision is applied
//! atomically.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod checkout;
pub mod otp;
pub mod pricing;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checkout::CheckoutLine;
pub use checkout::OrderRequest;
pub use checkout::PlannedLine;
pub use checkout::merge_lines;
pub use checkout::plan_line;
pub use otp::OtpCheck;
pub use otp::OtpPolicy;
pub use otp::OtpVerification;
pub use pricing::LinePrice;
pub use pricing::effective_price;
pub use pricing::price_line;
