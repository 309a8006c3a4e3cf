// crates/petmart-cli/src/lib.rs
// ============================================================================
// Module: Petmart CLI Library
// Description: Shared helpers for the Petmart command-line interface.
// Purpose: Keep bind safety checks testable outside the binary.
// Dependencies: petmart-config
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) imports these helpers so that the
//! serve command applies the same bind policy the tests exercise.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Bind safety checks for `petmart serve`.
pub mod serve_policy;
