//! CLI Exit Code Registry
//!
//! Single source of truth for `tfuse` exit codes. Batch schedulers branch on
//! them, so codes are never reused.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 1       | Universal  | General error (unspecified)              |
//! | 2       | Universal  | CLI usage error (bad args, missing file) |
//! | 60-69   | master     | Master reconciliation codes              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Master (60-69)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_MASTER_INVALID_CONFIG: u8 = 60;

/// Runtime failure: unreadable input, malformed batch document, write error.
pub const EXIT_MASTER_RUNTIME: u8 = 61;

/// Batch completed but at least one record was rejected.
pub const EXIT_MASTER_RECORDS_FAILED: u8 = 62;
