//! CLI Exit Code Registry
//!
//! Single source of truth for `rollmatch` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (clap rejects the arguments)             |
//! | 3    | Invalid config or missing input column; nothing written  |
//! | 4    | Runtime IO failure (unreadable input, unwritable output) |
//! | 5    | Review items present and `--strict` was passed           |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

// 2 is reserved for usage errors and emitted by clap directly.

/// Config failed to parse/validate, or a source lacks a required column.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// Input could not be read or output could not be written.
pub const EXIT_RECON_RUNTIME: u8 = 4;

/// Run completed but some students need manual review (`--strict`).
pub const EXIT_RECON_REVIEW: u8 = 5;
