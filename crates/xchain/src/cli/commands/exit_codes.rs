//! Process exit codes.

/// The command succeeded.
pub const EXIT_SUCCESS: i32 = 0;

/// Configuration, input or derivation error.
pub const EXIT_ERROR: i32 = 2;
