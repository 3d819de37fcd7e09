//! Exit codes for rasshdash

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the config file exists but cannot be parsed
pub const EXIT_CONFIG_ERROR: i32 = 78;

/// Exit code when the honeypot returns a body we cannot use
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the honeypot is unavailable/unreachable
pub const EXIT_SERVER_UNAVAILABLE: i32 = 70;
