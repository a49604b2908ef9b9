//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error: unknown flag, missing field
pub const USAGE: i32 = 64;

/// Data format error: malformed JSON, wrong field type
pub const DATAERR: i32 = 65;

/// Cannot open input: JSON file not found
pub const NOINPUT: i32 = 66;

/// Service unavailable: the chain operation failed
pub const UNAVAILABLE: i32 = 69;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
