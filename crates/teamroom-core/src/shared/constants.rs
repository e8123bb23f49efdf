//! Application-wide constants.

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "ja-JP";

/// `yyyy/MM/dd`, the display format for the default locale.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Upper bound on files read from the data directory (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
