// namespace constants
pub const DEFAULT_NAMESPACE: &str = "default";
pub const WATERMARK_KEY_SUFFIX: &str = "lastMigratedVersion";
pub const KEY_SEPARATOR: &str = ".";

// version constants
pub const VERSION_SEPARATOR: char = '.';

// environment constants
pub const APP_VERSION_ENV: &str = "MILESTONE_APP_VERSION";
pub const CARGO_VERSION_ENV: &str = "CARGO_PKG_VERSION";
