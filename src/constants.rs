// Constants module - centralized default values for configuration
//
// Config sections read their serde defaults from here so the YAML defaults
// and the engine defaults never drift apart.

// =============================================================================
// Logo defaults
// =============================================================================

/// Upper bound on one logo load, in milliseconds
pub const DEFAULT_LOGO_TIMEOUT_MS: u64 = 3000;

/// Maximum number of decoded logos kept in memory
pub const DEFAULT_LOGO_CACHE_ENTRIES: u64 = 32;

/// Time-to-live of a cached logo in seconds
pub const DEFAULT_LOGO_CACHE_TTL_SECS: u64 = 3600;

/// Timeout applied by the HTTP client in seconds
pub const DEFAULT_LOGO_HTTP_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Output defaults
// =============================================================================

/// JPEG quality used when a render is written as JPEG
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// JPEG quality of the compression step run before a photo is stored
pub const DEFAULT_COMPRESS_QUALITY: u8 = 70;

// =============================================================================
// Storage defaults
// =============================================================================

/// Directory used by the filesystem photo store
pub const DEFAULT_STORAGE_DIR: &str = "photos";

/// Metadata index file inside the storage directory
pub const PHOTO_INDEX_FILE: &str = "photos.jsonl";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
