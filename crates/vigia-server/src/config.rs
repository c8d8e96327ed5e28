//! Server configuration.
//!
//! Everything comes from flags with environment fallbacks, so a
//! container can run the binary with no arguments at all. Without a
//! service-account file the server falls back to the in-memory backend,
//! which is what local development and the test suite use.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Spreadsheet the deployment writes to, unless overridden.
const DEFAULT_SHEET_ID: &str = "1pCUXSJ_hvQzpzBTaJ-h0ntcdhYwMTyWomxXMjmi7lyg";

/// Command-line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "vigia-server")]
#[command(about = "Vigía collection service", long_about = None)]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "VIGIA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Spreadsheet identifier acting as the database.
    #[arg(long, env = "VIGIA_SHEET_ID", default_value = DEFAULT_SHEET_ID)]
    pub sheet_id: String,

    /// Path to the service-account key JSON.
    ///
    /// When absent the server runs against an in-memory spreadsheet.
    #[arg(long, env = "VIGIA_SERVICE_ACCOUNT_FILE")]
    pub service_account_file: Option<PathBuf>,

    /// Read-cache TTL in seconds.
    #[arg(long, env = "VIGIA_READ_TTL_SECS", default_value_t = 25)]
    pub read_ttl_secs: u64,
}

impl Config {
    /// The read-cache TTL as a duration.
    pub fn read_ttl(&self) -> Duration {
        Duration::from_secs(self.read_ttl_secs)
    }

    /// A configuration for tests: in-memory backend, no caching.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            sheet_id: "test-sheet".to_string(),
            service_account_file: None,
            read_ttl_secs: 0,
        }
    }
}
