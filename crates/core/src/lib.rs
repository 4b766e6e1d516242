//! Mining ETL Core Library
//!
//! Shared utilities for the ETL pipeline:
//! - Configuration loading (XDG-compliant)
//! - File system utilities
//! - Deployment constants for the mine site

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::{is_file, path_exists};

/// Application name used for XDG paths
pub const APP_NAME: &str = "mining-etl";

/// Site latitude used for weather queries
pub const SITE_LATITUDE: f64 = 2.0167;

/// Site longitude used for weather queries
pub const SITE_LONGITUDE: f64 = 117.3000;

/// Timezone the weather API aggregates daily values in
pub const SITE_TIMEZONE: &str = "Asia/Jakarta";

/// UTC offset of the site, in hours. Decides which calendar day is "today".
pub const SITE_UTC_OFFSET_HOURS: i8 = 7;

/// Historical weather endpoint
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Recent/future weather endpoint
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Days before today at which weather queries switch from archive to forecast
pub const FRESHNESS_WINDOW_DAYS: i64 = 90;

/// Default location of the equipment sensor export
pub const DEFAULT_TELEMETRY_PATH: &str = "./data/iot/equipment_sensors.csv";

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Rows printed per table at the end of a run
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
