use clap::Parser;
use mining_etl_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_ARCHIVE_URL, DEFAULT_FORECAST_URL,
    DEFAULT_MYSQL_PORT, DEFAULT_PREVIEW_ROWS, DEFAULT_TELEMETRY_PATH, SITE_LATITUDE,
    SITE_LONGITUDE, SITE_TIMEZONE, SITE_UTC_OFFSET_HOURS,
};
use slog::{o, Drain, Level, Logger};
use std::{env, fmt};
use time::UtcOffset;

use crate::{Error, DEFAULT_PRODUCTION_QUERY};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Mining ETL - Builds daily production metrics from production logs, equipment telemetry and site weather"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $MINING_ETL_CONFIG, ./etl.toml,
    /// $XDG_CONFIG_HOME/mining-etl/etl.toml, /etc/mining-etl/etl.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "MINING_ETL_LEVEL")]
    pub level: Option<String>,

    /// Production database host
    #[arg(long, env = "MYSQL_HOST")]
    pub mysql_host: Option<String>,

    /// Production database port
    #[arg(long, env = "MYSQL_PORT")]
    pub mysql_port: Option<u16>,

    /// Production database user
    #[arg(long, env = "MYSQL_USER")]
    pub mysql_user: Option<String>,

    /// Production database password
    #[arg(long, env = "MYSQL_PASSWORD", hide_env_values = true)]
    pub mysql_password: Option<String>,

    /// Production database name
    #[arg(long, env = "MYSQL_DATABASE")]
    pub mysql_database: Option<String>,

    /// Query returning date, mine_id, shift, tons_extracted, quality_grade
    #[arg(long, env = "MINING_ETL_PRODUCTION_QUERY")]
    pub production_query: Option<String>,

    /// Equipment sensor CSV export
    #[arg(short, long, env = "MINING_ETL_TELEMETRY_PATH")]
    pub telemetry_path: Option<String>,

    /// Historical weather endpoint
    #[arg(long, env = "MINING_ETL_ARCHIVE_URL")]
    pub archive_url: Option<String>,

    /// Recent/future weather endpoint
    #[arg(long, env = "MINING_ETL_FORECAST_URL")]
    pub forecast_url: Option<String>,

    /// Site latitude for weather queries
    #[arg(long, env = "MINING_ETL_LATITUDE")]
    pub latitude: Option<f64>,

    /// Site longitude for weather queries
    #[arg(long, env = "MINING_ETL_LONGITUDE")]
    pub longitude: Option<f64>,

    /// Timezone used by the weather API for daily aggregation
    #[arg(long, env = "MINING_ETL_TIMEZONE")]
    pub timezone: Option<String>,

    /// Site UTC offset in hours, used to decide the current day
    #[arg(long, env = "MINING_ETL_UTC_OFFSET_HOURS", allow_negative_numbers = true)]
    pub utc_offset_hours: Option<i8>,

    /// Weather request timeout in seconds
    #[arg(long, env = "MINING_ETL_HTTP_TIMEOUT")]
    pub http_timeout: Option<u64>,

    /// Retries for transient weather request failures
    #[arg(long, env = "MINING_ETL_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Rows printed per output table
    #[arg(short, long, env = "MINING_ETL_PREVIEW_ROWS")]
    pub preview_rows: Option<usize>,
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Result<Cli, Error> {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("MINING_ETL_CONFIG", "etl.toml")
    };

    Ok(cli_args.merge(file_config(&source)?))
}

/// Settings from the config file at `source`. Only a missing file falls back to defaults.
pub fn file_config(source: &ConfigSource) -> Result<Cli, Error> {
    load_config(source).map_err(|e| Error::Config(format!("{:#}", e)))
}

impl Cli {
    /// Values set on `self` win over `fallback`.
    pub fn merge(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(fallback.level),
            mysql_host: self.mysql_host.or(fallback.mysql_host),
            mysql_port: self.mysql_port.or(fallback.mysql_port),
            mysql_user: self.mysql_user.or(fallback.mysql_user),
            mysql_password: self.mysql_password.or(fallback.mysql_password),
            mysql_database: self.mysql_database.or(fallback.mysql_database),
            production_query: self.production_query.or(fallback.production_query),
            telemetry_path: self.telemetry_path.or(fallback.telemetry_path),
            archive_url: self.archive_url.or(fallback.archive_url),
            forecast_url: self.forecast_url.or(fallback.forecast_url),
            latitude: self.latitude.or(fallback.latitude),
            longitude: self.longitude.or(fallback.longitude),
            timezone: self.timezone.or(fallback.timezone),
            utc_offset_hours: self.utc_offset_hours.or(fallback.utc_offset_hours),
            http_timeout: self.http_timeout.or(fallback.http_timeout),
            max_retries: self.max_retries.or(fallback.max_retries),
            preview_rows: self.preview_rows.or(fallback.preview_rows),
        }
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub query: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"********")
            .field("database", &self.database)
            .field("query", &self.query)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub archive_url: String,
    pub forecast_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

/// Everything a pipeline run needs, validated once.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub database: DatabaseConfig,
    pub telemetry_path: String,
    pub weather: WeatherConfig,
    pub site_offset: UtcOffset,
    pub preview_rows: usize,
}

fn required(value: &Option<String>, name: &str) -> Result<String, Error> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::Config(format!("{} is not set", name))),
    }
}

fn or_default(value: &Option<String>, name: &str, default: &str) -> Result<String, Error> {
    match value {
        Some(_) => required(value, name),
        None => Ok(default.to_string()),
    }
}

impl TryFrom<&Cli> for PipelineConfig {
    type Error = Error;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let database = DatabaseConfig {
            host: required(&cli.mysql_host, "database host")?,
            port: cli.mysql_port.unwrap_or(DEFAULT_MYSQL_PORT),
            user: required(&cli.mysql_user, "database user")?,
            password: required(&cli.mysql_password, "database password")?,
            database: required(&cli.mysql_database, "database name")?,
            query: or_default(&cli.production_query, "production query", DEFAULT_PRODUCTION_QUERY)?,
        };
        let weather = WeatherConfig {
            archive_url: or_default(&cli.archive_url, "archive url", DEFAULT_ARCHIVE_URL)?,
            forecast_url: or_default(&cli.forecast_url, "forecast url", DEFAULT_FORECAST_URL)?,
            latitude: cli.latitude.unwrap_or(SITE_LATITUDE),
            longitude: cli.longitude.unwrap_or(SITE_LONGITUDE),
            timezone: or_default(&cli.timezone, "timezone", SITE_TIMEZONE)?,
            timeout_secs: cli.http_timeout.unwrap_or(20),
            max_retries: cli.max_retries.unwrap_or(0),
            user_agent: format!("mining-etl/{}", env!("CARGO_PKG_VERSION")),
        };
        let hours = cli.utc_offset_hours.unwrap_or(SITE_UTC_OFFSET_HOURS);
        let site_offset = UtcOffset::from_hms(hours, 0, 0)
            .map_err(|e| Error::Config(format!("utc offset {} hours: {}", hours, e)))?;
        Ok(PipelineConfig {
            database,
            telemetry_path: or_default(&cli.telemetry_path, "telemetry path", DEFAULT_TELEMETRY_PATH)?,
            weather,
            site_offset,
            preview_rows: cli.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
        })
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}
