use async_trait::async_trait;
use slog::{info, Logger};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow},
    Column, Row,
};
use time::Date;

use crate::{cell_error, require_columns, DatabaseConfig, DateRange, Error, ProductionRecord};

pub const PRODUCTION_COLUMNS: [&str; 5] =
    ["date", "mine_id", "shift", "tons_extracted", "quality_grade"];

// DECIMAL tonnage has no f64 decoding, so numbers are read back as DOUBLE
pub const DEFAULT_PRODUCTION_QUERY: &str = "SELECT date, mine_id, shift, \
     CAST(tons_extracted AS DOUBLE) AS tons_extracted, \
     CAST(quality_grade AS DOUBLE) AS quality_grade \
     FROM production_logs";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductionStore: Send + Sync {
    async fn production_logs(&self) -> Result<Vec<ProductionRecord>, Error>;
}

/// Typed cell access for one row of the production query. Each getter fails
/// with a description when the cell is absent or of another type.
pub trait ProductionRow {
    fn column_names(&self) -> Vec<&str>;
    fn date(&self, column: &str) -> Result<Date, String>;
    fn text(&self, column: &str) -> Result<String, String>;
    fn integer(&self, column: &str) -> Result<i64, String>;
    fn double(&self, column: &str) -> Result<Option<f64>, String>;
    fn float(&self, column: &str) -> Result<Option<f32>, String>;
}

impl ProductionRow for MySqlRow {
    fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name()).collect()
    }

    fn date(&self, column: &str) -> Result<Date, String> {
        self.try_get(column).map_err(|e| e.to_string())
    }

    fn text(&self, column: &str) -> Result<String, String> {
        self.try_get(column).map_err(|e| e.to_string())
    }

    fn integer(&self, column: &str) -> Result<i64, String> {
        self.try_get(column).map_err(|e| e.to_string())
    }

    fn double(&self, column: &str) -> Result<Option<f64>, String> {
        self.try_get(column).map_err(|e| e.to_string())
    }

    fn float(&self, column: &str) -> Result<Option<f32>, String> {
        self.try_get(column).map_err(|e| e.to_string())
    }
}

pub struct MySqlProductionStore {
    logger: Logger,
    pool: MySqlPool,
    query: String,
}

impl MySqlProductionStore {
    pub async fn connect(logger: Logger, config: &DatabaseConfig) -> Result<Self, Error> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        info!(
            logger,
            "connected to mysql {}:{}/{}", config.host, config.port, config.database
        );
        Ok(Self {
            logger,
            pool,
            query: config.query.clone(),
        })
    }
}

#[async_trait]
impl ProductionStore for MySqlProductionStore {
    async fn production_logs(&self) -> Result<Vec<ProductionRecord>, Error> {
        let rows = sqlx::query(&self.query).fetch_all(&self.pool).await?;
        let records = decode_production_rows(&rows)?;
        info!(self.logger, "production rows extracted: {}", records.len());
        Ok(records)
    }
}

/// Checks the result columns against `PRODUCTION_COLUMNS`, then decodes every row.
pub fn decode_production_rows<R: ProductionRow>(rows: &[R]) -> Result<Vec<ProductionRecord>, Error> {
    if let Some(first) = rows.first() {
        require_columns("production", &first.column_names(), &PRODUCTION_COLUMNS)?;
    }
    rows.iter()
        .enumerate()
        .map(|(index, row)| decode_production_row(row, index))
        .collect()
}

fn decode_production_row<R: ProductionRow>(row: &R, index: usize) -> Result<ProductionRecord, Error> {
    Ok(ProductionRecord {
        date: row.date("date").map_err(|e| cell_error("date", index, e))?,
        mine_id: decode_label(row, "mine_id", index)?,
        shift: decode_label(row, "shift", index)?,
        tons_extracted: decode_number(row, "tons_extracted", index)?,
        quality_grade: decode_number(row, "quality_grade", index)?,
    })
}

// identifiers may be stored as text or integer keys
fn decode_label<R: ProductionRow>(row: &R, column: &str, index: usize) -> Result<String, Error> {
    row.text(column)
        .or_else(|_| row.integer(column).map(|v| v.to_string()))
        .map_err(|e| cell_error(column, index, e))
}

fn decode_number<R: ProductionRow>(
    row: &R,
    column: &str,
    index: usize,
) -> Result<Option<f64>, Error> {
    row.double(column)
        .or_else(|_| row.float(column).map(|v| v.map(f64::from)))
        .map_err(|e| cell_error(column, index, e))
}

/// Earliest and latest production dates, used to scope the weather request.
pub fn production_date_bounds(rows: &[ProductionRecord]) -> Result<DateRange, Error> {
    let start = rows.iter().map(|row| row.date).min();
    let end = rows.iter().map(|row| row.date).max();
    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end),
        _ => Err(Error::EmptyInput("production")),
    }
}
