use slog::{info, Logger};
use time::Date;

use crate::{
    aggregate_production, aggregate_telemetry, extract_anomalies, join_metrics,
    production_date_bounds, transform_weather, DailyProduction, DailyProductionMetrics,
    DailyTelemetry, Error, ProductionRecord, ProductionStore, SensorReading, WeatherObservation,
    WeatherService,
};

/// Every table a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub production: Vec<DailyProduction>,
    pub telemetry: Vec<DailyTelemetry>,
    pub weather: Vec<WeatherObservation>,
    pub anomalies: Vec<ProductionRecord>,
    pub metrics: Vec<DailyProductionMetrics>,
}

/// Extracts production rows from `store`, then runs the pipeline over them.
pub async fn run_with_store(
    logger: &Logger,
    store: &dyn ProductionStore,
    telemetry_rows: &[SensorReading],
    weather: &WeatherService,
    today: Date,
) -> Result<PipelineOutput, Error> {
    let production_rows = store.production_logs().await?;
    run_pipeline(logger, &production_rows, telemetry_rows, weather, today).await
}

/// Runs one pass over already-extracted production and telemetry rows.
///
/// Weather is fetched for the production date span, routed by `today`. The
/// first failing stage aborts the run.
pub async fn run_pipeline(
    logger: &Logger,
    production_rows: &[ProductionRecord],
    telemetry_rows: &[SensorReading],
    weather: &WeatherService,
    today: Date,
) -> Result<PipelineOutput, Error> {
    let range = production_date_bounds(production_rows)?;
    info!(logger, "production spans {}", range);

    let raw_weather = weather.get_weather(range, today).await?;
    let anomalies = extract_anomalies(production_rows)?;
    info!(logger, "anomalous production rows: {}", anomalies.len());

    let production = aggregate_production(production_rows)?;
    let telemetry = aggregate_telemetry(telemetry_rows)?;
    let weather = transform_weather(raw_weather)?;
    info!(
        logger,
        "daily rows - production: {}, telemetry: {}, weather: {}",
        production.len(),
        telemetry.len(),
        weather.len()
    );

    let metrics = join_metrics(&production, &telemetry, &weather);
    info!(logger, "daily production metrics: {}", metrics.len());

    Ok(PipelineOutput {
        production,
        telemetry,
        weather,
        anomalies,
        metrics,
    })
}
