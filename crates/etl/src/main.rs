use etl::{
    get_config_info, load_telemetry, render_table, run_with_store, setup_logger, site_today, Cli,
    MySqlProductionStore, OpenMeteoClient, PipelineConfig, ProductionStore, WeatherService,
};
use slog::{error, info, Logger};
use std::sync::Arc;
use time::OffsetDateTime;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // .env must be loaded before clap reads the environment
    dotenvy::dotenv().ok();
    let cli = get_config_info()?;
    let logger = setup_logger(&cli);

    if let Err(err) = process_data(&cli, &logger).await {
        error!(logger, "Error processing data: {}", err);
        return Err(err.into());
    }
    Ok(())
}

async fn process_data(cli: &Cli, logger: &Logger) -> Result<(), etl::Error> {
    let config = PipelineConfig::try_from(cli)?;
    info!(logger, "Mining ETL starting...");
    info!(
        logger,
        "  Database: {}:{}/{}",
        config.database.host,
        config.database.port,
        config.database.database
    );
    info!(logger, "  Telemetry: {}", config.telemetry_path);
    info!(
        logger,
        "  Site: {}, {} ({})",
        config.weather.latitude,
        config.weather.longitude,
        config.weather.timezone
    );

    let store = MySqlProductionStore::connect(logger.clone(), &config.database).await?;
    extract_and_report(&config, &store, logger).await
}

async fn extract_and_report(
    config: &PipelineConfig,
    store: &dyn ProductionStore,
    logger: &Logger,
) -> Result<(), etl::Error> {
    let telemetry_rows = load_telemetry(&config.telemetry_path)?;
    info!(logger, "telemetry rows extracted: {}", telemetry_rows.len());

    let client = OpenMeteoClient::new(logger.clone(), config.weather.clone())?;
    let weather = WeatherService::new(logger.clone(), Arc::new(client));
    let today = site_today(OffsetDateTime::now_utc(), config.site_offset);
    info!(logger, "site date: {}", today);

    let output = run_with_store(logger, store, &telemetry_rows, &weather, today).await?;

    let rows = config.preview_rows;
    println!("{}", render_table("daily_production", &output.production, rows));
    println!("{}", render_table("daily_telemetry", &output.telemetry, rows));
    println!("{}", render_table("daily_weather", &output.weather, rows));
    println!("{}", render_table("production_anomalies", &output.anomalies, rows));
    println!("{}", render_table("daily_production_metrics", &output.metrics, rows));

    info!(logger, "Finished processing data");
    Ok(())
}
