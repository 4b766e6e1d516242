use async_trait::async_trait;
use etl::{
    read_telemetry, DailySeries, DateRange, Error, ProductionRecord, SensorReading,
    WeatherEndpoint, WeatherService, WeatherSource,
};
use mockall::mock;
use slog::{o, Discard, Logger};
use std::sync::Arc;
use time::Date;

mock! {
    pub WeatherApi {}

    #[async_trait]
    impl WeatherSource for WeatherApi {
        async fn fetch_daily(
            &self,
            endpoint: WeatherEndpoint,
            range: DateRange,
        ) -> Result<DailySeries, Error>;
    }
}

pub fn test_logger() -> Logger {
    Logger::root(Discard, o!())
}

pub fn weather_service(api: MockWeatherApi) -> WeatherService {
    WeatherService::new(test_logger(), Arc::new(api))
}

pub fn production(date: Date, mine: &str, shift: &str, tons: f64, grade: Option<f64>) -> ProductionRecord {
    ProductionRecord {
        date,
        mine_id: mine.to_string(),
        shift: shift.to_string(),
        tons_extracted: Some(tons),
        quality_grade: grade,
    }
}

/// Series covering every day of `range` with constant values.
pub fn daily_series(range: DateRange, temperature: f64, precipitation: f64) -> DailySeries {
    let mut series = DailySeries::default();
    let mut day = range.start();
    while day <= range.end() {
        series.time.push(day.to_string());
        series.temperature_2m_mean.push(Some(temperature));
        series.precipitation_sum.push(Some(precipitation));
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    series
}

pub fn mock_telemetry() -> Vec<SensorReading> {
    let data = "\
equipment_id,timestamp,status,fuel_consumption
EX-01,2024-01-01 06:00:00,active,40.0
EX-01,2024-01-01 07:00:00,active,42.0
EX-01,2024-01-01 08:00:00,idle,3.0
HT-02,2024-01-01 06:00:00,active,18.0
HT-02,2024-01-01 07:00:00,idle,
";
    read_telemetry(data.as_bytes()).expect("valid telemetry fixture")
}
