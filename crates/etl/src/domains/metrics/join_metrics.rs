use std::collections::HashMap;
use time::Date;

use crate::{DailyProduction, DailyTelemetry, WeatherObservation};

/// One row per production date. Telemetry and weather columns are `None`
/// when that source has no row for the date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProductionMetrics {
    pub date: Date,
    pub total_production_daily: f64,
    pub average_quality_grade: Option<f64>,
    pub equipment_utilization: Option<f64>,
    pub total_fuel_consumption: Option<f64>,
    pub mean_temperature: Option<f64>,
    pub total_precipitation: Option<f64>,
    pub fuel_efficiency: Option<f64>,
}

/// Fuel consumed per ton produced. `None` when either side is missing or the
/// ratio is not finite (zero production).
pub fn fuel_efficiency(total_fuel_consumption: Option<f64>, total_production: f64) -> Option<f64> {
    let ratio = total_fuel_consumption? / total_production;
    ratio.is_finite().then_some(ratio)
}

/// Left-joins telemetry then weather onto production by date.
pub fn join_metrics(
    production: &[DailyProduction],
    telemetry: &[DailyTelemetry],
    weather: &[WeatherObservation],
) -> Vec<DailyProductionMetrics> {
    let telemetry_by_date: HashMap<Date, &DailyTelemetry> =
        telemetry.iter().map(|row| (row.date, row)).collect();
    let weather_by_date: HashMap<Date, &WeatherObservation> =
        weather.iter().map(|row| (row.date, row)).collect();

    production
        .iter()
        .map(|day| {
            let telemetry = telemetry_by_date.get(&day.date);
            let weather = weather_by_date.get(&day.date);
            let total_fuel_consumption = telemetry.map(|t| t.total_fuel_consumption);
            DailyProductionMetrics {
                date: day.date,
                total_production_daily: day.total_production_daily,
                average_quality_grade: day.average_quality_grade,
                equipment_utilization: telemetry.map(|t| t.equipment_utilization),
                total_fuel_consumption,
                mean_temperature: weather.and_then(|w| w.mean_temperature),
                total_precipitation: weather.and_then(|w| w.total_precipitation),
                fuel_efficiency: fuel_efficiency(
                    total_fuel_consumption,
                    day.total_production_daily,
                ),
            }
        })
        .collect()
}
