use std::collections::{BTreeMap, HashSet};
use time::Date;

use crate::{EquipmentStatus, Error, SensorReading};

/// Possible equipment-hours per machine per day. Assumes hourly readings; other
/// cadences skew the utilization ratio.
pub const POSSIBLE_HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTelemetry {
    pub date: Date,
    pub equipment_utilization: f64,
    pub total_fuel_consumption: f64,
}

/// Collapses sensor readings into one row per calendar date, ascending.
///
/// Utilization is normalized by every distinct piece of equipment in the whole
/// input, not only the equipment reporting on a given day.
pub fn aggregate_telemetry(readings: &[SensorReading]) -> Result<Vec<DailyTelemetry>, Error> {
    if readings.is_empty() {
        return Err(Error::EmptyInput("telemetry"));
    }

    let total_equipment = readings
        .iter()
        .map(|r| r.equipment_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let possible_hours = POSSIBLE_HOURS_PER_DAY * total_equipment as f64;

    let mut by_date: BTreeMap<Date, (usize, f64)> = BTreeMap::new();
    for reading in readings {
        let (active, fuel) = by_date.entry(reading.timestamp.date()).or_default();
        if reading.status == EquipmentStatus::Active {
            *active += 1;
        }
        *fuel += reading.fuel_consumption.unwrap_or(0.0);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, (active, fuel))| DailyTelemetry {
            date,
            equipment_utilization: active as f64 / possible_hours,
            total_fuel_consumption: fuel,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, PrimitiveDateTime};

    fn reading(
        equipment: &str,
        timestamp: PrimitiveDateTime,
        status: EquipmentStatus,
        fuel: Option<f64>,
    ) -> SensorReading {
        SensorReading {
            equipment_id: equipment.to_string(),
            timestamp,
            status,
            fuel_consumption: fuel,
        }
    }

    #[test]
    fn utilization_uses_all_equipment_ever_seen() {
        let readings = vec![
            reading("EX-01", datetime!(2024-01-01 08:00), EquipmentStatus::Active, Some(10.0)),
            reading("EX-01", datetime!(2024-01-01 09:00), EquipmentStatus::Active, Some(12.0)),
            reading("EX-01", datetime!(2024-01-01 10:00), EquipmentStatus::Idle, Some(1.0)),
            // EX-02 only reports on the second day but still counts on the first
            reading("EX-02", datetime!(2024-01-02 08:00), EquipmentStatus::Active, Some(20.0)),
        ];
        let daily = aggregate_telemetry(&readings).unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].equipment_utilization, 2.0 / 48.0);
        assert_eq!(daily[0].total_fuel_consumption, 23.0);
        assert_eq!(daily[1].equipment_utilization, 1.0 / 48.0);
        assert_eq!(daily[1].total_fuel_consumption, 20.0);
    }

    #[test]
    fn fully_active_hourly_day_is_full_utilization() {
        let readings: Vec<SensorReading> = (0..24)
            .map(|hour| {
                let ts = datetime!(2024-05-01 00:00)
                    .replace_hour(hour)
                    .expect("hour in range");
                reading("HT-07", ts, EquipmentStatus::Active, Some(2.5))
            })
            .collect();
        let daily = aggregate_telemetry(&readings).unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].equipment_utilization, 1.0);
        assert_eq!(daily[0].total_fuel_consumption, 60.0);
    }

    #[test]
    fn missing_fuel_and_unknown_status_do_not_count() {
        let readings = vec![
            reading("EX-01", datetime!(2024-01-03 23:00), EquipmentStatus::Other("maintenance".into()), None),
            reading("EX-01", datetime!(2024-01-03 01:00), EquipmentStatus::Active, Some(4.0)),
        ];
        let daily = aggregate_telemetry(&readings).unwrap();
        assert_eq!(daily[0].equipment_utilization, 1.0 / 24.0);
        assert_eq!(daily[0].total_fuel_consumption, 4.0);
    }

    #[test]
    fn output_is_sorted_by_date() {
        let readings = vec![
            reading("EX-01", datetime!(2024-01-05 10:00), EquipmentStatus::Active, Some(1.0)),
            reading("EX-01", datetime!(2024-01-02 10:00), EquipmentStatus::Active, Some(1.0)),
            reading("EX-01", datetime!(2024-01-04 10:00), EquipmentStatus::Idle, Some(1.0)),
        ];
        let daily = aggregate_telemetry(&readings).unwrap();
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn empty_telemetry_is_rejected() {
        assert!(matches!(
            aggregate_telemetry(&[]),
            Err(Error::EmptyInput("telemetry"))
        ));
    }
}
