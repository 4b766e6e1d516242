mod aggregate_telemetry;
mod extract_telemetry;

pub use aggregate_telemetry::*;
pub use extract_telemetry::*;

use std::fmt;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentStatus {
    Active,
    Idle,
    Other(String),
}

impl From<&str> for EquipmentStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => EquipmentStatus::Active,
            "idle" => EquipmentStatus::Idle,
            other => EquipmentStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentStatus::Active => write!(f, "active"),
            EquipmentStatus::Idle => write!(f, "idle"),
            EquipmentStatus::Other(status) => write!(f, "{}", status),
        }
    }
}

/// One sensor sample for one piece of equipment, expected hourly.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub equipment_id: String,
    pub timestamp: PrimitiveDateTime,
    pub status: EquipmentStatus,
    pub fuel_consumption: Option<f64>,
}
