mod aggregate_production;
mod anomalies;
mod extract_production;

pub use aggregate_production::*;
pub use anomalies::*;
pub use extract_production::*;

use time::Date;

/// One shift's production log entry. Negative tonnage marks a sensor or logging fault;
/// a null tonnage counts as no production.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRecord {
    pub date: Date,
    pub mine_id: String,
    pub shift: String,
    pub tons_extracted: Option<f64>,
    pub quality_grade: Option<f64>,
}
