use crate::{Error, ProductionRecord};

/// Raw rows with negative tonnage, ascending by date. These are the values
/// `aggregate_production` floors to zero. Null tonnage is not an anomaly.
pub fn extract_anomalies(rows: &[ProductionRecord]) -> Result<Vec<ProductionRecord>, Error> {
    if rows.is_empty() {
        return Err(Error::EmptyInput("production"));
    }
    let mut anomalies: Vec<ProductionRecord> = rows
        .iter()
        .filter(|row| matches!(row.tons_extracted, Some(tons) if tons < 0.0))
        .cloned()
        .collect();
    anomalies.sort_by_key(|row| row.date);
    Ok(anomalies)
}
