use std::collections::BTreeMap;
use time::Date;

use crate::{Error, ProductionRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct DailyProduction {
    pub date: Date,
    pub total_production_daily: f64,
    pub average_quality_grade: Option<f64>,
}

#[derive(Default)]
struct DailyTotals {
    tons: f64,
    grade_sum: f64,
    grade_count: usize,
}

/// Collapses shift rows into one row per date, ascending.
///
/// Negative tonnage is floored to zero rather than dropped, so a faulty shift
/// never cancels out legitimate production logged on the same date. Null
/// tonnage counts as zero. Null quality grades are left out of the mean.
pub fn aggregate_production(rows: &[ProductionRecord]) -> Result<Vec<DailyProduction>, Error> {
    if rows.is_empty() {
        return Err(Error::EmptyInput("production"));
    }

    let mut by_date: BTreeMap<Date, DailyTotals> = BTreeMap::new();
    for row in rows {
        let totals = by_date.entry(row.date).or_default();
        totals.tons += row.tons_extracted.unwrap_or(0.0).max(0.0);
        if let Some(grade) = row.quality_grade {
            totals.grade_sum += grade;
            totals.grade_count += 1;
        }
    }

    Ok(by_date
        .into_iter()
        .map(|(date, totals)| DailyProduction {
            date,
            total_production_daily: totals.tons,
            average_quality_grade: (totals.grade_count > 0)
                .then(|| totals.grade_sum / totals.grade_count as f64),
        })
        .collect())
}
