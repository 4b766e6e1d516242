use crate::{
    DailyProduction, DailyProductionMetrics, DailyTelemetry, ProductionRecord, WeatherObservation,
};

/// A row that can be printed as part of a text table.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("null"), |v| v.to_string())
}

impl TableRow for ProductionRecord {
    fn headers() -> Vec<&'static str> {
        vec!["date", "mine_id", "shift", "tons_extracted", "quality_grade"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.mine_id.clone(),
            self.shift.clone(),
            opt(self.tons_extracted),
            opt(self.quality_grade),
        ]
    }
}

impl TableRow for DailyProduction {
    fn headers() -> Vec<&'static str> {
        vec!["date", "total_production_daily", "average_quality_grade"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.total_production_daily.to_string(),
            opt(self.average_quality_grade),
        ]
    }
}

impl TableRow for DailyTelemetry {
    fn headers() -> Vec<&'static str> {
        vec!["date", "equipment_utilization", "total_fuel_consumption"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.equipment_utilization.to_string(),
            self.total_fuel_consumption.to_string(),
        ]
    }
}

impl TableRow for WeatherObservation {
    fn headers() -> Vec<&'static str> {
        vec!["date", "mean_temperature", "total_precipitation"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            opt(self.mean_temperature),
            opt(self.total_precipitation),
        ]
    }
}

impl TableRow for DailyProductionMetrics {
    fn headers() -> Vec<&'static str> {
        vec![
            "date",
            "total_production_daily",
            "average_quality_grade",
            "equipment_utilization",
            "total_fuel_consumption",
            "mean_temperature",
            "total_precipitation",
            "fuel_efficiency",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.total_production_daily.to_string(),
            opt(self.average_quality_grade),
            opt(self.equipment_utilization),
            opt(self.total_fuel_consumption),
            opt(self.mean_temperature),
            opt(self.total_precipitation),
            opt(self.fuel_efficiency),
        ]
    }
}

/// Renders the first `limit` rows as a column-aligned table headed by `title`
/// and the full table shape.
pub fn render_table<T: TableRow>(title: &str, rows: &[T], limit: usize) -> String {
    let headers = T::headers();
    let body: Vec<Vec<String>> = rows.iter().take(limit).map(TableRow::cells).collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            body.iter()
                .map(|cells| cells[i].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("{} shape: ({}, {})\n", title, rows.len(), headers.len());
    out.push_str(&line(headers.iter().map(|h| h.to_string()).collect()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for cells in body {
        out.push_str(&line(cells));
        out.push('\n');
    }
    out
}
