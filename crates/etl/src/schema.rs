use crate::Error;

/// Fails with `Error::Schema` listing every required column absent from `found`.
pub fn require_columns(table: &str, found: &[&str], required: &[&str]) -> Result<(), Error> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !found.contains(column))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema(format!(
            "{} data must contain column(s): {}",
            table,
            missing.join(", ")
        )))
    }
}

/// Schema error for a cell that could not be decoded.
pub fn cell_error(column: &str, row: usize, detail: impl std::fmt::Display) -> Error {
    Error::Schema(format!("invalid value in column '{}' at row {}: {}", column, row, detail))
}
