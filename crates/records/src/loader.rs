//! Record table loading and normalization.

use crate::types::{Column, RecordRow, RecordTable};
use medask_core::{AppError, AppResult};
use std::collections::HashSet;
use std::path::Path;

/// Load a record table from a CSV file.
///
/// String attributes are trimmed; the cost attribute is coerced to a
/// finite number, with parse failures becoming exactly 0.0. Unknown
/// columns are ignored.
pub fn load_table(path: &Path) -> AppResult<RecordTable> {
    if !path.exists() {
        return Err(AppError::Records(format!(
            "Record table not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::Records(format!("Failed to open {}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::Records(format!("Failed to read headers of {}: {}", path.display(), e)))?
        .clone();

    // Map header positions onto known columns
    let mut column_at: Vec<Option<Column>> = Vec::with_capacity(headers.len());
    let mut columns: HashSet<Column> = HashSet::new();
    for header in headers.iter() {
        let column = Column::from_header(header);
        if let Some(c) = column {
            columns.insert(c);
        }
        column_at.push(column);
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::Records(format!("Failed to read row {} of {}: {}", idx + 1, path.display(), e))
        })?;

        let mut row = RecordRow::default();
        for (pos, value) in record.iter().enumerate() {
            let Some(Some(column)) = column_at.get(pos) else {
                continue;
            };
            set_field(&mut row, *column, value.trim());
        }
        rows.push(row);
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string();

    tracing::debug!(
        "Loaded table '{}': {} rows, {} known columns",
        name,
        rows.len(),
        columns.len()
    );

    Ok(RecordTable::new(name, columns, rows))
}

fn set_field(row: &mut RecordRow, column: Column, value: &str) {
    match column {
        Column::PatientId => row.patient_id = Some(value.to_string()),
        Column::Name => row.name = Some(value.to_string()),
        Column::Diagnosis => row.diagnosis = Some(value.to_string()),
        Column::Treatment => row.treatment = Some(value.to_string()),
        Column::Facility => row.facility = Some(value.to_string()),
        Column::Region => row.region = Some(value.to_string()),
        Column::VisitDate => row.visit_date = Some(value.to_string()),
        Column::Cost => row.cost = coerce_cost(value),
    }
}

/// Coerce a raw cost cell to a finite number; anything unparseable is 0.0.
fn coerce_cost(value: &str) -> f64 {
    match value.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_table_basic() {
        let (_dir, path) = write_csv(
            "PatientID,Name,Diagnosis,Treatment,Facility,Region,Cost,VisitDate\n\
             P001, Asha ,Anemia,Iron,Clinic D,North,120.50,2024-01-05\n\
             P002,Bimal,Anemia,Iron,Clinic D,South,80,2024-01-06\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.name, "clinic");
        assert_eq!(table.len(), 2);
        assert!(table.has_all(&[Column::PatientId, Column::Cost, Column::VisitDate]));

        // Strings are trimmed
        assert_eq!(table.rows[0].name.as_deref(), Some("Asha"));
        assert_eq!(table.rows[0].cost, 120.50);
        assert_eq!(table.rows[1].cost, 80.0);
    }

    #[test]
    fn test_unparseable_cost_is_zero() {
        let (_dir, path) = write_csv("PatientID,Cost\nP001,n/a\nP002,\n");

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[0].cost, 0.0);
        assert_eq!(table.rows[1].cost, 0.0);
    }

    #[test]
    fn test_thousands_separator_cost() {
        let (_dir, path) = write_csv("PatientID,Cost\nP001,\"1,200.00\"\n");

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows[0].cost, 1200.0);
    }

    #[test]
    fn test_unknown_columns_ignored() {
        let (_dir, path) = write_csv("PatientID,Mystery\nP001,42\n");

        let table = load_table(&path).unwrap();
        assert!(table.has(Column::PatientId));
        assert_eq!(table.columns().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_table(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(AppError::Records(_))));
    }
}
