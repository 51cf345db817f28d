//! Record table type definitions.

use std::collections::HashSet;

/// The fixed attribute set a record table may carry.
///
/// Any subset may be absent from a given table; matcher patterns check
/// presence before applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PatientId,
    Name,
    Diagnosis,
    Treatment,
    Facility,
    Region,
    Cost,
    VisitDate,
}

impl Column {
    /// Map a CSV header to a known column.
    ///
    /// Headers are matched case-insensitively, with or without an
    /// underscore separator (`PatientID`, `patient_id`).
    pub fn from_header(header: &str) -> Option<Self> {
        let normalized: String = header
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != ' ')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "patientid" => Some(Self::PatientId),
            "name" => Some(Self::Name),
            "diagnosis" => Some(Self::Diagnosis),
            "treatment" => Some(Self::Treatment),
            "facility" => Some(Self::Facility),
            "region" => Some(Self::Region),
            "cost" => Some(Self::Cost),
            "visitdate" => Some(Self::VisitDate),
            _ => None,
        }
    }

    /// Human-readable column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientId => "PatientID",
            Self::Name => "Name",
            Self::Diagnosis => "Diagnosis",
            Self::Treatment => "Treatment",
            Self::Facility => "Facility",
            Self::Region => "Region",
            Self::Cost => "Cost",
            Self::VisitDate => "VisitDate",
        }
    }
}

/// One row of a record table.
///
/// String attributes are trimmed on load. `cost` is always a finite
/// number: values that fail numeric parsing are coerced to 0.0, never
/// treated as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordRow {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub facility: Option<String>,
    pub region: Option<String>,
    pub cost: f64,
    pub visit_date: Option<String>,
}

impl RecordRow {
    /// Text value of a column, if it is a text column and present.
    ///
    /// `Cost` has no text form and always returns `None` here.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::PatientId => self.patient_id.as_deref(),
            Column::Name => self.name.as_deref(),
            Column::Diagnosis => self.diagnosis.as_deref(),
            Column::Treatment => self.treatment.as_deref(),
            Column::Facility => self.facility.as_deref(),
            Column::Region => self.region.as_deref(),
            Column::VisitDate => self.visit_date.as_deref(),
            Column::Cost => None,
        }
    }
}

/// An ordered collection of record rows plus the set of columns the
/// backing table actually carries.
///
/// Loaded fresh from storage on every match call; lives only for the
/// duration of one matcher invocation.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub name: String,
    columns: HashSet<Column>,
    pub rows: Vec<RecordRow>,
}

impl RecordTable {
    pub fn new(name: impl Into<String>, columns: HashSet<Column>, rows: Vec<RecordRow>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Whether the table carries the given column.
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Whether the table carries every one of the given columns.
    pub fn has_all(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.columns.contains(c))
    }

    pub fn columns(&self) -> &HashSet<Column> {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
