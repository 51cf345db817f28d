//! Rule-based record table matching.
//!
//! Patterns are tried in strict order. A pattern applies only when its
//! shape matches the query AND the table carries every column the pattern
//! needs; otherwise the next pattern is tried. The first applicable
//! pattern decides the outcome.

use crate::types::{Column, RecordRow, RecordTable};
use medask_core::Answer;
use regex::Regex;
use std::sync::LazyLock;

static TREATMENT_FOR_PATIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"treatment\s+(?:for|of)\s+patient\s+([a-z0-9\-]+)").unwrap());

static TREATED_AT_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"who\s+was\s+treated\s+at\s+(.+?)\s+for\s+(.+?)\??$").unwrap());

static REGION_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:total\s+cost|sum\s+of\s+costs?).*?(?:in|for)\s+(?:the\s+)?([a-z]+)\s+region")
        .unwrap()
});

static PATIENTS_WITH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:list\s+all\s+)?patients\s+(?:diagnosed\s+with|with)\s+(.+?)\??$").unwrap()
});

static COST_FOR_PATIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:cost|bill|amount\s+due).*for\s+patient\s+([a-z0-9\-]+)").unwrap()
});

static TOKEN_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Columns the broad fallback is allowed to scan.
const FALLBACK_COLUMNS: [Column; 6] = [
    Column::PatientId,
    Column::Name,
    Column::Diagnosis,
    Column::Treatment,
    Column::Facility,
    Column::Region,
];

/// Match one query against one record table.
pub fn match_table(table: &RecordTable, query: &str) -> Answer {
    let ql = query.trim().to_lowercase();

    // Pattern 1: treatment for a specific patient
    if table.has_all(&[Column::PatientId, Column::Treatment]) {
        if let Some(caps) = TREATMENT_FOR_PATIENT.captures(&ql) {
            let pid = caps[1].to_uppercase();
            return match find_patient(table, &pid) {
                Some(row) => Answer::answered(row.treatment.clone().unwrap_or_default()),
                None => no_matching_patient(&pid, table),
            };
        }
    }

    // Pattern 2: who was treated at <facility> for <diagnosis>
    if table.has_all(&[Column::Facility, Column::Diagnosis, Column::Name]) {
        if let Some(caps) = TREATED_AT_FOR.captures(&ql) {
            let facility = caps[1].trim().to_string();
            let diagnosis = caps[2].trim().to_string();

            let names = table.rows.iter().filter_map(|row| {
                let facility_hit = row
                    .facility
                    .as_deref()
                    .is_some_and(|f| contains_ci(f, &facility));
                let diagnosis_hit = row
                    .diagnosis
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, &diagnosis));
                (facility_hit && diagnosis_hit).then(|| row.name.as_deref().unwrap_or(""))
            });

            return match dedup_join(names) {
                Some(list) => Answer::answered(list),
                None => Answer::answered(format!(
                    "No patients treated at '{}' for '{}'.",
                    facility, diagnosis
                )),
            };
        }
    }

    // Pattern 3: total cost in/for a region; always answers, even when zero
    if table.has_all(&[Column::Region, Column::Cost]) {
        if let Some(caps) = REGION_TOTAL.captures(&ql) {
            let region = caps[1].trim().to_string();
            let total: f64 = table
                .rows
                .iter()
                .filter(|row| row.region.as_deref().is_some_and(|r| contains_ci(r, &region)))
                .map(|row| row.cost)
                .sum();
            return Answer::answered(format!(
                "Total cost in {} region: {:.2}",
                capitalize(&region),
                total
            ));
        }
    }

    // Pattern 4: patients diagnosed with <diagnosis>
    if table.has_all(&[Column::Diagnosis, Column::PatientId, Column::Name]) {
        if let Some(caps) = PATIENTS_WITH.captures(&ql) {
            let diagnosis = caps[1].trim().to_string();

            let names = table.rows.iter().filter_map(|row| {
                row.diagnosis
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, &diagnosis))
                    .then(|| row.name.as_deref().unwrap_or(""))
            });

            return match dedup_join(names) {
                Some(list) => Answer::answered(list),
                None => {
                    Answer::answered(format!("No patients diagnosed with '{}'.", diagnosis))
                }
            };
        }
    }

    // Pattern 5: cost for a specific patient
    if table.has_all(&[Column::PatientId, Column::Cost]) {
        if let Some(caps) = COST_FOR_PATIENT.captures(&ql) {
            let pid = caps[1].to_uppercase();
            return match find_patient(table, &pid) {
                Some(row) => Answer::answered(format!("{:.2}", row.cost)),
                None => no_matching_patient(&pid, table),
            };
        }
    }

    broad_fallback(table, &ql)
}

/// Broad keyword filter across whichever scan columns the table has.
///
/// A row qualifies only when every token (longer than 3 characters)
/// matches at least one scan column; tokens may each match a different
/// column.
fn broad_fallback(table: &RecordTable, ql: &str) -> Answer {
    let columns: Vec<Column> = FALLBACK_COLUMNS
        .iter()
        .copied()
        .filter(|c| table.has(*c))
        .collect();

    let tokens: Vec<&str> = TOKEN_SPLIT
        .split(ql)
        .filter(|t| t.len() > 3)
        .collect();

    if columns.is_empty() || tokens.is_empty() {
        return Answer::NoMatch;
    }

    let matches: Vec<&RecordRow> = table
        .rows
        .iter()
        .filter(|row| {
            tokens.iter().all(|token| {
                columns
                    .iter()
                    .any(|c| row.text(*c).is_some_and(|v| contains_ci(v, token)))
            })
        })
        .collect();

    if matches.is_empty() {
        return Answer::NoMatch;
    }

    // Prefer names over identifiers
    if table.has(Column::Name) {
        if let Some(list) = dedup_join(matches.iter().map(|r| r.name.as_deref().unwrap_or(""))) {
            return Answer::answered(list);
        }
    }
    if table.has(Column::PatientId) {
        if let Some(list) =
            dedup_join(matches.iter().map(|r| r.patient_id.as_deref().unwrap_or("")))
        {
            return Answer::answered(list);
        }
    }

    Answer::NoMatch
}

fn find_patient<'a>(table: &'a RecordTable, pid: &str) -> Option<&'a RecordRow> {
    table
        .rows
        .iter()
        .find(|row| row.patient_id.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(pid)))
}

fn no_matching_patient(pid: &str, table: &RecordTable) -> Answer {
    Answer::answered(format!("No matching patient {} in {}.", pid, table.name))
}

/// Case-insensitive substring containment; the needle is already lowercase.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Join unique non-blank values, preserving first-seen order.
fn dedup_join<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut seen = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() || seen.iter().any(|s| s == value) {
            continue;
        }
        seen.push(value.to_string());
    }
    if seen.is_empty() {
        None
    } else {
        Some(seen.join(", "))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
