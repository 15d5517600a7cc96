//! File export for consolidated tables and rendered reports.

use chrono::{DateTime, Utc};
use insight_core::{InsightError, InsightResult, Table};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

/// Record of one produced artifact, handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub id: Uuid,
    pub format: ExportFormat,
    pub path: PathBuf,
    pub rows: usize,
    pub generated_at: DateTime<Utc>,
}

impl ReportOutput {
    fn new(format: ExportFormat, path: &Path, rows: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            format,
            path: path.to_path_buf(),
            rows,
            generated_at: Utc::now(),
        }
    }
}

/// Serialize a table to CSV. The header is the table's column order;
/// absent cells become empty fields.
pub fn table_to_csv(table: &Table) -> InsightResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .map_err(|e| InsightError::Export(e.to_string()))?;

    for row in table.rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| {
                row.get(column)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            })
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| InsightError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| InsightError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| InsightError::Export(e.to_string()))
}

pub fn write_table_csv(table: &Table, path: &Path) -> InsightResult<ReportOutput> {
    let csv = table_to_csv(table)?;
    fs::write(path, csv)?;
    info!(path = %path.display(), rows = table.len(), "exported CSV");
    Ok(ReportOutput::new(ExportFormat::Csv, path, table.len()))
}

/// Serialize a table as a JSON array of row objects. Absent cells are
/// omitted from their row object, mirroring the in-memory model.
pub fn table_to_json(table: &Table) -> InsightResult<String> {
    let rows: Vec<JsonValue> = table
        .rows()
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for column in table.columns() {
                if let Some(value) = row.get(column) {
                    object.insert(column.clone(), serde_json::to_value(value)?);
                }
            }
            Ok(JsonValue::Object(object))
        })
        .collect::<InsightResult<_>>()?;
    Ok(serde_json::to_string_pretty(&rows)?)
}

pub fn write_table_json(table: &Table, path: &Path) -> InsightResult<ReportOutput> {
    let json = table_to_json(table)?;
    fs::write(path, json)?;
    info!(path = %path.display(), rows = table.len(), "exported JSON");
    Ok(ReportOutput::new(ExportFormat::Json, path, table.len()))
}

/// Write a rendered report to disk. `rows` counts the report's lines.
pub fn write_text_report(content: &str, path: &Path) -> InsightResult<ReportOutput> {
    fs::write(path, content)?;
    info!(path = %path.display(), "exported text report");
    Ok(ReportOutput::new(
        ExportFormat::Text,
        path,
        content.lines().count(),
    ))
}
