//! CSV ingestion, the upload collaborator feeding the core.

use insight_core::{InsightError, InsightResult, Row, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct SourceFile {
    pub name: String,
    pub table: Table,
}

/// Read every `*.csv` file in `dir`, sorted by file name so the upload
/// order is deterministic. Headers are preserved verbatim; normalization
/// happens later in the pipeline.
pub fn read_input_dir(dir: &Path) -> InsightResult<Vec<SourceFile>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    info!(dir = %dir.display(), files = paths.len(), "scanning input directory");

    let mut sources = Vec::new();
    for path in paths {
        let table = read_csv_table(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(file = %name, rows = table.len(), "loaded input file");
        sources.push(SourceFile { name, table });
    }
    Ok(sources)
}

/// Parse one CSV file into a table. Numeric-looking fields become
/// numbers, everything else text; empty fields stay absent.
pub fn read_csv_table(path: &Path) -> InsightResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| InsightError::Ingest(format!("{}: {e}", path.display())))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| InsightError::Ingest(format!("{}: {e}", path.display())))?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut table = Table::with_columns(headers.iter().map(|h| h.as_str()));
    for record in reader.records() {
        let record = record.map_err(|e| InsightError::Ingest(format!("{}: {e}", path.display())))?;
        let mut row = Row::new();
        for (index, field) in record.iter().enumerate() {
            let Some(column) = headers.get(index) else {
                continue;
            };
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            match field.parse::<f64>() {
                Ok(number) => row.set(column.as_str(), number),
                Err(_) => row.set(column.as_str(), field),
            }
        }
        table.push_row(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_headers_preserved_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.csv", "Campaign Name,Cost,Clicks\nsummer,100.5,50\n");

        let table = read_csv_table(&dir.path().join("a.csv")).unwrap();
        assert_eq!(table.columns(), &["Campaign Name", "Cost", "Clicks"]);
        assert_eq!(table.rows()[0].number("Cost"), Some(100.5));
        assert_eq!(table.rows()[0].text("Campaign Name"), Some("summer"));
    }

    #[test]
    fn test_empty_fields_stay_absent() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.csv", "clicks,spend\n10,\n");

        let table = read_csv_table(&dir.path().join("a.csv")).unwrap();
        assert_eq!(table.rows()[0].number("clicks"), Some(10.0));
        assert!(!table.rows()[0].contains("spend"));
    }

    #[test]
    fn test_input_dir_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b.csv", "clicks\n2\n");
        write_file(dir.path(), "a.csv", "clicks\n1\n");
        write_file(dir.path(), "notes.txt", "ignore me");

        let sources = read_input_dir(dir.path()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }
}
