use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Read},
    path::Path,
};

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::{normalize_header, Corpus, CorpusColumns, CorpusEntry};
use crate::error::AppError;

/// Tabular formats the loader understands, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    JsonLines,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jsonl" | "ndjson") => Self::JsonLines,
            _ => Self::Csv,
        }
    }
}

/// Rows seen versus entries kept, for the load summary.
#[derive(Debug)]
struct Loaded {
    rows: usize,
    entries: Vec<CorpusEntry>,
}

/// Loads the corpus once at startup. Rows lacking either required field are
/// dropped; the order of the remaining rows is kept.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_corpus(path: &Path, columns: &CorpusColumns) -> Result<Corpus, AppError> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            AppError::SourceNotFound(path.to_path_buf())
        } else {
            AppError::Io(err)
        }
    })?;

    let format = SourceFormat::from_path(path);
    let loaded = match format {
        SourceFormat::Csv => read_csv(file, columns)?,
        SourceFormat::JsonLines => read_json_lines(BufReader::new(file), columns)?,
    };

    let kept = loaded.entries.len();
    let dropped = loaded.rows.saturating_sub(kept);
    if dropped > 0 {
        warn!(dropped, "Dropped corpus rows with a missing problem or verse");
    }
    info!(?format, rows = loaded.rows, kept, "Corpus loaded");

    Ok(Corpus::new(loaded.entries))
}

fn read_csv<R: Read>(source: R, columns: &CorpusColumns) -> Result<Loaded, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let position = |wanted: &str| {
        headers
            .iter()
            .position(|header| normalize_header(header) == wanted)
            .ok_or_else(|| AppError::MissingColumn(wanted.to_string()))
    };
    let problem_idx = position(&columns.problem)?;
    let verse_idx = position(&columns.verse)?;

    let mut loaded = Loaded {
        rows: 0,
        entries: Vec::new(),
    };
    for record in reader.records() {
        let record = record?;
        loaded.rows = loaded.rows.saturating_add(1);

        if let (Some(problem), Some(verse)) = (record.get(problem_idx), record.get(verse_idx)) {
            if let Some(entry) = CorpusEntry::new(problem, verse) {
                loaded.entries.push(entry);
            }
        }
    }

    Ok(loaded)
}

fn read_json_lines<R: BufRead>(source: R, columns: &CorpusColumns) -> Result<Loaded, AppError> {
    let mut seen_columns = HashSet::new();
    let mut rows: Vec<Map<String, Value>> = Vec::new();

    for line in source.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: Map<String, Value> = serde_json::from_str(&line)?;
        // First occurrence wins when two keys normalise to the same column.
        let mut row = Map::with_capacity(raw.len());
        for (key, value) in raw {
            let key = normalize_header(&key);
            seen_columns.insert(key.clone());
            row.entry(key).or_insert(value);
        }
        rows.push(row);
    }

    for wanted in [&columns.problem, &columns.verse] {
        if !seen_columns.contains(wanted.as_str()) {
            return Err(AppError::MissingColumn(wanted.clone()));
        }
    }

    let entries = rows
        .iter()
        .filter_map(|row| {
            let problem = row.get(&columns.problem).and_then(value_text)?;
            let verse = row.get(&columns.verse).and_then(value_text)?;
            CorpusEntry::new(problem, verse)
        })
        .collect();

    Ok(Loaded {
        rows: rows.len(),
        entries,
    })
}

/// Coerces a JSON cell to text; `null` counts as missing.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn verses(corpus: &Corpus) -> Vec<&str> {
        corpus.entries().iter().map(CorpusEntry::verse).collect()
    }

    #[test]
    fn csv_headers_match_case_and_whitespace_insensitively() {
        let data = " Problem ,Chapter,SHLOKA_COMBINED\nमन अस्थिर,2,V1\nराग येतो,3,V2\n";
        let loaded = read_csv(data.as_bytes(), &CorpusColumns::default()).unwrap();

        assert_eq!(loaded.rows, 2);
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].problem(), "मन अस्थिर");
        assert_eq!(loaded.entries[1].verse(), "V2");
    }

    #[test]
    fn csv_rows_with_missing_fields_are_dropped() {
        let data = "problem,shloka_combined\n\
                    first,V1\n\
                    ,V2\n\
                    third,\n\
                    fourth\n\
                    fifth,V5\n";
        let loaded = read_csv(data.as_bytes(), &CorpusColumns::default()).unwrap();

        assert_eq!(loaded.rows, 5);
        let kept: Vec<&str> = loaded.entries.iter().map(CorpusEntry::verse).collect();
        assert_eq!(kept, vec!["V1", "V5"]);
    }

    #[test]
    fn csv_missing_problem_column_is_an_error() {
        let data = "question,shloka_combined\nq,V1\n";
        let err = read_csv(data.as_bytes(), &CorpusColumns::default()).unwrap_err();

        assert!(matches!(err, AppError::MissingColumn(column) if column == "problem"));
    }

    #[test]
    fn csv_missing_verse_column_is_an_error() {
        let data = "problem,shloka\nq,V1\n";
        let err = read_csv(data.as_bytes(), &CorpusColumns::default()).unwrap_err();

        assert!(matches!(err, AppError::MissingColumn(column) if column == "shloka_combined"));
    }

    #[test]
    fn csv_uses_configured_columns() {
        let data = "Issue,Verse\nq,V1\n";
        let columns = CorpusColumns::new("issue", "verse");
        let loaded = read_csv(data.as_bytes(), &columns).unwrap();

        assert_eq!(loaded.entries.len(), 1);
    }

    #[test]
    fn json_lines_coerce_scalars_and_drop_nulls() {
        let data = r#"{"Problem": "anxious", "shloka_combined": "V1"}

{"problem": "calm", "shloka_combined": null}
{"problem": 42, "shloka_combined": "V3"}
{"shloka_combined": "V4"}
"#;
        let loaded = read_json_lines(data.as_bytes(), &CorpusColumns::default()).unwrap();

        assert_eq!(loaded.rows, 4);
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[1].problem(), "42");
    }

    #[test]
    fn json_lines_without_required_column_is_an_error() {
        let data = r#"{"issue": "anxious", "shloka_combined": "V1"}"#;
        let err = read_json_lines(data.as_bytes(), &CorpusColumns::default()).unwrap_err();

        assert!(matches!(err, AppError::MissingColumn(column) if column == "problem"));
    }

    #[test]
    fn json_lines_reject_malformed_rows() {
        let data = "{\"problem\": \"a\", \"shloka_combined\": \"V1\"}\nnot json\n";
        let err = read_json_lines(data.as_bytes(), &CorpusColumns::default()).unwrap_err();

        assert!(matches!(err, AppError::Json(_)));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");

        let err = load_corpus(&path, &CorpusColumns::default()).unwrap_err();

        assert!(matches!(err, AppError::SourceNotFound(missing) if missing == path));
    }

    #[test]
    fn load_corpus_picks_format_from_extension() {
        let dir = TempDir::new().unwrap();

        let csv_path = dir.path().join("verses.csv");
        std::fs::write(&csv_path, "problem,shloka_combined\na,V1\nb,V2\n").unwrap();

        let jsonl_path = dir.path().join("verses.JSONL");
        let mut file = File::create(&jsonl_path).unwrap();
        writeln!(file, r#"{{"problem": "a", "shloka_combined": "J1"}}"#).unwrap();

        let from_csv = load_corpus(&csv_path, &CorpusColumns::default()).unwrap();
        let from_jsonl = load_corpus(&jsonl_path, &CorpusColumns::default()).unwrap();

        assert_eq!(verses(&from_csv), vec!["V1", "V2"]);
        assert_eq!(verses(&from_jsonl), vec!["J1"]);
    }

    #[test]
    fn format_detection() {
        assert_eq!(
            SourceFormat::from_path(Path::new("data.ndjson")),
            SourceFormat::JsonLines
        );
        assert_eq!(SourceFormat::from_path(Path::new("data.tsv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("data")), SourceFormat::Csv);
    }
}
