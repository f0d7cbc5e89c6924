//! Parsers for the two precomputed artifacts.
//!
//! - movie_list.dat: a header row naming `::`-separated columns, then one
//!   movie per line in matrix row order. `movie_id` and `title` are required,
//!   other columns are ignored. A title may itself contain `::`: any fields
//!   beyond the header's column count belong to the title.
//!
//!   ```text
//!   movie_id::title
//!   19995::Avatar
//!   285::Pirates of the Caribbean: At World's End
//!   99::Star Trek::The Motion Picture
//!   ```
//!
//! - similarity.json: a JSON array of N arrays of N numbers.

use crate::error::{DataLoadError, Result};
use crate::types::{Catalog, SimilarityMatrix};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Column holding the external movie id
pub const ID_COLUMN: &str = "movie_id";

/// Column holding the display title
pub const TITLE_COLUMN: &str = "title";

const FIELD_SEPARATOR: &str = "::";

/// Open a file, reporting a missing artifact by path rather than as a bare I/O error
fn open_artifact(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Read a file as lines, replacing invalid UTF-8 sequences
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let mut file = open_artifact(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content = String::from_utf8_lossy(&bytes);
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the catalog artifact
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let lines = read_lines(path)?;
    parse_catalog_lines(&file_label(path), &lines)
}

pub(crate) fn parse_catalog_lines(file: &str, lines: &[String]) -> Result<Catalog> {
    // Line numbers are 1-based and count blank lines
    let mut rows = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = rows.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line: 1,
        reason: "Missing header row".to_string(),
    })?;

    let columns: Vec<&str> = header.split(FIELD_SEPARATOR).map(str::trim).collect();
    let id_col = column_position(&columns, ID_COLUMN, file)?;
    let title_col = column_position(&columns, TITLE_COLUMN, file)?;

    let mut catalog = Catalog::default();
    for (line_no, line) in rows {
        let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < columns.len() {
            return Err(DataLoadError::FieldCountMismatch {
                expected: columns.len(),
                found: fields.len(),
                line: line_no,
            });
        }

        // Surplus fields are separators inside the title
        let surplus = fields.len() - columns.len();
        let title = fields[title_col..=title_col + surplus].join(FIELD_SEPARATOR);
        fields.drain(title_col + 1..=title_col + surplus);

        let id = fields[id_col]
            .trim()
            .parse()
            .map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid movie_id: {}", e),
            })?;

        let title = title.trim();
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Empty title".to_string(),
            });
        }

        catalog.push(id, title.to_string());
    }

    Ok(catalog)
}

fn column_position(columns: &[&str], name: &str, file: &str) -> Result<usize> {
    columns
        .iter()
        .position(|column| *column == name)
        .ok_or_else(|| DataLoadError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

/// Parse the similarity artifact
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let file = open_artifact(path)?;
    let rows: Vec<Vec<f32>> = serde_json::from_reader(BufReader::new(file))?;
    SimilarityMatrix::from_rows(rows)
}
