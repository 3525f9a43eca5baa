//! Catalog loading from delimited text or JSON.
//!
//! The exercise dataset is a CSV file with one row per exercise. List-valued
//! columns (`primaryMuscles`, `secondaryMuscles`, `instructions`, `images`)
//! come in two encodings depending on how the file was produced:
//!
//! - a bracketed or parenthesized literal: `['quadriceps', "glutes"]`
//! - a plain comma-separated string: `quadriceps,glutes`
//!
//! Values that are absent or cannot be parsed become empty lists. Scalar
//! columns that are absent become empty strings. A `.json` file containing an
//! array of exercise objects is accepted as well.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::catalog::Catalog;
use crate::models::ExerciseRecord;

/// Load the catalog from `path`, choosing the format from the extension.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let exercises = if is_json {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        parse_json(&content)?
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;
        parse_csv(file)?
    };

    Ok(Catalog::new(exercises))
}

/// Parse CSV rows into exercise records. The first row is the header.
///
/// Rows the reader cannot decode are skipped with a warning.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ExerciseRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut exercises = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row = line + 1, error = %e, "skipping unreadable catalog row");
                continue;
            }
        };
        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .collect();
        exercises.push(record_from_row(&row));
    }

    Ok(exercises)
}

fn record_from_row(row: &HashMap<&str, &str>) -> ExerciseRecord {
    let text = |key: &str| row.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
    let list = |key: &str| row.get(key).map(|v| parse_list(v)).unwrap_or_default();

    ExerciseRecord {
        id: text("id"),
        name: text("name"),
        force: text("force"),
        level: text("level"),
        mechanic: text("mechanic"),
        equipment: text("equipment"),
        primary_muscles: list("primaryMuscles"),
        secondary_muscles: list("secondaryMuscles"),
        instructions: list("instructions"),
        category: text("category"),
        images: list("images"),
    }
}

/// Parse a JSON array of exercise objects.
///
/// Unlike strict deserialization, wrong-typed or null fields fall back to
/// empty values, and list fields may also be encoded as strings.
pub fn parse_json(content: &str) -> Result<Vec<ExerciseRecord>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).context("Catalog JSON must be an array of objects")?;
    Ok(values.iter().map(record_from_json).collect())
}

fn record_from_json(value: &serde_json::Value) -> ExerciseRecord {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string()
    };
    let list = |key: &str| match value.get(key) {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(serde_json::Value::String(s)) => parse_list(s),
        _ => Vec::new(),
    };

    ExerciseRecord {
        id: text("id"),
        name: text("name"),
        force: text("force"),
        level: text("level"),
        mechanic: text("mechanic"),
        equipment: text("equipment"),
        primary_muscles: list("primaryMuscles"),
        secondary_muscles: list("secondaryMuscles"),
        instructions: list("instructions"),
        category: text("category"),
        images: list("images"),
    }
}

/// Decode a list-valued column.
///
/// Bracketed or parenthesized values must be a sequence of quoted strings;
/// anything else starting with `[` or `(` yields an empty list. Other values
/// are split on commas, with items trimmed and empty items dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    if raw.starts_with('[') || raw.starts_with('(') {
        return parse_sequence_literal(raw).unwrap_or_default();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_sequence_literal(raw: &str) -> Option<Vec<String>> {
    let mut chars = raw.chars().peekable();
    let close = match chars.next()? {
        '[' => ']',
        '(' => ')',
        _ => return None,
    };

    let mut items = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        match chars.next()? {
            c if c == close => break,
            quote @ ('\'' | '"') => {
                items.push(read_quoted(&mut chars, quote)?);
                skip_whitespace(&mut chars);
                match chars.next()? {
                    ',' => continue,
                    c if c == close => break,
                    _ => return None,
                }
            }
            _ => return None,
        }
    }

    skip_whitespace(&mut chars);
    if chars.next().is_some() {
        return None;
    }
    Some(items)
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Option<String> {
    let mut out = String::new();
    loop {
        match chars.next()? {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                other => out.push(other),
            },
            c if c == quote => return Some(out),
            c => out.push(c),
        }
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_list_bracketed() {
        assert_eq!(
            parse_list("['quadriceps', \"glutes\"]"),
            vec!["quadriceps", "glutes"]
        );
    }

    #[test]
    fn test_parse_list_parenthesized_trailing_comma() {
        assert_eq!(parse_list("('chest',)"), vec!["chest"]);
    }

    #[test]
    fn test_parse_list_escapes() {
        assert_eq!(
            parse_list(r#"['Keep your back straight, don\'t round it.']"#),
            vec!["Keep your back straight, don't round it."]
        );
    }

    #[test]
    fn test_parse_list_plain_comma_separated() {
        assert_eq!(parse_list("chest, triceps,shoulders"), vec!["chest", "triceps", "shoulders"]);
    }

    #[test]
    fn test_parse_list_empty_values() {
        assert!(parse_list("").is_empty());
        assert!(parse_list("   ").is_empty());
        assert!(parse_list("[]").is_empty());
    }

    #[test]
    fn test_parse_list_malformed_literal_is_empty() {
        assert!(parse_list("['unterminated").is_empty());
        assert!(parse_list("[chest, back]").is_empty());
        assert!(parse_list("['a'] trailing").is_empty());
    }

    #[test]
    fn test_parse_csv_rows() {
        let data = "\
id,name,force,level,mechanic,equipment,primaryMuscles,secondaryMuscles,instructions,category,images
Barbell_Squat,Barbell Squat,push,beginner,compound,barbell,['quadriceps'],\"['glutes', 'hamstrings']\",\"['Stand tall.', 'Squat down, then drive up.']\",strength,['Barbell_Squat/0.jpg']
Plank,Plank,static,beginner,,body only,abdominals,,,strength,
";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let squat = &rows[0];
        assert_eq!(squat.id, "Barbell_Squat");
        assert_eq!(squat.primary_muscles, vec!["quadriceps"]);
        assert_eq!(squat.secondary_muscles, vec!["glutes", "hamstrings"]);
        assert_eq!(
            squat.instructions,
            vec!["Stand tall.", "Squat down, then drive up."]
        );
        assert_eq!(squat.images, vec!["Barbell_Squat/0.jpg"]);

        let plank = &rows[1];
        assert_eq!(plank.mechanic, "");
        assert_eq!(plank.primary_muscles, vec!["abdominals"]);
        assert!(plank.secondary_muscles.is_empty());
        assert!(plank.images.is_empty());
    }

    #[test]
    fn test_parse_csv_missing_columns_default() {
        let data = "name,level\nPushups,beginner\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Pushups");
        assert_eq!(rows[0].id, "");
        assert!(rows[0].instructions.is_empty());
    }

    #[test]
    fn test_parse_json_lenient() {
        let data = r#"[
            {"id": "Pushups", "name": "Pushups", "mechanic": null,
             "primaryMuscles": ["chest"], "instructions": "['Lower.', 'Push.']"},
            {"id": "Plank", "images": 3}
        ]"#;
        let rows = parse_json(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mechanic, "");
        assert_eq!(rows[0].primary_muscles, vec!["chest"]);
        assert_eq!(rows[0].instructions, vec!["Lower.", "Push."]);
        assert!(rows[1].images.is_empty());
    }

    #[test]
    fn test_load_catalog_missing_file_errors() {
        let err = load_catalog(Path::new("/nonexistent/exercises.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open catalog file"));
    }

    #[test]
    fn test_load_catalog_from_json_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("exercises.json");
        std::fs::write(&path, r#"[{"id": "a", "name": "A"}]"#).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
