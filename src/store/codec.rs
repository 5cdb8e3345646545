//! Text encoding of the result table.
//!
//! One header line, then one line per row. Absent optional values are empty
//! fields. Numbers are plain base-10 with no locale formatting.
use std::fmt::Write;

use crate::trial::ResultRow;

use super::error::{Result, StoreError};

/// Column names, in file order.
pub const COLUMNS: [&str; 5] = [
    "score",
    "agent",
    "player_count",
    "tree_policy",
    "deterministic_samples",
];

/// Markers read back as an absent value. Data frame tools write `NaN` for
/// missing numbers.
const ABSENT_MARKERS: [&str; 4] = ["", "NaN", "nan", "NA"];

pub fn header() -> String {
    COLUMNS.join(",")
}

/// Encode rows, header included.
pub fn encode(rows: &[ResultRow]) -> String {
    let mut out = String::with_capacity(64 + rows.len() * 32);
    out.push_str(&header());
    out.push('\n');
    for row in rows {
        encode_row(&mut out, row);
    }
    out
}

fn encode_row(out: &mut String, row: &ResultRow) {
    // Writing to a String can't fail
    let _ = write!(
        out,
        "{},{},{},{},{}",
        row.score,
        quote(&row.agent_label),
        row.player_count,
        optional(row.policy_variant),
        optional(row.deterministic_samples),
    );
    out.push('\n');
}

/// Check that `row` reads back unchanged once encoded.
pub fn check_row(row: &ResultRow) -> std::result::Result<(), String> {
    if row.agent_label.is_empty() {
        return Err("agent is missing".to_string());
    }
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Decode a whole file.
///
/// An empty input, or one holding only the header, decodes to no rows. Any
/// header other than [`COLUMNS`] is a [`StoreError::SchemaMismatch`].
pub fn decode(text: &str) -> Result<Vec<ResultRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text)?.into_iter();

    let Some((_, header_fields)) = records.next() else {
        return Ok(Vec::new());
    };
    if header_fields.iter().map(String::as_str).ne(COLUMNS) {
        return Err(StoreError::SchemaMismatch {
            expected: header(),
            found: header_fields.join(","),
        });
    }

    records
        .filter(|(_, fields)| !(fields.len() == 1 && fields[0].is_empty()))
        .map(|(line, fields)| {
            decode_row(&fields).map_err(|reason| StoreError::MalformedRow { line, reason })
        })
        .collect()
}

fn decode_row(fields: &[String]) -> std::result::Result<ResultRow, String> {
    if fields.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} fields, found {}",
            COLUMNS.len(),
            fields.len()
        ));
    }
    let score: u8 = parse_integer(&fields[0], "score")?.ok_or("score is missing")?;
    let agent_label = fields[1].clone();
    let player_count: usize =
        parse_integer(&fields[2], "player_count")?.ok_or("player_count is missing")?;

    let row = ResultRow {
        score,
        agent_label,
        player_count,
        policy_variant: parse_integer(&fields[3], "tree_policy")?,
        deterministic_samples: parse_integer(&fields[4], "deterministic_samples")?,
    };
    check_row(&row)?;
    Ok(row)
}

/// Parse an integer column, accepting integral decimals such as `3.0`.
fn parse_integer<T>(field: &str, column: &str) -> std::result::Result<Option<T>, String>
where
    T: TryFrom<u64> + std::str::FromStr,
{
    let field = field.trim();
    if ABSENT_MARKERS.contains(&field) {
        return Ok(None);
    }
    if let Ok(value) = field.parse::<T>() {
        return Ok(Some(value));
    }
    let invalid = || format!("{} is not a valid integer: `{}`", column, field);
    let float: f64 = field.parse().map_err(|_| invalid())?;
    if !float.is_finite() || float.fract() != 0.0 || float < 0.0 || float > u64::MAX as f64 {
        return Err(invalid());
    }
    T::try_from(float as u64).map(Some).map_err(|_| invalid())
}

/// Split text into records of fields, tracking the line each record starts
/// on. Quoted fields may contain commas, doubled quotes and newlines.
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StoreError::MalformedRow {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}
