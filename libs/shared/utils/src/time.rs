use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a timestamp as submitted by the scheduling forms. The UI sends
/// local-form strings without a zone (`2024-03-01T09:00`); already-absolute
/// RFC 3339 timestamps are accepted too.
pub fn parse_form_datetime(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(absolute) = DateTime::parse_from_rfc3339(input) {
        return Ok(absolute.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .map_err(|_| format!("Invalid timestamp: {}", input))?;

    Ok(naive.and_utc())
}
