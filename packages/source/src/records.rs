//! Incarceration records endpoint.
//!
//! The endpoint returns a JSON array of row objects. Some exports wrap
//! the array in an object under `data` or `records`; both shapes are
//! accepted.

use prison_viz_records_models::Record;
use serde_json::Value;

use crate::{SourceError, get_text};

/// Keys checked, in order, when the payload is an object wrapping the rows.
const WRAPPER_KEYS: &[&str] = &["data", "records"];

/// Fetches and parses all records from `url`.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the server answers with
/// a non-success status, or the payload is not an array of objects.
pub async fn fetch_records(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Record>, SourceError> {
    log::info!("Fetching incarceration records from {url}");
    let body = get_text(client, url).await?;
    let records = parse_records(&body)?;
    log::info!("Fetched {} records", records.len());
    Ok(records)
}

/// Parses a records payload.
///
/// # Errors
///
/// Returns [`SourceError::Json`] for invalid JSON or rows that are not
/// objects, and [`SourceError::Format`] if no row array can be found.
pub fn parse_records(body: &str) -> Result<Vec<Record>, SourceError> {
    let json: Value = serde_json::from_str(body)?;

    let rows = match json {
        Value::Array(rows) => rows,
        Value::Object(mut obj) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(rows)) => Some(rows),
                _ => None,
            })
            .ok_or_else(|| SourceError::Format {
                message: format!(
                    "expected an array of records or an object with one of {WRAPPER_KEYS:?}"
                ),
            })?,
        other => {
            return Err(SourceError::Format {
                message: format!("expected an array of records, got {other}"),
            });
        }
    };

    Ok(rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Record>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{client, serve_once};

    #[test]
    fn parses_bare_array() {
        let records = parse_records(r#"[{"sex":"M","age":20},{"sex":"F","age":"31"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].sex.as_deref(), Some("F"));
        assert!((records[1].age - 31.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_wrapped_array() {
        let records = parse_records(r#"{"meta":{},"records":[{"sex":"M"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_array_is_empty_dataset() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_scalar_payload() {
        assert!(matches!(
            parse_records("42"),
            Err(SourceError::Format { .. })
        ));
    }

    #[test]
    fn rejects_object_without_rows() {
        assert!(matches!(
            parse_records(r#"{"rows":[]}"#),
            Err(SourceError::Format { .. })
        ));
    }

    #[test]
    fn rejects_non_object_rows() {
        assert!(matches!(
            parse_records(r#"[1, 2]"#),
            Err(SourceError::Json(_))
        ));
    }

    #[tokio::test]
    async fn fetch_returns_served_records() {
        let base = serve_once("200 OK", r#"[{"sex":"M","age":20},{"sex":"F","age":25}]"#);
        let records = fetch_records(&client(), &format!("{base}/r.json"))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sex.as_deref(), Some("M"));
    }

    #[tokio::test]
    async fn fetch_reports_error_status() {
        let base = serve_once("404 Not Found", "");
        let url = format!("{base}/r.json");
        let err = fetch_records(&client(), &url).await.unwrap_err();
        match err {
            SourceError::Status { url: failed, status } => {
                assert_eq!(failed, url);
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("expected status error, got {other}"),
        }
    }
}
