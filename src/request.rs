//! Request envelope parsing and the response document.
//!
//! Requests arrive as a BI export: `records[0].entity["Power BI values"]` is a
//! list of row objects keyed by column name. Only the description and
//! ticket-type columns are read.

use std::collections::HashSet;
use std::fmt;

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, TermError};
use crate::frequency::FrequencyTable;

pub const DESCRIPTION_FIELD: &str = "异常描述";
pub const TICKET_TYPE_FIELD: &str = "工单类型";
const ROWS_FIELD: &str = "Power BI values";

/// One ticket row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub description: String,
    pub ticket_type: Option<String>,
}

impl RawRecord {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ticket_type: None,
        }
    }

    pub fn with_ticket_type(mut self, ticket_type: impl Into<String>) -> Self {
        self.ticket_type = Some(ticket_type.into());
        self
    }
}

/// Parse a JSON request body into ticket rows.
pub fn parse_request(body: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(body)?;
    records_from_value(&value)
}

/// Extract ticket rows from a decoded request envelope.
pub fn records_from_value(value: &Value) -> Result<Vec<RawRecord>> {
    let record_sets = value
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| shape_error("missing 'records' field"))?;
    let rows = record_sets
        .first()
        .and_then(|set| set.get("entity"))
        .and_then(|entity| entity.get(ROWS_FIELD))
        .and_then(Value::as_array)
        .ok_or_else(|| shape_error("missing 'records[0].entity' row list"))?;

    let rows: Vec<&Map<String, Value>> = rows.iter().filter_map(Value::as_object).collect();
    if !rows.iter().any(|row| row.contains_key(DESCRIPTION_FIELD)) {
        return Err(shape_error(&format!("no row carries '{}'", DESCRIPTION_FIELD)));
    }

    Ok(rows
        .into_iter()
        .map(|row| RawRecord {
            description: row.get(DESCRIPTION_FIELD).map(cell_text).unwrap_or_default(),
            ticket_type: row.get(TICKET_TYPE_FIELD).map(cell_text),
        })
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn shape_error(message: &str) -> TermError {
    warn!("invalid request: {}", message);
    TermError::InputShape(message.to_string())
}

/// Which ticket categories a batch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TicketType {
    Overview,
    S,
    M,
    T,
    Unknown,
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TicketType::Overview => "Overview",
            TicketType::S => "S",
            TicketType::M => "M",
            TicketType::T => "T",
            TicketType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// `Overview` when S, M and T all occur, else the first of S, M, T present.
pub fn summarize_ticket_types(records: &[RawRecord]) -> TicketType {
    let seen: HashSet<&str> = records
        .iter()
        .filter_map(|record| record.ticket_type.as_deref())
        .collect();
    let has = |tag: &str| seen.contains(tag);

    if has("S") && has("M") && has("T") {
        TicketType::Overview
    } else if has("S") {
        TicketType::S
    } else if has("M") {
        TicketType::M
    } else if has("T") {
        TicketType::T
    } else {
        TicketType::Unknown
    }
}

/// Response document handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct CloudSummary {
    pub word_freq: Vec<(String, u64)>,
    pub status: String,
    pub ticket_type: TicketType,
    pub created_at: String,
}

impl CloudSummary {
    pub fn new(table: &FrequencyTable, ticket_type: TicketType, top_n: usize) -> Self {
        Self {
            word_freq: table.most_common(top_n),
            status: "success".to_string(),
            ticket_type,
            created_at: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }
}

/// Failure document, mirroring the success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
    pub error: String,
    pub details: String,
}

impl ErrorSummary {
    pub fn new(error: &TermError) -> Self {
        let headline = match error {
            TermError::InputShape(_) => "invalid request data",
            TermError::EmptyContent => "fault descriptions are empty",
            _ => "error while processing request",
        };
        Self {
            error: headline.to_string(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(rows: Value) -> Value {
        json!({ "records": [ { "entity": { "Power BI values": rows } } ] })
    }

    #[test]
    fn test_parses_rows() {
        let body = envelope(json!([
            { "异常描述": "设备不转动", "工单类型": "S" },
            { "异常描述": "马达漏油", "工单类型": "M", "机台": "A-01" },
        ]));
        let records = records_from_value(&body).unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("设备不转动").with_ticket_type("S"),
                RawRecord::new("马达漏油").with_ticket_type("M"),
            ]
        );
    }

    #[test]
    fn test_non_string_cells_are_stringified() {
        let body = envelope(json!([
            { "异常描述": 42 },
            { "异常描述": null },
            { "工单类型": "T" },
        ]));
        let records = records_from_value(&body).unwrap();
        assert_eq!(records[0].description, "42");
        assert_eq!(records[1].description, "");
        assert_eq!(records[2], RawRecord::new("").with_ticket_type("T"));
    }

    #[test]
    fn test_missing_records_is_shape_error() {
        let err = records_from_value(&json!({ "data": [] })).unwrap_err();
        assert!(matches!(err, TermError::InputShape(_)));
        let err = parse_request(r#"{"records": []}"#).unwrap_err();
        assert!(matches!(err, TermError::InputShape(_)));
    }

    #[test]
    fn test_missing_description_column_is_shape_error() {
        let body = envelope(json!([{ "工单类型": "S" }, { "备注": "无" }]));
        let err = records_from_value(&body).unwrap_err();
        assert!(err.to_string().contains(DESCRIPTION_FIELD));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_request("{"), Err(TermError::Json(_))));
    }

    #[test]
    fn test_ticket_type_precedence() {
        let tagged = |tags: &[&str]| -> Vec<RawRecord> {
            tags.iter().map(|t| RawRecord::new("").with_ticket_type(*t)).collect()
        };
        assert_eq!(summarize_ticket_types(&tagged(&["T", "M", "S"])), TicketType::Overview);
        assert_eq!(summarize_ticket_types(&tagged(&["T", "S"])), TicketType::S);
        assert_eq!(summarize_ticket_types(&tagged(&["T", "M"])), TicketType::M);
        assert_eq!(summarize_ticket_types(&tagged(&["T", "X"])), TicketType::T);
        assert_eq!(summarize_ticket_types(&tagged(&["X"])), TicketType::Unknown);
        assert_eq!(summarize_ticket_types(&[RawRecord::new("")]), TicketType::Unknown);
        assert_eq!(TicketType::Overview.to_string(), "Overview");
    }

    #[test]
    fn test_summary_serializes_pairs() {
        let table: FrequencyTable = ["卡料", "卡料", "虚焊"].into_iter().collect();
        let summary = CloudSummary::new(&table, TicketType::S, 20);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["word_freq"], json!([["卡料", 2], ["虚焊", 1]]));
        assert_eq!(value["status"], "success");
        assert_eq!(value["ticket_type"], "S");
        assert!(value["created_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_error_summary() {
        let summary = ErrorSummary::new(&TermError::EmptyContent);
        assert_eq!(summary.error, "fault descriptions are empty");
        assert_eq!(summary.details, "fault descriptions are empty after cleaning");
    }
}
