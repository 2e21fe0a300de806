use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

use super::record::{AlertRecord, LifecycleStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported export format '{other}'")),
        }
    }
}

const CSV_HEADER: &str =
    "id,alert_type,priority,zone_id,asset_id,created_at,lifecycle_stage,description";

pub fn render<'a, I>(records: I, format: ExportFormat) -> String
where
    I: IntoIterator<Item = &'a AlertRecord>,
{
    match format {
        ExportFormat::Json => {
            let rows: Vec<&AlertRecord> = records.into_iter().collect();
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".into())
        }
        ExportFormat::Csv => render_csv(records),
    }
}

fn render_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a AlertRecord>,
{
    let mut out = String::with_capacity(1024);
    let _ = writeln!(out, "{CSV_HEADER}");
    for r in records {
        let stage = match r.lifecycle_stage {
            LifecycleStage::Active => "Active",
        };
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            csv_field(&r.id),
            csv_field(&r.alert_type),
            r.priority.as_str(),
            csv_field(&r.zone_id),
            csv_field(&r.asset_id),
            rfc3339(r.created_at_ms),
            stage,
            csv_field(&r.description),
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn rfc3339(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::rule::Priority;

    fn record(description: &str) -> AlertRecord {
        AlertRecord {
            id: "ALERT_X_0".into(),
            alert_type: "X".into(),
            description: description.into(),
            priority: Priority::High,
            zone_id: "Zone-1".into(),
            asset_id: "MCN-02".into(),
            created_at_ms: 0,
            lifecycle_stage: LifecycleStage::Active,
        }
    }

    #[test]
    fn csv_has_header_and_row() {
        let r = record("plain");
        let out = render([&r], ExportFormat::Csv);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("ALERT_X_0,X,High,Zone-1,MCN-02,1970-01-01T00:00:00Z,Active,plain")
        );
    }

    #[test]
    fn csv_quotes_commas_and_quotes() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn json_is_array_of_records() {
        let r = record("d");
        let out = render([&r], ExportFormat::Json);
        let parsed: Vec<AlertRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![r]);
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
