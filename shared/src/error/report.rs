//! Remote rejection reports
//!
//! When the backend refuses a mutation on business grounds (insufficient
//! stock, rule violations) it answers with a message and an optional list of
//! offending lines. The report is shown to the user as an itemized table.

use serde::{Deserialize, Serialize};

/// One offending line of a remote rejection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<serde_json::Value>,
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Structured report of a refused mutation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RejectionReport {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "items", alias = "details")]
    pub errors: Vec<RejectionLine>,
}

impl RejectionReport {
    /// Create a report with only a headline
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Parse a remote error body, returning `None` if it isn't a report
    pub fn from_body(body: &str) -> Option<Self> {
        let report: Self = serde_json::from_str(body).ok()?;
        if report.message.is_empty() && report.errors.is_empty() {
            return None;
        }
        Some(report)
    }

    /// Render the report as an itemized text table
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        if !self.message.is_empty() {
            out.push_str(&self.message);
            out.push('\n');
        }
        if self.errors.is_empty() {
            return out;
        }

        let rows: Vec<[String; 4]> = self
            .errors
            .iter()
            .map(|line| {
                [
                    line.product_name
                        .clone()
                        .or_else(|| line.field.clone())
                        .unwrap_or_else(|| "-".to_string()),
                    value_cell(line.requested.as_ref()),
                    value_cell(line.available.as_ref()),
                    line.reason.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();

        let header = ["Item", "Requested", "Available", "Reason"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let fmt_row = |cells: [&str; 4]| -> String {
            cells
                .iter()
                .zip(widths.iter())
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        out.push_str(&fmt_row(header));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &rows {
            out.push_str(&fmt_row([&row[0], &row[1], &row[2], &row[3]]));
            out.push('\n');
        }
        out
    }
}

fn value_cell(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

impl std::fmt::Display for RejectionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "request rejected ({} item(s))", self.errors.len())
        } else {
            f.write_str(&self.message)
        }
    }
}
