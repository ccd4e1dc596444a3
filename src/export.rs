//! Printable documents for single inspection records.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::models::InspectionRecord;

const ENABLE_LOGS: bool = true;
use crate::log_debug;

/// Turns one record into a downloadable document and reports where it went.
pub trait RecordExporter {
    fn export(&self, record: &InspectionRecord) -> Result<PathBuf>;
}

/// Writes a self-contained HTML page per record, laid out for printing.
pub struct HtmlReportExporter {
    output_dir: PathBuf,
}

impl HtmlReportExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn file_name(record: &InspectionRecord) -> String {
        let point: String = record
            .point_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let short_id: String = record.id.chars().take(8).collect();
        format!(
            "inspection_{}_{}_{}.html",
            if point.is_empty() { "unnamed" } else { point.as_str() },
            record.timestamp.format("%Y-%m-%d"),
            short_id
        )
    }
}

impl RecordExporter for HtmlReportExporter {
    fn export(&self, record: &InspectionRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create export directory {}", self.output_dir.display())
        })?;

        let path = self.output_dir.join(Self::file_name(record));
        let document = render_html(record);
        fs::write(&path, &document)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        log_debug!("Wrote report for {} ({} bytes)", record.id, document.len());
        Ok(path)
    }
}

/// Renders the printable page. All record text is escaped; the signature is
/// embedded only when it is a PNG data URI.
pub fn render_html(record: &InspectionRecord) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        html,
        "<title>Fire Extinguisher Inspection - {}</title>",
        escape_html(&record.point_number)
    );
    html.push_str(
        "<style>\n\
         body { font-family: Helvetica, Arial, sans-serif; margin: 32px; color: #1e293b; }\n\
         h1 { color: #dc2626; margin-bottom: 4px; }\n\
         table { border-collapse: collapse; width: 100%; margin-top: 16px; }\n\
         th, td { border: 1px solid #cbd5e1; padding: 6px 10px; text-align: left; }\n\
         th { background: #f1f5f9; width: 35%; }\n\
         .pass { color: #15803d; font-weight: bold; }\n\
         .fail { color: #b91c1c; font-weight: bold; }\n\
         .signature { margin-top: 24px; }\n\
         .signature img { border-bottom: 1px solid #1e293b; max-width: 100%; }\n\
         @media print { body { margin: 0; } }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str("<h1>Fire Extinguisher Inspection Report</h1>\n");
    let _ = writeln!(
        html,
        "<p>Recorded {}</p>",
        escape_html(&record.timestamp.format("%Y-%m-%d %H:%M UTC").to_string())
    );

    html.push_str("<table>\n");
    push_row(&mut html, "Report ID", &record.id);
    push_row(&mut html, "Type of Extinguisher", record.extinguisher_type.display_name());
    push_row(&mut html, "Point Number", &record.point_number);
    push_row(&mut html, "Month", &record.month);
    push_check(&mut html, "Seal", record.seal.as_str(), record.seal.is_satisfactory());
    push_check(
        &mut html,
        "Pressure",
        record.pressure.as_str(),
        record.pressure.is_satisfactory(),
    );
    push_check(
        &mut html,
        "Hose Pipe",
        record.hose_pipe.as_str(),
        record.hose_pipe.is_satisfactory(),
    );
    push_check(
        &mut html,
        "Safety Pin",
        record.safety_pin.as_str(),
        record.safety_pin.is_satisfactory(),
    );
    let passed = record.all_checks_passed();
    push_check(
        &mut html,
        "Checks",
        if passed { "All passed" } else { "Attention needed" },
        passed,
    );
    push_row(&mut html, "Overall Condition", &record.overall_condition);
    push_row(&mut html, "Supply Date", &record.supply_date.to_string());
    push_row(&mut html, "Expiry Date", &record.expiry_date.to_string());
    push_row(&mut html, "Fire Marshal Name", &record.fire_marshal_name);
    push_row(&mut html, "Staff ID", &record.staff_id);
    push_row(&mut html, "Section", &record.section);
    html.push_str("</table>\n");

    html.push_str("<div class=\"signature\">\n<p>Signature</p>\n");
    match record.signature_data.as_deref() {
        Some(uri) if uri.starts_with("data:image/png;base64,") => {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"Signature of {}\">",
                escape_html(uri),
                escape_html(&record.fire_marshal_name)
            );
        }
        _ => html.push_str("<p><em>Not signed</em></p>\n"),
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn push_row(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        html,
        "<tr><th>{}</th><td>{}</td></tr>",
        escape_html(label),
        escape_html(value)
    );
}

fn push_check(html: &mut String, label: &str, value: &str, passed: bool) {
    let _ = writeln!(
        html,
        "<tr><th>{}</th><td class=\"{}\">{}</td></tr>",
        escape_html(label),
        if passed { "pass" } else { "fail" },
        escape_html(value)
    );
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExtinguisherType, HosePipeCondition, InspectionDraft, PressureReading, SafetyPinStatus,
        SealCondition,
    };
    use chrono::{DateTime, NaiveDate, Utc};

    fn record(signature: Option<String>) -> InspectionRecord {
        let draft = InspectionDraft {
            extinguisher_type: ExtinguisherType::Abc,
            point_number: "FE/101 <A>".into(),
            month: "August".into(),
            seal: SealCondition::Broken,
            pressure: PressureReading::Normal,
            hose_pipe: HosePipeCondition::Good,
            safety_pin: SafetyPinStatus::Present,
            overall_condition: "Rust & dents".into(),
            supply_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 8, 1).unwrap(),
            fire_marshal_name: "O'Neil".into(),
            staff_id: "S-1".into(),
            section: "Floor 2".into(),
        };
        let timestamp = DateTime::parse_from_rfc3339("2026-08-02T10:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        InspectionRecord::from_draft(draft, signature, timestamp)
    }

    #[test]
    fn html_escapes_user_text_and_flags_failed_checks() {
        let html = render_html(&record(None));
        assert!(html.contains("FE/101 &lt;A&gt;"));
        assert!(html.contains("Rust &amp; dents"));
        assert!(html.contains("O&#39;Neil"));
        assert!(html.contains("<td class=\"fail\">Broken</td>"));
        assert!(html.contains("<td class=\"pass\">OK</td>"));
        assert!(html.contains("ABC Powder"));
        assert!(html.contains("2027-08-01"));
        assert!(html.contains("Not signed"));
        assert!(html.contains("<td class=\"fail\">Attention needed</td>"));
        assert!(!html.contains("<A>"));
    }

    #[test]
    fn png_signature_is_embedded() {
        let uri = "data:image/png;base64,iVBORw0KGgo=".to_string();
        let html = render_html(&record(Some(uri.clone())));
        assert!(html.contains(&format!("<img src=\"{uri}\"")));
        assert!(!html.contains("All passed"));

        let foreign = render_html(&record(Some("javascript:alert(1)".into())));
        assert!(!foreign.contains("<img"));
    }

    #[test]
    fn export_writes_one_file_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = HtmlReportExporter::new(dir.path().join("exports"));
        let record = record(None);

        let path = exporter.export(&record).unwrap();
        assert_eq!(path.parent().unwrap(), exporter.output_dir());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("inspection_FE_101__A__2026-08-02_"));
        assert!(name.ends_with(".html"));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_html(&record));
    }
}
