//! Daily report document rendering.
//!
//! Renders one daily report into a fixed-layout, one-page markdown document:
//! a title, the report date, and the report content. User-provided content is
//! sanitised so stray markdown syntax cannot alter the document layout.

use crate::model::DailyReport;

/// Document title line shared by every exported report.
const REPORT_TITLE: &str = "# Daily Report";

/// Renders a report to its downloadable document.
///
/// Layout produced:
/// ```markdown
/// # Daily Report
///
/// **Date:** 2023-03-22
///
/// All patients stable. No major incidents.
/// ```
pub fn render(report: &DailyReport) -> String {
    let mut output = String::new();
    output.push_str(REPORT_TITLE);
    output.push_str("\n\n");
    output.push_str(&format!("**Date:** {}\n\n", report.date.format("%Y-%m-%d")));
    output.push_str(&escape_content(report.content.as_str()));
    output.push('\n');
    output
}

/// File name of the downloadable artifact for `report`.
pub fn file_name(report: &DailyReport) -> String {
    format!("daily_report_{}.md", report.date.format("%Y-%m-%d"))
}

/// Escapes markdown that would break the document layout: headers at line
/// start and standalone horizontal rules.
fn escape_content(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let mut result = String::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        let escaped = if line.trim_start().starts_with('#') {
            line.replacen('#', r"\#", 1)
        } else if trimmed == "---" || trimmed == "***" || trimmed == "___" {
            format!(r"\{trimmed}")
        } else {
            (*line).to_string()
        };

        result.push_str(&escaped);
        if i < lines.len() - 1 {
            result.push('\n');
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;
    use ward_types::NonEmptyText;

    fn report(content: &str) -> DailyReport {
        DailyReport {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2023, 3, 22).unwrap(),
            content: NonEmptyText::new(content).unwrap(),
        }
    }

    #[test]
    fn renders_title_date_and_content() {
        let doc = render(&report("All patients stable. No major incidents."));
        assert_eq!(
            doc,
            "# Daily Report\n\n**Date:** 2023-03-22\n\nAll patients stable. No major incidents.\n"
        );
    }

    #[test]
    fn escapes_headers_and_rules_in_content() {
        let doc = render(&report("# Not a title\n---\nward quiet"));
        assert!(doc.contains("\\# Not a title"));
        assert!(doc.contains("\\---"));
        assert!(doc.contains("ward quiet"));
    }

    #[test]
    fn artifact_name_carries_the_report_date() {
        assert_eq!(file_name(&report("quiet")), "daily_report_2023-03-22.md");
    }
}
