//! Daily ward reports.
//!
//! Reports are session-local: an append-only list held in memory, never sent
//! to the remote store. Each entry renders to a fixed-layout markdown
//! document that can be written to disk as a downloadable artifact.

use crate::error::{WardError, WardResult};
use crate::model::DailyReport;
use crate::report;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use ward_types::NonEmptyText;

/// Reports screen controller. No remote fetches, so no loading or error
/// states; the list is always displayable.
pub struct ReportsScreen {
    reports: Vec<DailyReport>,
    /// Draft report text being composed.
    pub draft: String,
    /// Date the draft will be filed under.
    pub selected_date: NaiveDate,
}

impl ReportsScreen {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reports: Vec::new(),
            draft: String::new(),
            selected_date: today,
        }
    }

    /// Reports in the order they were added.
    pub fn reports(&self) -> &[DailyReport] {
        &self.reports
    }

    /// Files the current draft under the selected date.
    ///
    /// Empty or whitespace-only drafts are rejected without appending. On
    /// success the draft is cleared and the new report is returned.
    pub fn add(&mut self) -> Option<&DailyReport> {
        let content = NonEmptyText::new(&self.draft).ok()?;
        self.reports.push(DailyReport {
            id: Uuid::new_v4(),
            date: self.selected_date,
            content,
        });
        self.draft.clear();
        self.reports.last()
    }

    /// Writes one report's rendered document into `dir`, returning the path
    /// of the written artifact.
    pub fn export(&self, id: Uuid, dir: &Path) -> WardResult<PathBuf> {
        let Some(entry) = self.reports.iter().find(|r| r.id == id) else {
            return Err(WardError::InvalidInput("unknown report".into()));
        };
        let path = dir.join(report::file_name(entry));
        std::fs::write(&path, report::render(entry)).map_err(WardError::ReportWrite)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ReportsScreen {
        ReportsScreen::new(NaiveDate::from_ymd_opt(2023, 3, 22).unwrap())
    }

    #[test]
    fn add_appends_and_clears_draft() {
        let mut screen = screen();
        screen.draft = "All patients stable.".into();

        let added = screen.add().unwrap();
        assert_eq!(added.content.as_str(), "All patients stable.");
        assert!(screen.draft.is_empty());
        assert_eq!(screen.reports().len(), 1);
    }

    #[test]
    fn blank_draft_is_rejected() {
        let mut screen = screen();
        screen.draft = "   ".into();
        assert!(screen.add().is_none());
        assert!(screen.reports().is_empty());
    }

    #[test]
    fn reports_keep_insertion_order() {
        let mut screen = screen();
        screen.draft = "first".into();
        screen.add();
        screen.selected_date = NaiveDate::from_ymd_opt(2023, 3, 23).unwrap();
        screen.draft = "second".into();
        screen.add();

        let dates: Vec<NaiveDate> = screen.reports().iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2023, 3, 22).unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 23).unwrap(),
            ]
        );
    }

    #[test]
    fn export_writes_the_rendered_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut screen = screen();
        screen.draft = "Ward quiet overnight.".into();
        let id = screen.add().unwrap().id;

        let path = screen.export(id, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "daily_report_2023-03-22.md"
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Daily Report\n"));
        assert!(written.contains("Ward quiet overnight."));
    }

    #[test]
    fn export_of_unknown_report_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let screen = screen();
        assert!(screen.export(Uuid::new_v4(), dir.path()).is_err());
    }
}
