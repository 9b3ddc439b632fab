//! Assessment report: the whole catalog with ratings and focus flags,
//! rendered as a tab-separated text summary and as CSV.
//!
//! Both renderings share the same header block and row order. Rows always
//! cover every skill of every tab; visibility, search text and the active
//! tab play no part.

pub mod delivery;

use crate::catalog::Catalog;
use crate::store::AssessmentStore;
use crate::view::Summary;
use chrono::NaiveDate;

pub const TITLE: &str = "CAPABILITY MATRIX ASSESSMENT";
pub const COLUMNS: [&str; 5] = ["Category", "Group", "Skill", "Rating", "Focus Area"];
pub const CSV_MIME: &str = "text/csv";

/// Shown for an unrated skill or one that is not a focus area
const PLACEHOLDER: &str = "-";
const FOCUS_MARK: &str = "YES";
const TITLE_RULE: &str = "====================================================";
const SECTION_RULE: &str = "----------------------------";

/// One line of the breakdown table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub category: String,
    pub group: String,
    pub skill: String,
    pub rating: String,
    pub focus: String,
}

impl ReportRow {
    fn fields(&self) -> [&str; 5] {
        [
            self.category.as_str(),
            self.group.as_str(),
            self.skill.as_str(),
            self.rating.as_str(),
            self.focus.as_str(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    /// Date as it appears in the title
    pub date_label: String,
    pub date: NaiveDate,
    pub summary: Summary,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Snapshot the store against the full catalog. `date_format` is a
    /// chrono format string for the title date.
    pub fn build(
        catalog: &Catalog,
        store: &AssessmentStore,
        date: NaiveDate,
        date_format: &str,
    ) -> Self {
        let summary = Summary::compute(catalog, store.ratings(), store.focus_areas());

        let rows = catalog
            .entries()
            .map(|entry| ReportRow {
                category: entry.tab.label.clone(),
                group: entry.group.name.clone(),
                skill: entry.skill.name.clone(),
                rating: store
                    .rating(&entry.skill.id)
                    .map(|r| r.label())
                    .unwrap_or(PLACEHOLDER)
                    .to_string(),
                focus: if store.is_focused(&entry.skill.id) {
                    FOCUS_MARK
                } else {
                    PLACEHOLDER
                }
                .to_string(),
            })
            .collect();

        Self {
            date_label: format_date(date, date_format),
            date,
            summary,
            rows,
        }
    }

    /// Title and overview lines shared by both renderings. Blank entries
    /// are spacer lines.
    pub fn header_lines(&self) -> Vec<String> {
        let s = &self.summary;
        vec![
            format!("{} - {}", TITLE, self.date_label),
            TITLE_RULE.to_string(),
            String::new(),
            "OVERVIEW".to_string(),
            SECTION_RULE.to_string(),
            format!("Completion:   {}%", s.completion_percent()),
            format!("Focus Areas:  {}", s.focused),
            format!("Advanced:     {}", s.advanced),
            format!("Intermediate: {}", s.intermediate),
            format!("Basic:        {}", s.basic),
            format!("N/A:          {}", s.na),
            String::new(),
            "DETAILED BREAKDOWN (ALL SKILLS)".to_string(),
            SECTION_RULE.to_string(),
        ]
    }

    /// Clipboard form: newline-terminated lines, tab-separated table
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in self.header_lines() {
            text.push_str(&line);
            text.push('\n');
        }
        text.push_str(&COLUMNS.join("\t"));
        text.push('\n');
        for row in &self.rows {
            text.push_str(&row.fields().join("\t"));
            text.push('\n');
        }
        text
    }

    /// CSV form: each header line becomes a single quoted field, followed
    /// by a blank record and the quoted table.
    pub fn to_csv(&self) -> String {
        let mut records: Vec<String> = self
            .header_lines()
            .iter()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    csv_record(&[line.as_str()])
                }
            })
            .collect();
        records.push(String::new());
        records.push(csv_record(&COLUMNS));
        records.extend(self.rows.iter().map(|row| csv_record(&row.fields())));
        records.join("\n")
    }

    /// `capability_matrix_YYYY-MM-DD.csv`
    pub fn csv_file_name(&self) -> String {
        csv_file_name(self.date)
    }
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("capability_matrix_{}.csv", date.format("%Y-%m-%d"))
}

/// Quote every field, doubling embedded quotes
pub fn csv_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Falls back to ISO form if `format` is not a valid chrono pattern
fn format_date(date: NaiveDate, format: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        tracing::warn!(format, "invalid export.date_format, using ISO dates");
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::Rating;
    use crate::store::MemoryStore;

    const CATALOG: &str = r#"
tabs:
  - id: exp
    label: Experience Design
    kind: experience
    groups:
      - name: Framing
        skills:
          - id: s1
            name: Problem framing
          - id: s2
            name: Say "hello"
  - id: hidden
    label: Strategic Design
    kind: experience
    groups:
      - name: Empty
        skills: []
  - id: gen
    label: General Skills
    kind: general
    groups:
      - name: Core
        skills:
          - id: g1
            name: Leadership
            levels:
              basic: b
              intermediate: i
              advanced: a
"#;

    fn fixture() -> (Catalog, AssessmentStore) {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        let mut store = AssessmentStore::load(MemoryStore::new());
        store.set_rating("s1", Rating::Advanced);
        store.set_rating("g1", Rating::Na);
        store.set_rating("stale", Rating::Basic);
        store.toggle_focus("s2");
        (catalog, store)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_rows_cover_full_catalog_in_order() {
        let (catalog, store) = fixture();
        let report = Report::build(&catalog, &store, date(), "%Y-%m-%d");

        let skills: Vec<_> = report.rows.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(skills, vec!["Problem framing", "Say \"hello\"", "Leadership"]);
        assert_eq!(report.rows[0].rating, "Advanced");
        assert_eq!(report.rows[0].focus, "-");
        assert_eq!(report.rows[1].rating, "-");
        assert_eq!(report.rows[1].focus, "YES");
        assert_eq!(report.rows[2].category, "General Skills");
        assert_eq!(report.rows[2].rating, "N/A");
    }

    #[test]
    fn test_text_rendering() {
        let (catalog, store) = fixture();
        let text = Report::build(&catalog, &store, date(), "%d/%m/%Y").to_text();

        assert!(text.starts_with("CAPABILITY MATRIX ASSESSMENT - 15/01/2026\n"));
        assert!(text.contains("\nCompletion:   67%\n"));
        assert!(text.contains("\nFocus Areas:  1\n"));
        assert!(text.contains("\nAdvanced:     1\n"));
        assert!(text.contains("\nN/A:          1\n"));
        assert!(text.contains("\nCategory\tGroup\tSkill\tRating\tFocus Area\n"));
        assert!(text.contains("\nExperience Design\tFraming\tSay \"hello\"\t-\tYES\n"));
        assert!(text.ends_with("General Skills\tCore\tLeadership\tN/A\t-\n"));
    }

    #[test]
    fn test_csv_rendering() {
        let (catalog, store) = fixture();
        let report = Report::build(&catalog, &store, date(), "%Y-%m-%d");
        let csv = report.to_csv();
        let lines: Vec<_> = csv.split('\n').collect();

        assert_eq!(lines[0], "\"CAPABILITY MATRIX ASSESSMENT - 2026-01-15\"");
        assert_eq!(lines[2], "");
        assert_eq!(lines[5], "\"Completion:   67%\"");
        assert_eq!(lines[14], "");
        assert_eq!(lines[15], "\"Category\",\"Group\",\"Skill\",\"Rating\",\"Focus Area\"");
        assert_eq!(
            lines[17],
            "\"Experience Design\",\"Framing\",\"Say \"\"hello\"\"\",\"-\",\"YES\""
        );
        assert_eq!(lines.len(), 19);
        assert!(!csv.ends_with('\n'));
        assert_eq!(report.csv_file_name(), "capability_matrix_2026-01-15.csv");
    }

    #[test]
    fn test_empty_catalog_reports_zero_completion() {
        let catalog = Catalog::from_yaml("tabs:\n  - {id: a, label: A, kind: experience}\n").unwrap();
        let store = AssessmentStore::load(MemoryStore::new());
        let report = Report::build(&catalog, &store, date(), "%Y-%m-%d");
        assert!(report.rows.is_empty());
        assert!(report.to_text().contains("Completion:   0%"));
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        assert_eq!(format_date(date(), "%Q"), "2026-01-15");
    }
}
