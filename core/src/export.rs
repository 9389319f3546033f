//! CSV and plain-text renderings of a result snapshot.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use csv::Writer;
use tracing::info;

use crate::model::results::ResultSnapshot;

pub const CSV_HEADER: [&str; 5] = ["Subject", "Credits", "Grade", "Grade Points", "Total Points"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }
}

pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("marku_results_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

pub fn to_csv(snapshot: &ResultSnapshot) -> Result<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for subject in &snapshot.subjects {
        wtr.write_record([
            subject.name.clone(),
            subject.credits.to_string(),
            format!("{} ({})", subject.grade_letter, subject.grade),
            subject.grade.to_string(),
            subject.grade_points.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| anyhow!("could not finish CSV: {}", e))?;
    let mut out = String::from_utf8(bytes)?;

    out.push_str("\nSummary\n");
    writeln!(out, "SGPA,{:.2}", snapshot.sgpa)?;
    writeln!(out, "CGPA,{:.2}", snapshot.cgpa)?;
    writeln!(out, "Percentage,{:.2}%", snapshot.percentage)?;
    Ok(out)
}

pub fn to_text(snapshot: &ResultSnapshot, generated_on: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str("MARKU - Grade Calculator Results\n");
    out.push_str("=====================================\n\n");
    out.push_str(&format!("SGPA: {:.2}\n", snapshot.sgpa));
    out.push_str(&format!("CGPA: {:.2}\n", snapshot.cgpa));
    out.push_str(&format!("Percentage: {:.2}%\n", snapshot.percentage));
    out.push_str(&format!(
        "Total Credits: {} | Total Grade Points: {}\n",
        snapshot.total_credits, snapshot.total_grade_points
    ));
    out.push_str(&format!("Performance: {}\n\n", snapshot.performance()));
    out.push_str("Subject Details:\n");
    out.push_str("----------------\n");

    for (index, subject) in snapshot.subjects.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, subject.name));
        out.push_str(&format!(
            "   Credits: {} | Grade: {} ({})\n\n",
            subject.credits, subject.grade_letter, subject.grade
        ));
    }

    out.push_str(&format!(
        "Generated on: {}\n",
        generated_on.format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

/// Renders `snapshot` and writes it into `dir`, returning the file path.
pub fn write_export(snapshot: &ResultSnapshot, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let content = match format {
        ExportFormat::Csv => to_csv(snapshot)?,
        ExportFormat::Text => to_text(snapshot, now),
    };

    fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    let path = dir.join(export_file_name(format, now.date_naive()));
    fs::write(&path, content).with_context(|| format!("could not write {}", path.display()))?;

    info!(path = %path.display(), ?format, "results exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::subject::Subject;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn snapshot() -> ResultSnapshot {
        ResultSnapshot::capture(&[Subject::new("Math", 4, 8), Subject::new("Physics", 3, 7)])
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&snapshot()).unwrap();
        let expected = "Subject,Credits,Grade,Grade Points,Total Points\n\
                        Math,4,B+ (8),8,32\n\
                        Physics,3,B (7),7,21\n\
                        \n\
                        Summary\n\
                        SGPA,7.57\n\
                        CGPA,7.57\n\
                        Percentage,75.71%\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_csv_quotes_names_with_commas() {
        let snapshot = ResultSnapshot::capture(&[Subject::new("Signals, Systems", 2, 9)]);
        let csv = to_csv(&snapshot).unwrap();
        assert!(csv.contains("\"Signals, Systems\",2,A (9),9,18\n"));
    }

    #[test]
    fn test_text_report() {
        let when = Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let text = to_text(&snapshot(), when);

        assert!(text.starts_with("MARKU - Grade Calculator Results\n"));
        assert!(text.contains("SGPA: 7.57\n"));
        assert!(text.contains("Percentage: 75.71%\n"));
        assert!(text.contains("Total Credits: 7 | Total Grade Points: 53\n"));
        assert!(text.contains("1. Math\n   Credits: 4 | Grade: B+ (8)\n"));
        assert!(text.contains("2. Physics\n   Credits: 3 | Grade: B (7)\n"));
        assert!(text.ends_with("Generated on: 2026-10-18 09:30:00\n"));
    }

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(export_file_name(ExportFormat::Csv, date), "marku_results_2026-10-18.csv");
        assert_eq!(export_file_name(ExportFormat::Text, date), "marku_results_2026-10-18.txt");
    }

    #[test]
    fn test_write_export() {
        let dir = TempDir::new().unwrap();
        let path = write_export(&snapshot(), ExportFormat::Csv, dir.path()).unwrap();

        assert_eq!(path.parent().unwrap(), dir.path());
        assert_eq!(path.extension().unwrap(), "csv");
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("Subject,Credits"));
    }
}
