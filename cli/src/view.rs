use marku_core::{Aggregate, ResultSnapshot, Subject};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Subject")]
    name: String,
    #[tabled(rename = "Credits")]
    credits: u32,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Grade Points")]
    points: u32,
}

fn subject_table(subjects: &[Subject]) -> String {
    let rows: Vec<SubjectRow> = subjects
        .iter()
        .enumerate()
        .map(|(i, s)| SubjectRow {
            index: i + 1,
            id: s.short_id(),
            name: s.name.clone(),
            credits: s.credits,
            grade: format!("{} ({})", s.grade_letter, s.grade),
            points: s.grade_points,
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn show_subjects(subjects: &[Subject], summary: &Aggregate) {
    if subjects.is_empty() {
        println!("No subjects added yet.");
        return;
    }

    println!("{}", subject_table(subjects));
    let rounded = summary.rounded();
    println!(
        "SGPA: {:.2}  CGPA: {:.2}  Percentage: {:.2}%  ({} credits)",
        rounded.sgpa, rounded.cgpa, rounded.percentage, rounded.total_credits
    );
}

pub fn show_results(snapshot: &ResultSnapshot) {
    println!("\n\x1b[1;36mResults\x1b[0m ({})", snapshot.generated_at.format("%Y-%m-%d %H:%M"));
    println!("  SGPA:       \x1b[1m{:.2}\x1b[0m", snapshot.sgpa);
    println!("  CGPA:       \x1b[1m{:.2}\x1b[0m", snapshot.cgpa);
    println!("  Percentage: \x1b[1m{:.2}%\x1b[0m", snapshot.percentage);
    println!(
        "  Total Credits: {}  Total Grade Points: {}",
        snapshot.total_credits, snapshot.total_grade_points
    );
    println!("  {}\n", snapshot.performance());
    println!("{}", subject_table(&snapshot.subjects));
}

pub fn show_no_data() {
    println!("No Data Available");
    println!("No subjects have been added yet. Add some with `marku add <name> credits:N grade:N`.");
}
