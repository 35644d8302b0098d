use std::fmt::Write;

use chrono::Utc;
use comfy_table::Cell;

use crate::report::JobReport;

use super::styling::{bright, bright_red, dim};
use super::tables::{
    color_coded_build_count_cell, color_coded_duration_cell, create_cyan_header, create_table,
};

/// Prints a human-readable summary of the duration report to stdout.
///
/// Displays an overview section and a color-coded table with one row per
/// sampled build:
/// - Green: the job yielded the requested number of successes, or a short
///   duration
/// - Yellow: fewer successes than requested, or a middling duration
/// - Red: no successful builds at all, or a long duration
///
/// Jobs without successful builds keep their row so gaps stay visible in
/// the fleet-wide view.
pub fn print_summary(project: &str, requested: usize, reports: &[JobReport]) {
    println!("{}", render_summary(project, requested, reports));
}

fn render_summary(project: &str, requested: usize, reports: &[JobReport]) -> String {
    let mut output = String::new();

    let total_samples: usize = reports.iter().map(|report| report.data.len()).sum();

    add_section_header(&mut output, "📊", "Overview");
    let _ = writeln!(output, "  Project: {}", bright(project));
    let _ = writeln!(output, "  Jobs: {}", bright(reports.len()));
    let _ = writeln!(output, "  Duration samples: {}", bright(total_samples));
    let _ = writeln!(
        output,
        "  {}",
        dim(format!(
            "Collected at {}",
            Utc::now().format("%Y-%m-%d %H:%M UTC")
        ))
    );
    let _ = writeln!(output);

    add_section_header(&mut output, "⏱️", "Recent Successful Build Durations");
    let mut table = create_table();
    table.set_header(create_cyan_header(&["Job", "Successes", "Build", "Duration"]));

    for report in reports {
        let successes = report.build_urls.len();

        if report.data.is_empty() {
            table.add_row(vec![
                Cell::new(&report.name),
                color_coded_build_count_cell(successes, requested),
                Cell::new("—"),
                Cell::new("—"),
            ]);
            continue;
        }

        for (idx, sample) in report.data.iter().enumerate() {
            let (name_cell, count_cell) = if idx == 0 {
                (
                    Cell::new(&report.name),
                    color_coded_build_count_cell(successes, requested),
                )
            } else {
                (Cell::new(""), Cell::new(""))
            };
            table.add_row(vec![
                name_cell,
                count_cell,
                Cell::new(format!("#{}", sample.number)),
                color_coded_duration_cell(sample.duration),
            ]);
        }
    }

    let _ = writeln!(output, "{table}");

    let missing: Vec<&str> = reports
        .iter()
        .filter(|report| report.build_urls.is_empty())
        .map(|report| report.name.as_str())
        .collect();
    if !missing.is_empty() {
        let _ = writeln!(
            output,
            "\n{} {}",
            bright_red("⚠"),
            bright_red(format!(
                "{} job(s) without successful builds: {}",
                missing.len(),
                missing.join(", ")
            ))
        );
    }

    output
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}
