use anyhow::Result;
use chrono::Utc;
use std::io::Write;

use crate::config::OutputFormat;
use crate::report::JobReport;

/// Exports a duration report to various formats.
///
/// Supports multiple output formats for different use cases:
/// - CSV: Spreadsheet analysis and reporting
/// - HTML: Self-contained reports with formatting
/// - JSON: Programmatic access
/// - Summary: Human-readable terminal output (already supported)
pub fn export_report(
    reports: &[JobReport],
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            // Summary format is handled separately in cli.rs
            unreachable!("Summary format should be handled in CLI")
        }
        OutputFormat::Json => export_json(reports, pretty, output),
        OutputFormat::Csv => export_csv(reports, output),
        OutputFormat::Html => export_html(reports, output),
    }
}

fn export_json(reports: &[JobReport], pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(reports)?
    } else {
        serde_json::to_string(reports)?
    };
    writeln!(output, "{}", json)?;
    Ok(())
}

fn export_csv(reports: &[JobReport], output: &mut dyn Write) -> Result<()> {
    writeln!(output, "Job,Build,Duration Seconds")?;

    for report in reports {
        if report.data.is_empty() {
            // Keep empty jobs visible in spreadsheet output
            writeln!(output, "\"{}\",,", report.name)?;
            continue;
        }

        for sample in &report.data {
            writeln!(
                output,
                "\"{}\",{},{:.1}",
                report.name, sample.number, sample.duration
            )?;
        }
    }

    Ok(())
}

fn export_html(reports: &[JobReport], output: &mut dyn Write) -> Result<()> {
    let generated_at = Utc::now();
    let total_samples: usize = reports.iter().map(|report| report.data.len()).sum();

    writeln!(output, "<!DOCTYPE html>")?;
    writeln!(output, "<html lang=\"en\">")?;
    writeln!(output, "<head>")?;
    writeln!(output, "    <meta charset=\"UTF-8\">")?;
    writeln!(output, "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(output, "    <title>JenLens Report</title>")?;
    writeln!(output, "    <style>")?;
    writeln!(output, "        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; background: #f5f5f5; }}")?;
    writeln!(output, "        .container {{ max-width: 900px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}")?;
    writeln!(output, "        h1 {{ color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }}")?;
    writeln!(output, "        h2 {{ color: #34495e; margin-top: 30px; }}")?;
    writeln!(output, "        .summary {{ background: #ecf0f1; padding: 20px; border-radius: 5px; margin: 20px 0; }}")?;
    writeln!(output, "        table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}")?;
    writeln!(output, "        th, td {{ padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }}")?;
    writeln!(output, "        th {{ background: #3498db; color: white; }}")?;
    writeln!(output, "        tr:nth-child(even) {{ background: #f8f9fa; }}")?;
    writeln!(output, "        .good {{ color: #27ae60; }}")?;
    writeln!(output, "        .warning {{ color: #f39c12; }}")?;
    writeln!(output, "        .bad {{ color: #e74c3c; }}")?;
    writeln!(output, "    </style>")?;
    writeln!(output, "</head>")?;
    writeln!(output, "<body>")?;
    writeln!(output, "    <div class=\"container\">")?;
    writeln!(output, "        <h1>⏱️ JenLens Build Duration Report</h1>")?;
    writeln!(output, "        <div class=\"summary\">")?;
    writeln!(output, "            <h2>Summary</h2>")?;
    writeln!(output, "            <p><strong>Jobs:</strong> {}</p>", reports.len())?;
    writeln!(output, "            <p><strong>Duration Samples:</strong> {}</p>", total_samples)?;
    writeln!(output, "            <p><strong>Collected:</strong> {}</p>", generated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(output, "        </div>")?;

    writeln!(output, "        <h2>Recent Successful Builds</h2>")?;
    writeln!(output, "        <table>")?;
    writeln!(output, "            <thead>")?;
    writeln!(output, "                <tr>")?;
    writeln!(output, "                    <th>Job</th>")?;
    writeln!(output, "                    <th>Build</th>")?;
    writeln!(output, "                    <th>Duration</th>")?;
    writeln!(output, "                </tr>")?;
    writeln!(output, "            </thead>")?;
    writeln!(output, "            <tbody>")?;

    for report in reports {
        if report.data.is_empty() {
            writeln!(output, "                <tr>")?;
            writeln!(output, "                    <td>{}</td>", report.name)?;
            writeln!(output, "                    <td>—</td>")?;
            writeln!(output, "                    <td class=\"bad\">no successful builds</td>")?;
            writeln!(output, "                </tr>")?;
            continue;
        }

        for sample in &report.data {
            let minutes = sample.duration / 60.0;
            let duration_class = if minutes <= 10.0 {
                "good"
            } else if minutes <= 15.0 {
                "warning"
            } else {
                "bad"
            };
            writeln!(output, "                <tr>")?;
            writeln!(output, "                    <td>{}</td>", report.name)?;
            writeln!(output, "                    <td>#{}</td>", sample.number)?;
            writeln!(output, "                    <td class=\"{}\">{:.1}s</td>", duration_class, sample.duration)?;
            writeln!(output, "                </tr>")?;
        }
    }
    writeln!(output, "            </tbody>")?;
    writeln!(output, "        </table>")?;

    writeln!(output, "        <footer style=\"margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; text-align: center;\">")?;
    writeln!(output, "            <p>Report generated by JenLens v{} on {}</p>", env!("CARGO_PKG_VERSION"), generated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(output, "        </footer>")?;
    writeln!(output, "    </div>")?;
    writeln!(output, "</body>")?;
    writeln!(output, "</html>")?;

    Ok(())
}
