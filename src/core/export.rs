// worklog-report - core/export.rs
//
// Rendering of the aggregated report: HTML table, CSV grid, JSON document.
// Core layer: writes to any Write trait object. No logic beyond layout.

use crate::core::duration::format_duration;
use crate::core::model::Aggregated;
use crate::util::error::ExportError;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Output format for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}' (expected html, csv or json)"
            )),
        }
    }
}

/// Render in the requested format.
pub fn render<W: Write>(
    aggregated: &Aggregated,
    format: ReportFormat,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        ReportFormat::Html => render_html(aggregated, writer),
        ReportFormat::Csv => export_csv(aggregated, writer),
        ReportFormat::Json => export_json(aggregated, writer),
    }
}

const STYLE: &str = "\
      table, th, td {
        font-family: -apple-system;
        border: 1px solid;
        border-spacing: 0;
        padding: 0 0.25rem;
        vertical-align: top;
      }

      table {
        padding: 0;
      }";

/// Render the report as an HTML table.
///
/// Header row: `Task` then one column per user. Per-user cells are blank
/// when the user logged nothing on that task. The final bold row holds
/// each user's total, shown even when zero.
pub fn render_html<W: Write>(aggregated: &Aggregated, mut writer: W) -> Result<(), ExportError> {
    let io = |source| ExportError::Io { source };

    writeln!(writer, "<html>\n  <body>\n    <table>\n      <tbody>").map_err(io)?;

    writeln!(writer, "        <tr>").map_err(io)?;
    writeln!(writer, "          <th style=\"width: 300px\"><b>Task</b></th>").map_err(io)?;
    for user in aggregated.users() {
        writeln!(writer, "          <th><b>{}</b></th>", escape_html(&user.name)).map_err(io)?;
    }
    writeln!(writer, "        </tr>").map_err(io)?;

    for task in &aggregated.tasks {
        writeln!(writer, "        <tr>").map_err(io)?;
        writeln!(writer, "          <td>{}</td>", escape_html(&task.label)).map_err(io)?;
        for cell in &task.per_user {
            if cell.seconds > 0.0 {
                writeln!(writer, "          <td>{}</td>", format_duration(cell.seconds))
                    .map_err(io)?;
            } else {
                writeln!(writer, "          <td></td>").map_err(io)?;
            }
        }
        writeln!(writer, "        </tr>").map_err(io)?;
    }

    writeln!(writer, "        <tr>").map_err(io)?;
    writeln!(writer, "          <td><b>Total</b></td>").map_err(io)?;
    for total in &aggregated.total {
        writeln!(
            writer,
            "          <td><b>{}</b></td>",
            format_duration(total.seconds)
        )
        .map_err(io)?;
    }
    writeln!(writer, "        </tr>").map_err(io)?;

    writeln!(writer, "      </tbody>\n    </table>\n    <style>\n{STYLE}\n    </style>")
        .map_err(io)?;
    writeln!(writer, "  </body>\n</html>").map_err(io)?;
    writer.flush().map_err(io)
}

/// Export the report grid as CSV, in seconds.
///
/// Writes: Task, one column per user, Total. The last row is the per-user
/// total row with the grand total in the Total column.
pub fn export_csv<W: Write>(aggregated: &Aggregated, writer: W) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv { source };
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Task".to_string()];
    header.extend(aggregated.users().map(|u| u.name.clone()));
    header.push("Total".to_string());
    csv_writer.write_record(&header).map_err(csv_err)?;

    for task in &aggregated.tasks {
        let mut record = vec![task.label.clone()];
        record.extend(task.per_user.iter().map(|u| u.seconds.to_string()));
        record.push(task.total_seconds.to_string());
        csv_writer.write_record(&record).map_err(csv_err)?;
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(aggregated.total.iter().map(|t| t.seconds.to_string()));
    totals.push(aggregated.grand_total_seconds().to_string());
    csv_writer.write_record(&totals).map_err(csv_err)?;

    csv_writer
        .flush()
        .map_err(|source| ExportError::Io { source })
}

/// Export the report as a JSON document.
pub fn export_json<W: Write>(aggregated: &Aggregated, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, aggregated).map_err(|source| ExportError::Json { source })
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{TaskSummary, User, UserTime};
    use std::rc::Rc;

    fn sample() -> Aggregated {
        let alice = Rc::new(User::new("a", "Alice"));
        let bob = Rc::new(User::new("b", "Bob <QA>"));
        let time = |user: &Rc<User>, seconds: f64| UserTime {
            user: Rc::clone(user),
            seconds,
        };
        Aggregated {
            tasks: vec![
                TaskSummary {
                    label: "Fix login & logout".to_string(),
                    per_user: vec![time(&alice, 30600.0), time(&bob, 0.0)],
                    total_seconds: 30600.0,
                },
                TaskSummary {
                    label: "Review".to_string(),
                    per_user: vec![time(&alice, 0.0), time(&bob, 1800.0)],
                    total_seconds: 1800.0,
                },
            ],
            total: vec![time(&alice, 30600.0), time(&bob, 0.0)],
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_html_layout() {
        let mut buf = Vec::new();
        render_html(&sample(), &mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();

        assert!(html.contains("<th><b>Alice</b></th>"));
        assert!(html.contains("<th><b>Bob &lt;QA&gt;</b></th>"));
        assert!(html.contains("<td>Fix login &amp; logout</td>"));
        // 30600 s = 8h 30m = 1 workday, 0h, 30m
        assert!(html.contains("<td>1d 0h 30m</td>"));
        assert!(html.contains("<td>0h 30m</td>"));
        assert!(html.contains("<td></td>"));
        // Zero totals are still shown in the total row.
        assert!(html.contains("<td><b>0h 0m</b></td>"));
        assert!(html.contains("<td><b>Total</b></td>"));

        let alice_col = html.find("Alice").unwrap();
        let bob_col = html.find("Bob &lt;QA&gt;").unwrap();
        assert!(alice_col < bob_col);
        let first = html.find("Fix login").unwrap();
        let second = html.find("Review").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        export_csv(&sample(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Task,Alice,Bob <QA>,Total");
        assert_eq!(lines[1], "Fix login & logout,30600,0,30600");
        assert_eq!(lines[2], "Review,0,1800,1800");
        assert_eq!(lines[3], "Total,30600,0,30600");
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        export_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["tasks"][0]["label"], "Fix login & logout");
        assert_eq!(value["tasks"][1]["per_user"][1]["user"]["id"], "b");
        assert_eq!(value["total"][0]["seconds"], 30600.0);
    }
}
