// worklog-report - app/report.rs
//
// One report run: read export -> extract -> aggregate -> render -> write.
// Stages run strictly in sequence; each fully materialises before the next.
// Nothing is written unless every stage succeeds.

use crate::core::aggregate::aggregate;
use crate::core::export::{render, ReportFormat};
use crate::core::extract::{extract_with_stats, ExtractConfig};
use crate::core::model::Aggregated;
use crate::platform::config::ReportConfig;
use crate::platform::fs;
use crate::util::error::{ReportError, Result};
use std::io::Write;
use std::path::PathBuf;

/// What to report on and where to put it.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// CSV export to read.
    pub input: PathBuf,
    pub format: ReportFormat,
    /// Output file; `None` writes to stdout.
    pub output: Option<PathBuf>,
}

/// Extract and aggregate already-decoded rows.
pub fn build_report(rows: &[Vec<String>], config: &ExtractConfig) -> Result<Aggregated> {
    let (tasks, _) = extract_with_stats(rows, config)?;
    Ok(aggregate(&tasks))
}

/// Render a report into memory.
pub fn render_to_vec(aggregated: &Aggregated, format: ReportFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    render(aggregated, format, &mut buf)?;
    Ok(buf)
}

/// Run the whole pipeline for one request.
pub fn run(request: &ReportRequest, config: &ReportConfig) -> Result<Aggregated> {
    tracing::info!(
        input = %request.input.display(),
        config = %config.source.display(),
        format = %request.format,
        "Report run starting"
    );

    let rows = fs::read_rows(&request.input)?;
    let aggregated = build_report(&rows, &config.extract)?;
    let rendered = render_to_vec(&aggregated, request.format)?;

    match &request.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| ReportError::Io {
                path: path.clone(),
                operation: "write report",
                source,
            })?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&rendered)
                .and_then(|()| stdout.flush())
                .map_err(|source| ReportError::Io {
                    path: PathBuf::from("<stdout>"),
                    operation: "write report",
                    source,
                })?;
        }
    }

    Ok(aggregated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::InputLayout;
    use crate::core::model::User;
    use crate::util::error::ErrorKind;
    use std::rc::Rc;

    fn config() -> ExtractConfig {
        ExtractConfig {
            users: vec![Rc::new(User::new("u1", "Alice"))],
            date_floor: None,
            layout: InputLayout::default(),
        }
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_build_report() {
        let data = rows(&[
            &["Summary", "Log Work"],
            &["T1", "c;2024-01-02;u1;60"],
            &["T2", ""],
        ]);
        let report = build_report(&data, &config()).unwrap();
        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.total[0].seconds, 3600.0);
    }

    #[test]
    fn test_build_report_error_kinds() {
        let data = rows(&[&["Summary", "Log Work"], &["T1", "c;2024-01-02;nobody;60"]]);
        let err = build_report(&data, &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let data = rows(&[&["Summary", "Log Work"], &["T1", "c;2024-01-02;u1;lots"]]);
        let err = build_report(&data, &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }

    #[test]
    fn test_render_to_vec_html() {
        let data = rows(&[&["Summary", "Log Work"], &["T1", "c;2024-01-02;u1;60"]]);
        let report = build_report(&data, &config()).unwrap();
        let html = String::from_utf8(render_to_vec(&report, ReportFormat::Html).unwrap()).unwrap();
        assert!(html.contains("<td>1h 0m</td>"));
    }
}
