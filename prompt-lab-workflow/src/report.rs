//! Static HTML report over the analysis summaries

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::WorkflowResult;
use crate::results::read_records;

pub const REPORT_FILE: &str = "report.html";
pub const METHOD_SUMMARY_FILE: &str = "method_summary.csv";

const REPORT_TITLE: &str = "LLM Prompting Experiments – Analysis Report";
const SECTION_PREVIEW_ROWS: usize = 10;
const SUMMARY_PREVIEW_ROWS: usize = 20;

/// Summary CSVs shown in the report, in display order
pub const REPORT_SECTIONS: &[(&str, &str)] = &[
    ("Prompt Variation: Accuracy vs Prompt Length", "prompt_variation_summary.csv"),
    ("Method Disagreement Between Prompting Strategies", "method_disagreement_matrix.csv"),
    ("CoT Overthinking: Baseline vs CoT", "cot_overthinking_summary.csv"),
    ("Few-shot Effect: Baseline vs Few-shot", "fewshot_effect_summary.csv"),
    ("Answer Length vs Correctness", "length_correlation_summary.csv"),
];

/// Escape text for safe inclusion in HTML element content and attributes
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// The leading rows of a CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvPreview {
    pub file_name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvPreview {
    pub fn load(path: &Path, max_rows: usize) -> WorkflowResult<Self> {
        let (header, mut rows) = read_records(path)?;
        rows.truncate(max_rows);
        Ok(Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            header,
            rows,
        })
    }

    fn table_html(&self) -> String {
        if self.rows.is_empty() {
            return "<p><em>No data available.</em></p>".to_string();
        }

        let mut html = String::from("<table>\n<thead><tr>");
        for column in &self.header {
            html.push_str(&format!("<th>{}</th>", html_escape(column)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", html_escape(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }

    fn download_link(&self) -> String {
        format!(
            "<p><a href=\"{}\">Download full CSV</a></p>",
            html_escape(&self.file_name)
        )
    }
}

#[derive(Debug, Clone)]
pub struct HtmlReport {
    pub generated_at: DateTime<Local>,
    pub method_summary: Option<CsvPreview>,
    pub sections: Vec<(String, CsvPreview)>,
}

impl HtmlReport {
    /// Collect every summary present in `analysis_dir`. Missing files are skipped.
    pub fn collect(analysis_dir: &Path, generated_at: DateTime<Local>) -> WorkflowResult<Self> {
        let summary_path = analysis_dir.join(METHOD_SUMMARY_FILE);
        let method_summary = if summary_path.exists() {
            Some(CsvPreview::load(&summary_path, SUMMARY_PREVIEW_ROWS)?)
        } else {
            None
        };

        let mut sections = Vec::new();
        for (title, file_name) in REPORT_SECTIONS {
            let path = analysis_dir.join(file_name);
            if path.exists() {
                sections.push((title.to_string(), CsvPreview::load(&path, SECTION_PREVIEW_ROWS)?));
            }
        }

        Ok(Self {
            generated_at,
            method_summary,
            sections,
        })
    }

    pub fn render(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"utf-8\">\n");
        html.push_str(&format!("  <title>{}</title>\n", REPORT_TITLE));
        html.push_str("  <style>\n");
        html.push_str("    body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f5; color: #222; }\n");
        html.push_str("    header { background: #333; color: #fff; padding: 16px 32px; }\n");
        html.push_str("    header h1 { margin: 0; font-size: 1.6rem; }\n");
        html.push_str("    header p { margin: 4px 0 0 0; font-size: 0.9rem; opacity: 0.8; }\n");
        html.push_str("    main { max-width: 1000px; margin: 24px auto 40px; padding: 0 16px; }\n");
        html.push_str("    .block { background: #fff; border-radius: 8px; padding: 16px 20px 20px; margin-bottom: 20px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }\n");
        html.push_str("    h2 { margin-top: 0; font-size: 1.3rem; border-bottom: 1px solid #eee; padding-bottom: 8px; }\n");
        html.push_str("    table { border-collapse: collapse; width: 100%; margin-top: 8px; font-size: 0.9rem; }\n");
        html.push_str("    th, td { border: 1px solid #ddd; padding: 4px 6px; text-align: left; }\n");
        html.push_str("    th { background: #fafafa; font-weight: 600; }\n");
        html.push_str("    a { color: #0066cc; text-decoration: none; }\n");
        html.push_str("  </style>\n");
        html.push_str("</head>\n<body>\n");
        html.push_str("  <header>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", REPORT_TITLE));
        html.push_str(&format!(
            "    <p>Generated: {}</p>\n",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        html.push_str("  </header>\n  <main>\n");

        if let Some(summary) = &self.method_summary {
            html.push_str("<section class=\"block\">\n<h2>Overall Method Summary</h2>\n");
            html.push_str(&summary.table_html());
            html.push('\n');
            html.push_str(&summary.download_link());
            html.push_str("\n</section>\n");
        }

        if self.sections.is_empty() {
            html.push_str("<p>No analysis files found yet. Run the analysis scripts first.</p>\n");
        }

        for (title, preview) in &self.sections {
            html.push_str("<section class=\"block\">\n");
            html.push_str(&format!("<h2>{}</h2>\n", html_escape(title)));
            html.push_str("<h3>Summary (preview)</h3>\n");
            html.push_str(&preview.table_html());
            html.push('\n');
            html.push_str(&preview.download_link());
            html.push_str("\n</section>\n");
        }

        html.push_str("  </main>\n</body>\n</html>\n");
        html
    }
}

/// Render `report.html` into `analysis_dir` from whatever summaries exist there
pub fn write_report(analysis_dir: &Path) -> WorkflowResult<PathBuf> {
    std::fs::create_dir_all(analysis_dir)?;

    let report = HtmlReport::collect(analysis_dir, Local::now())?;
    let path = analysis_dir.join(REPORT_FILE);
    std::fs::write(&path, report.render())?;

    info!(
        path = %path.display(),
        sections = report.sections.len(),
        "Generated HTML report"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_preview_renders_placeholder() {
        let preview = CsvPreview {
            file_name: "x.csv".to_string(),
            header: vec!["a".to_string()],
            rows: vec![],
        };
        assert_eq!(preview.table_html(), "<p><em>No data available.</em></p>");
    }

    #[test]
    fn test_report_without_sections_shows_placeholder() {
        let report = HtmlReport {
            generated_at: Local::now(),
            method_summary: None,
            sections: vec![],
        };
        let html = report.render();

        assert!(html.contains("No analysis files found yet."));
        assert!(!html.contains("Overall Method Summary"));
    }
}
