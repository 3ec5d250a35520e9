use serde::Serialize;

use crate::MAX_ANNOTATIONS;
use crate::result::model::{AnalysisResult, Violation};

/// Annotation severity as understood by the check-runs API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Failure,
}

impl AnnotationLevel {
    /// Case-insensitive mapping; anything unrecognized degrades to `Notice`.
    pub fn from_severity(severity: &str) -> Self {
        if severity.eq_ignore_ascii_case("error") {
            Self::Failure
        } else if severity.eq_ignore_ascii_case("warning") {
            Self::Warning
        } else {
            Self::Notice
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    pub annotation_level: AnnotationLevel,
    pub message: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_details: Option<String>,
}

impl Annotation {
    fn from_violation(v: &Violation) -> Self {
        let line = v.line_number.max(1);
        let column = v.column_number.max(1);
        Self {
            path: v.file_path.clone(),
            start_line: line,
            end_line: line,
            start_column: Some(column),
            end_column: Some(column),
            annotation_level: AnnotationLevel::from_severity(&v.severity),
            message: format!(
                "{} → {}: {}",
                v.project_name, v.invalid_reference, v.description
            ),
            title: v.rule_name.clone(),
            raw_details: v.suggestion_text().map(str::to_string),
        }
    }
}

/// The `output` object of a check-run request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    pub annotations: Vec<Annotation>,
}

/// Everything needed to create one completed check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRunPayload {
    pub conclusion: Conclusion,
    pub output: CheckRunOutput,
}

/// Build the check-run payload for a result.
///
/// Conclusion is driven by errors alone. Annotations are capped at
/// [`MAX_ANNOTATIONS`]; anything beyond the cap is counted in the summary.
pub fn build_check_run(result: &AnalysisResult) -> CheckRunPayload {
    let summary = &result.summary;
    let total = result.violations.len();

    let conclusion = if summary.error_count > 0 {
        Conclusion::Failure
    } else {
        Conclusion::Success
    };

    let title = match conclusion {
        Conclusion::Failure => format!(
            "{} error(s), {} warning(s)",
            summary.error_count, summary.warning_count
        ),
        Conclusion::Success if summary.warning_count > 0 => {
            format!("Passed with {} warning(s)", summary.warning_count)
        }
        Conclusion::Success => "Architecture check passed".to_string(),
    };

    let mut text = format!(
        "**Modules:** {}\n**Projects:** {}\n**Errors:** {}\n**Warnings:** {}\n\nFound {} violation(s).",
        summary.total_modules,
        summary.total_projects,
        summary.error_count,
        summary.warning_count,
        total
    );
    if total > MAX_ANNOTATIONS {
        text.push_str(&format!(
            "\n\nShowing the first {MAX_ANNOTATIONS} annotations; {} more violation(s) omitted.",
            total - MAX_ANNOTATIONS
        ));
    }

    let annotations = result
        .violations
        .iter()
        .take(MAX_ANNOTATIONS)
        .map(Annotation::from_violation)
        .collect();

    CheckRunPayload {
        conclusion,
        output: CheckRunOutput {
            title,
            summary: text,
            annotations,
        },
    }
}
