use crate::TOOL_NAME;
use crate::result::model::{AnalysisResult, Violation};

pub fn render_text(result: &AnalysisResult) -> String {
    let s = &result.summary;
    let mut out = String::new();
    out.push_str(&format!("{TOOL_NAME} analysis\n"));
    out.push_str(&format!("Modules: {}\n", s.total_modules));
    out.push_str(&format!("Projects: {}\n", s.total_projects));
    out.push_str(&format!("Errors: {}\n", s.error_count));
    out.push_str(&format!("Warnings: {}\n", s.warning_count));
    if result.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }
    out.push_str("Violations:\n");
    for v in &result.violations {
        out.push_str(&format!(
            "  - [{}] {}:{} {} -> {} ({})\n",
            v.severity, v.file_path, v.line_number, v.project_name, v.invalid_reference, v.rule_name
        ));
    }
    out
}

/// One GitHub workflow command per violation, so findings surface inline
/// even when no pull request exists.
pub fn render_workflow_commands(result: &AnalysisResult) -> String {
    result
        .violations
        .iter()
        .map(|v| workflow_command(v) + "\n")
        .collect()
}

fn workflow_command(v: &Violation) -> String {
    let command = if v.is_error() {
        "error"
    } else if v.is_warning() {
        "warning"
    } else {
        "notice"
    };
    format!(
        "::{command} file={},line={},col={},title={}::{}",
        escape_property(&v.file_path),
        v.line_number,
        v.column_number,
        escape_property(&v.rule_name),
        escape_data(&format!(
            "{} -> {}: {}",
            v.project_name, v.invalid_reference, v.description
        ))
    )
}

/// Escape a workflow command message.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
