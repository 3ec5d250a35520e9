use crate::result::model::{AnalysisResult, Violation};

/// Hidden first line of every comment this action posts.
///
/// Comment reconciliation matches on this substring alone, so it must never
/// appear in human-written text.
pub const COMMENT_MARKER: &str = "<!-- guardrun:modularguard-report:7f3c2a -->";

pub const BADGE_PASSED: &str = "✅ **Analysis Passed**";
pub const BADGE_WARNINGS: &str = "⚠️ **Analysis Passed with Warnings**";
pub const BADGE_FAILED: &str = "❌ **Analysis Failed**";

/// Longest description rendered in a table cell, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Render the pull-request comment body for an analysis result.
///
/// Section order is fixed: marker, heading, status badge, summary counters,
/// violations table (only when there are violations), suggestions (only when
/// at least one violation carries one), and an optional run link.
pub fn render_comment(result: &AnalysisResult, run_url: Option<&str>) -> String {
    let summary = &result.summary;
    let mut out = String::new();

    out.push_str(COMMENT_MARKER);
    out.push('\n');
    out.push_str("## 🛡️ ModularGuard Architecture Report\n\n");
    out.push_str(status_badge(summary.error_count, summary.warning_count));
    out.push_str("\n\n");

    out.push_str("### Summary\n\n");
    out.push_str(&format!("- **Modules:** {}\n", summary.total_modules));
    out.push_str(&format!("- **Projects:** {}\n", summary.total_projects));
    out.push_str(&format!("- **Errors:** {}\n", summary.error_count));
    out.push_str(&format!("- **Warnings:** {}\n", summary.warning_count));

    if !result.violations.is_empty() {
        out.push_str("\n### Violations\n\n");
        out.push_str("| Severity | Location | Project | Invalid Reference | Description |\n");
        out.push_str("|---|---|---|---|---|\n");
        for v in &result.violations {
            out.push_str(&render_violation_row(v));
        }
    }

    let with_suggestions: Vec<(&Violation, &str)> = result
        .violations
        .iter()
        .filter_map(|v| v.suggestion_text().map(|s| (v, s)))
        .collect();
    if !with_suggestions.is_empty() {
        out.push_str("\n### 💡 Suggestions\n\n");
        for (v, suggestion) in with_suggestions {
            out.push_str(&format!(
                "- **{}** → `{}`: {}\n",
                v.project_name, v.invalid_reference, suggestion
            ));
        }
    }

    if let Some(url) = run_url.filter(|u| !u.is_empty()) {
        out.push_str(&format!("\n---\n[View workflow run]({url})\n"));
    }

    out
}

/// Picks the single status line; errors win over warnings.
pub fn status_badge(error_count: u64, warning_count: u64) -> &'static str {
    if error_count > 0 {
        BADGE_FAILED
    } else if warning_count > 0 {
        BADGE_WARNINGS
    } else {
        BADGE_PASSED
    }
}

pub fn severity_icon(severity: &str) -> &'static str {
    if severity.eq_ignore_ascii_case("error") {
        "❌"
    } else if severity.eq_ignore_ascii_case("warning") {
        "⚠️"
    } else {
        "ℹ️"
    }
}

fn render_violation_row(v: &Violation) -> String {
    format!(
        "| {icon} {sev} | `{path}:{line}` | {project} | {reference} | {desc} |\n",
        icon = severity_icon(&v.severity),
        sev = escape_cell(&v.severity),
        path = v.file_path.replace('`', "'"),
        line = v.line_number,
        project = escape_cell(&v.project_name),
        reference = escape_cell(&v.invalid_reference),
        desc = escape_cell(&truncate_description(&v.description)),
    )
}

/// Collapses line breaks to spaces and caps the length at
/// [`MAX_DESCRIPTION_CHARS`], ellipsis included.
pub fn truncate_description(description: &str) -> String {
    let single_line: String = description
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if single_line.chars().count() <= MAX_DESCRIPTION_CHARS {
        return single_line;
    }

    let keep = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();
    let mut truncated: String = single_line.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(ELLIPSIS);
    truncated
}

// Escaping runs after truncation so an escape sequence is never cut in half.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}
