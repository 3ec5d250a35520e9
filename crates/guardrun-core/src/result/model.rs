use serde::{Deserialize, Serialize};

/// Complete result emitted by one `modularguard check --format json` run.
///
/// This mirrors the tool's JSON contract. Unknown fields are rejected at
/// every level so an incompatible tool version fails loudly instead of being
/// half-understood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub modules: Vec<Module>,
    pub violations: Vec<Violation>,
}

impl AnalysisResult {
    /// Returns a copy whose violation paths have been passed through `rewrite`.
    pub fn with_rewritten_paths(&self, rewrite: impl Fn(&str) -> String) -> Self {
        Self {
            summary: self.summary.clone(),
            modules: self.modules.clone(),
            violations: self
                .violations
                .iter()
                .map(|v| Violation {
                    file_path: rewrite(&v.file_path),
                    ..v.clone()
                })
                .collect(),
        }
    }
}

/// Aggregate counters as reported upstream.
///
/// `is_valid` is taken at face value; nothing here re-derives it from
/// `error_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Summary {
    pub total_modules: u64,
    pub total_projects: u64,
    pub error_count: u64,
    pub warning_count: u64,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Module {
    pub module_name: String,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub file_path: String,
    pub references: Vec<String>,
}

/// One architectural rule breach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Violation {
    /// Usually `Error` or `Warning`; other values are passed through untouched.
    /// A missing severity reads as empty and is reported at notice level.
    #[serde(default)]
    pub severity: String,
    pub project_name: String,
    pub invalid_reference: String,
    pub rule_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    pub file_path: String,
    pub line_number: u32,
    pub column_number: u32,
}

impl Violation {
    pub fn is_error(&self) -> bool {
        self.severity.eq_ignore_ascii_case("error")
    }

    pub fn is_warning(&self) -> bool {
        self.severity.eq_ignore_ascii_case("warning")
    }

    /// The suggestion text, if present and not blank.
    pub fn suggestion_text(&self) -> Option<&str> {
        self.suggestion
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
