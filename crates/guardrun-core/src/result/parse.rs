use serde_json::Value;

use crate::error::ActionError;
use crate::result::model::AnalysisResult;

const REQUIRED_SECTIONS: [&str; 3] = ["summary", "modules", "violations"];

/// Validate and parse the analysis binary's stdout.
///
/// This is the only gate between the external tool and the renderers, so
/// every rejection carries both raw streams for diagnosis:
///
/// - empty or whitespace-only stdout
/// - stdout that is not a single JSON document
/// - a JSON document that is not an object or lacks a required section
/// - any field that does not match the typed schema
pub fn parse_output(stdout: &str, stderr: &str) -> Result<AnalysisResult, ActionError> {
    let fail = |reason: String| ActionError::Output {
        reason,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    };

    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(fail("analysis produced no output".into()));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| fail(format!("analysis output is not valid JSON: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(fail("analysis output is not a JSON object".into()));
    };

    let missing: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|key| object.get(*key).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(fail(format!(
            "analysis output is incomplete, missing: {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| fail(format!("analysis output does not match the expected schema: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    const VALID: &str = r#"{
        "summary": {"totalModules": 3, "totalProjects": 15, "errorCount": 0, "warningCount": 0, "isValid": true},
        "modules": [],
        "violations": []
    }"#;

    fn reason(err: ActionError) -> String {
        match err {
            ActionError::Output { reason, .. } => reason,
            other => panic!("expected output error, got {other:?}"),
        }
    }

    #[test]
    fn parses_valid_document() {
        let result = parse_output(VALID, "").unwrap();
        assert_eq!(result.summary.total_modules, 3);
        assert!(result.summary.is_valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let padded = format!("\n\n{VALID}\n");
        assert!(parse_output(&padded, "").is_ok());
    }

    #[test]
    fn empty_stdout_is_rejected() {
        let err = parse_output("   \n", "boom").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Output);
        assert!(reason(err).contains("no output"));
    }

    #[test]
    fn invalid_json_is_rejected_with_streams() {
        let err = parse_output("Unhandled exception", "stack trace").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not valid JSON"));
        assert!(msg.contains("Unhandled exception"));
        assert!(msg.contains("stack trace"));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = parse_output("[1, 2, 3]", "").unwrap_err();
        assert!(reason(err).contains("not a JSON object"));
    }

    #[test]
    fn missing_sections_are_named() {
        let err = parse_output(r#"{"modules": []}"#, "").unwrap_err();
        let reason = reason(err);
        assert!(reason.contains("summary"));
        assert!(reason.contains("violations"));
        assert!(!reason.contains("modules,"));
    }

    #[test]
    fn null_section_counts_as_missing() {
        let doc = r#"{"summary": null, "modules": [], "violations": []}"#;
        assert!(reason(parse_output(doc, "").unwrap_err()).contains("summary"));
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let doc = VALID.replacen('{', r#"{"extra": 1,"#, 1);
        assert!(reason(parse_output(&doc, "").unwrap_err()).contains("schema"));
    }

    #[test]
    fn violation_missing_required_field_is_rejected() {
        let doc = r#"{
            "summary": {"totalModules": 0, "totalProjects": 0, "errorCount": 1, "warningCount": 0, "isValid": false},
            "modules": [],
            "violations": [{"severity": "Error", "projectName": "A"}]
        }"#;
        assert!(reason(parse_output(doc, "").unwrap_err()).contains("schema"));
    }

    fn with_violation(violation: &str) -> String {
        format!(
            r#"{{
            "summary": {{"totalModules": 1, "totalProjects": 2, "errorCount": 0, "warningCount": 0, "isValid": true}},
            "modules": [],
            "violations": [{violation}]
        }}"#
        )
    }

    const VIOLATION_FIELDS: &str = r#""projectName": "App.Web",
        "invalidReference": "App.Data",
        "ruleName": "layering",
        "description": "d",
        "filePath": "src/App.Web.csproj",
        "lineNumber": 3,
        "columnNumber": 1"#;

    #[test]
    fn violation_without_severity_parses_as_empty() {
        let doc = with_violation(&format!("{{{VIOLATION_FIELDS}}}"));
        let result = parse_output(&doc, "").unwrap();
        assert_eq!(result.violations[0].severity, "");
        assert!(!result.violations[0].is_error());
        assert!(!result.violations[0].is_warning());
    }

    #[test]
    fn unknown_violation_field_is_rejected() {
        let doc = with_violation(&format!(
            r#"{{"severity": "Error", "confidence": 0.9, {VIOLATION_FIELDS}}}"#
        ));
        let reason = reason(parse_output(&doc, "").unwrap_err());
        assert!(reason.contains("schema"));
        assert!(reason.contains("confidence"));
    }

    #[test]
    fn unknown_project_field_is_rejected() {
        let doc = VALID.replace(
            r#""modules": []"#,
            r#""modules": [{"moduleName": "Core", "projects": [{"name": "Core", "type": "Lib", "filePath": "c.csproj", "references": [], "sdk": "net8"}]}]"#,
        );
        assert!(reason(parse_output(&doc, "").unwrap_err()).contains("sdk"));
    }
}
