//! The `explain` use case: look up check/code documentation.

use bucketguard_types::explain::{self, Explanation};
use bucketguard_types::{Access, BlockedBy, ReasonSource};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available check_ids and codes.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    push_grading(&mut out, exp.source);
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before (exposed):\n");
    out.push_str("```json\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After (fixed):\n");
    out.push_str("```json\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Access-to-severity table and the block public access flags that suppress the source.
fn push_grading(out: &mut String, source: ReasonSource) {
    out.push_str("Grading\n");
    out.push_str("-------\n");
    out.push_str(&format!("Reasons have source `{}`.\n", source.as_str()));
    for access in [Access::Write, Access::Read, Access::Unknown] {
        out.push_str(&format!(
            "  - access `{}` -> severity `{}`\n",
            access.as_str(),
            access.severity().as_str()
        ));
    }
    let (first, second) = match source {
        ReasonSource::Acl => ("BlockPublicAcls", "IgnorePublicAcls"),
        ReasonSource::Policy => ("BlockPublicPolicy", "RestrictPublicBuckets"),
    };
    out.push_str(&format!(
        "With {first} and {second} both enabled the reason moves to `suppressed` \
         with blocked_by `{}`; otherwise blocked_by is `{}`.\n\n",
        BlockedBy::Pab.as_str(),
        BlockedBy::None.as_str()
    ));
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown check_id or code: {identifier}\n\n"));
    out.push_str("Available check_ids:\n");
    for id in check_ids {
        out.push_str(&format!("  - {id}\n"));
    }
    out.push_str("\nAvailable codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_known_check_id_and_code() {
        assert!(matches!(run_explain("exposure.acl"), ExplainOutput::Found(_)));
        assert!(matches!(
            run_explain("policy_conditional_wildcard"),
            ExplainOutput::Found(_)
        ));
    }

    #[test]
    fn explain_unknown_lists_alternatives() {
        match run_explain("exposure.dns") {
            ExplainOutput::NotFound {
                identifier,
                available_check_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "exposure.dns");
                assert!(available_check_ids.contains(&"exposure.policy"));
                assert!(available_codes.contains(&"acl_all_users"));
            }
            ExplainOutput::Found(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let ExplainOutput::Found(exp) = run_explain("exposure.policy") else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.starts_with("Public Bucket Policy Statements\n====="));
        assert!(formatted.contains("Remediation"));
        assert!(formatted.contains("```json"));
    }

    #[test]
    fn format_explanation_grades_by_access_and_names_suppressing_flags() {
        let ExplainOutput::Found(exp) = run_explain("acl_all_users") else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.contains("Reasons have source `acl`."));
        assert!(formatted.contains("  - access `write` -> severity `error`\n"));
        assert!(formatted.contains("  - access `read` -> severity `warning`\n"));
        assert!(formatted.contains("  - access `unknown` -> severity `warning`\n"));
        assert!(formatted.contains("BlockPublicAcls and IgnorePublicAcls"));
        assert!(formatted.contains("blocked_by `pab`"));

        let ExplainOutput::Found(exp) = run_explain("exposure.policy") else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.contains("Reasons have source `policy`."));
        assert!(formatted.contains("BlockPublicPolicy and RestrictPublicBuckets"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["check.one"], &["code.one"]);
        assert!(formatted.contains("Unknown check_id or code: missing"));
        assert!(formatted.contains("  - check.one"));
        assert!(formatted.contains("  - code.one"));
    }
}
