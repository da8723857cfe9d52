use crate::{RenderableReport, RenderableSeverity};

/// Render exposure reasons as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} title=bucketguard {bucket}::[{check_id}:{code}] {message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for bucket in &report.buckets {
        for r in &bucket.reasons {
            let level = match r.severity {
                RenderableSeverity::Error => "error",
                RenderableSeverity::Warning => "warning",
                RenderableSeverity::Info => "notice",
            };

            let title = escape_property(&format!("bucketguard {}", bucket.name));
            let message = escape_data(&format!("[{}:{}] {}", r.check_id, r.code, r.message));
            out.push(format!("::{level} title={title}::{message}"));
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
