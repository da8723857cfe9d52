//! Rendering utilities for alert surfaces (Markdown alerts, GitHub annotations).

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use markdown::{
    render_bucket_alert, render_failure_alert, render_markdown, render_run_summary,
};
pub use model::{
    RenderableBucket, RenderableFailure, RenderableReason, RenderableReport, RenderableSeverity,
    RenderableStatus, RenderableSummary,
};
