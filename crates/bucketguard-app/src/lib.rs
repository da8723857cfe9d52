//! Use case orchestration for bucketguard.
//!
//! This crate provides the application layer: the collaborator ports, the audit use case that
//! coordinates them, and the adapters the CLI wires in (inventory snapshot, Markdown notifiers,
//! JSON record store). Evaluation itself lives in the domain crate.
//!
//! The CLI crate depends on this; it only handles argument parsing, logging setup, and exit codes.

#![forbid(unsafe_code)]

mod audit;
mod evaluate;
mod explain;
mod inventory;
mod notify;
pub mod ports;
mod record;
mod render;
mod report;

pub use audit::{AuditInput, audit_exit_code, audit_status, run_audit};
pub use evaluate::run_evaluate;
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use notify::{FileNotifier, NoopNotifier, WriterNotifier, build_notifier};
pub use ports::{AccessStateFetcher, AuditError, Notifier, Recorder, ResourceLister};
pub use record::{JsonRecordStore, NoopRecorder, RecordFile, build_recorder};
pub use render::{render_annotations, render_markdown};
pub use report::{
    parse_report_json, runtime_error_report, serialize_report, to_renderable, write_report,
    write_text,
};
