//! Stable DTOs and IDs used across the bucketguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted verdicts, records, and audit report
//! - stable string IDs and codes
//! - the resource identifier newtype
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;
pub mod resource;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    Access, AuditRecord, AuditReport, AuditStatus, AuditSummary, BlockedBy, ExposureReason,
    ExposureVerdict, FailureStage, ReasonSource, ResourceFailure, RunMeta, SCHEMA_RECORDS_V1,
    SCHEMA_REPORT_V1, Severity, ToolMeta,
};
pub use resource::ResourceId;
