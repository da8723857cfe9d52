#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

impl RenderableSeverity {
    pub(crate) fn label(self) -> &'static str {
        match self {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReason {
    pub severity: RenderableSeverity,
    pub check_id: String,
    pub code: String,
    pub message: String,
    pub conditional: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableBucket {
    pub name: String,
    pub severity: RenderableSeverity,
    pub reasons: Vec<RenderableReason>,
    pub missing_protections: Vec<String>,
    pub evaluated_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFailure {
    pub stage: String,
    pub resource: Option<String>,
    pub cause: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableSummary {
    pub listed: u32,
    pub excluded: u32,
    pub evaluated: u32,
    pub exposed: u32,
    pub fetch_failed: u32,
    pub delivery_failed: u32,
    pub persist_failed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub status: RenderableStatus,
    pub summary: RenderableSummary,
    pub buckets: Vec<RenderableBucket>,
    pub failures: Vec<RenderableFailure>,
}
