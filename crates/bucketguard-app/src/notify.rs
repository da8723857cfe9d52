//! Notifier adapters: Markdown alerts to stdout or an outbox file.

use crate::ports::{AuditError, Notifier};
use crate::report::renderable_bucket;
use anyhow::Context;
use bucketguard_render::{
    RenderableSummary, render_bucket_alert, render_failure_alert, render_run_summary,
};
use bucketguard_settings::NotificationTarget;
use bucketguard_types::{AuditSummary, ExposureVerdict, FailureStage};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Build the notifier for a configured target.
pub fn build_notifier(target: &NotificationTarget) -> Box<dyn Notifier> {
    match target {
        NotificationTarget::Stdout => Box::new(WriterNotifier::new(std::io::stdout())),
        NotificationTarget::File(path) => Box::new(FileNotifier::new(path.clone())),
        NotificationTarget::None => Box::new(NoopNotifier),
    }
}

/// Discards every alert.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send(&mut self, _verdict: &ExposureVerdict) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Writes each alert as Markdown to any writer.
pub struct WriterNotifier<W: Write> {
    out: W,
}

impl<W: Write> WriterNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for WriterNotifier<W> {
    fn send(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError> {
        let body = render_bucket_alert(&renderable_bucket(verdict));
        write_message(&mut self.out, &body).map_err(|err| AuditError::DeliveryFailed {
            resource_id: Some(verdict.resource_id.clone()),
            cause: format!("{err:#}"),
        })
    }

    fn send_summary(&mut self, summary: &AuditSummary) -> Result<(), AuditError> {
        let body = render_run_summary(&renderable_summary(summary));
        write_message(&mut self.out, &body).map_err(|err| AuditError::DeliveryFailed {
            resource_id: None,
            cause: format!("{err:#}"),
        })
    }

    fn send_failure(&mut self, stage: FailureStage, cause: &str) -> Result<(), AuditError> {
        let body = render_failure_alert(stage.as_str(), cause);
        write_message(&mut self.out, &body).map_err(|err| AuditError::DeliveryFailed {
            resource_id: None,
            cause: format!("{err:#}"),
        })
    }
}

/// Appends each alert to an outbox file, creating it (and its parent) on first use.
pub struct FileNotifier {
    path: Utf8PathBuf,
}

impl FileNotifier {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    fn append(&self, body: &str) -> anyhow::Result<()> {
        let mut file = open_append(&self.path)?;
        write_message(&mut file, body)
    }
}

impl Notifier for FileNotifier {
    fn send(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError> {
        let body = render_bucket_alert(&renderable_bucket(verdict));
        self.append(&body).map_err(|err| AuditError::DeliveryFailed {
            resource_id: Some(verdict.resource_id.clone()),
            cause: format!("{err:#}"),
        })
    }

    fn send_summary(&mut self, summary: &AuditSummary) -> Result<(), AuditError> {
        let body = render_run_summary(&renderable_summary(summary));
        self.append(&body).map_err(|err| AuditError::DeliveryFailed {
            resource_id: None,
            cause: format!("{err:#}"),
        })
    }

    fn send_failure(&mut self, stage: FailureStage, cause: &str) -> Result<(), AuditError> {
        let body = render_failure_alert(stage.as_str(), cause);
        self.append(&body).map_err(|err| AuditError::DeliveryFailed {
            resource_id: None,
            cause: format!("{err:#}"),
        })
    }
}

fn open_append(path: &Utf8Path) -> anyhow::Result<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {path}"))
}

fn write_message(out: &mut dyn Write, body: &str) -> anyhow::Result<()> {
    out.write_all(body.as_bytes()).context("write alert")?;
    out.write_all(b"\n").context("write alert")?;
    out.flush().context("flush alert")
}

pub(crate) fn renderable_summary(summary: &AuditSummary) -> RenderableSummary {
    RenderableSummary {
        listed: summary.resources_listed,
        excluded: summary.resources_excluded,
        evaluated: summary.resources_evaluated,
        exposed: summary.resources_exposed,
        fetch_failed: summary.fetch_failed,
        delivery_failed: summary.delivery_failed,
        persist_failed: summary.persist_failed,
    }
}
