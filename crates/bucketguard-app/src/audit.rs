//! The `audit` use case: list, fetch, evaluate, alert, record, and summarise.

use crate::ports::{AccessStateFetcher, AuditError, Notifier, Recorder, ResourceLister};
use bucketguard_settings::{EffectiveConfig, FailOn};
use bucketguard_types::{
    AuditReport, AuditStatus, AuditSummary, ExposureVerdict, FailureStage, ResourceFailure,
    ResourceId, RunMeta, SCHEMA_REPORT_V1, Severity, ToolMeta,
};
use rayon::prelude::*;
use time::OffsetDateTime;

/// Input for the audit use case.
pub struct AuditInput<'a> {
    pub lister: &'a dyn ResourceLister,
    pub fetcher: &'a dyn AccessStateFetcher,
    pub notifier: &'a mut dyn Notifier,
    pub recorder: &'a mut dyn Recorder,
    pub config: &'a EffectiveConfig,
}

/// Run one audit pass.
///
/// Only a listing failure ends the run early; the notifier is told before the error
/// is returned. Every other collaborator failure is logged, counted in the summary,
/// and the run continues with the next resource.
pub fn run_audit(input: AuditInput<'_>) -> Result<AuditReport, AuditError> {
    let AuditInput {
        lister,
        fetcher,
        notifier,
        recorder,
        config,
    } = input;

    let started_at = OffsetDateTime::now_utc();
    tracing::info!(profile = %config.profile, "audit started");

    let listed: Vec<ResourceId> = match lister.list() {
        Ok(ids) => ids.collect(),
        Err(err) => {
            tracing::error!(error = %err, "audit aborted");
            if let Err(alert_err) = notifier.send_failure(FailureStage::List, err.cause()) {
                tracing::warn!(error = %alert_err, "failure alert not delivered");
            }
            return Err(err);
        }
    };

    let mut summary = AuditSummary {
        profile: config.profile.clone(),
        resources_listed: count(listed.len()),
        ..AuditSummary::default()
    };

    let (excluded, to_audit): (Vec<_>, Vec<_>) = listed
        .into_iter()
        .partition(|id| config.is_excluded(id.as_str()));
    for id in &excluded {
        tracing::debug!(bucket = %id, "excluded by config");
    }
    summary.resources_excluded = count(excluded.len());

    // Fetch completes before evaluate for each resource; results keep listing order.
    let outcomes: Vec<(ResourceId, Result<ExposureVerdict, AuditError>)> = to_audit
        .into_par_iter()
        .map(|id| {
            let outcome = fetcher
                .fetch(&id)
                .map(|state| bucketguard_domain::evaluate(&state));
            (id, outcome)
        })
        .collect();

    let mut exposed = Vec::new();
    for (id, outcome) in outcomes {
        let verdict = match outcome {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(bucket = %id, error = %err, "skipping bucket");
                summary.fetch_failed += 1;
                record_failure(&mut summary, Some(id), FailureStage::Fetch, &err);
                continue;
            }
        };

        summary.resources_evaluated += 1;
        if !verdict.is_exposed {
            tracing::debug!(bucket = %id, "not exposed");
            continue;
        }

        summary.resources_exposed += 1;
        tracing::info!(
            bucket = %id,
            reasons = verdict.reasons.len(),
            severity = ?verdict.severity,
            "bucket exposed"
        );

        if let Err(err) = notifier.send(&verdict) {
            tracing::warn!(bucket = %id, error = %err, "alert not delivered");
            summary.delivery_failed += 1;
            record_failure(&mut summary, Some(id.clone()), FailureStage::Deliver, &err);
        }
        if let Err(err) = recorder.save(&verdict) {
            tracing::warn!(bucket = %id, error = %err, "record not persisted");
            summary.persist_failed += 1;
            record_failure(&mut summary, Some(id.clone()), FailureStage::Persist, &err);
        }

        exposed.push(verdict);
    }

    summary.status = audit_status(config.fail_on, &exposed);

    if let Err(err) = notifier.send_summary(&summary) {
        tracing::warn!(error = %err, "run summary not delivered");
        summary.delivery_failed += 1;
        record_failure(&mut summary, None, FailureStage::Deliver, &err);
    }

    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;

    tracing::info!(
        listed = summary.resources_listed,
        evaluated = summary.resources_evaluated,
        exposed = summary.resources_exposed,
        skipped = summary.resources_skipped(),
        status = ?summary.status,
        duration_ms,
        "audit finished"
    );

    Ok(AuditReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at,
            ended_at: Some(ended_at),
            duration_ms: Some(duration_ms),
        },
        summary,
        exposed,
    })
}

/// Pass/fail for a run given the profile's threshold.
pub fn audit_status(fail_on: FailOn, exposed: &[ExposureVerdict]) -> AuditStatus {
    let threshold = match fail_on {
        FailOn::Error => Severity::Error,
        FailOn::Warning => Severity::Warning,
        FailOn::Never => return AuditStatus::Pass,
    };
    let reached = exposed
        .iter()
        .filter_map(|v| v.severity)
        .any(|severity| severity >= threshold);
    if reached {
        AuditStatus::Fail
    } else {
        AuditStatus::Pass
    }
}

/// Map the summary status to a process exit code.
///
/// `0` pass, `2` the fail_on threshold was reached. Runtime errors (`1`) are the caller's.
pub fn audit_exit_code(summary: &AuditSummary) -> i32 {
    match summary.status {
        AuditStatus::Pass => 0,
        AuditStatus::Fail => 2,
    }
}

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "bucketguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn record_failure(
    summary: &mut AuditSummary,
    resource_id: Option<ResourceId>,
    stage: FailureStage,
    err: &AuditError,
) {
    summary.failures.push(ResourceFailure {
        resource_id,
        stage,
        cause: err.cause().to_string(),
    });
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketguard_domain::model::{
        AccessState, AclGrant, AclPermission, BlockPublicAccessConfig, GranteeType,
    };
    use bucketguard_settings::{BucketguardConfigV1, Overrides, resolve_config};
    use std::collections::BTreeMap;

    struct FakeLister {
        names: Vec<&'static str>,
        fail: bool,
    }

    impl ResourceLister for FakeLister {
        fn list(&self) -> Result<Box<dyn Iterator<Item = ResourceId> + Send + '_>, AuditError> {
            if self.fail {
                return Err(AuditError::ListingFailed {
                    cause: "access denied".to_string(),
                });
            }
            Ok(Box::new(self.names.iter().map(|n| ResourceId::new(n))))
        }
    }

    /// Missing names fail to fetch.
    struct FakeFetcher {
        states: BTreeMap<&'static str, AccessState>,
    }

    impl AccessStateFetcher for FakeFetcher {
        fn fetch(&self, resource_id: &ResourceId) -> Result<AccessState, AuditError> {
            self.states
                .get(resource_id.as_str())
                .cloned()
                .ok_or_else(|| AuditError::FetchFailed {
                    resource_id: resource_id.clone(),
                    cause: "throttled".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        sent: Vec<String>,
        summaries: Vec<AuditSummary>,
        failures: Vec<(FailureStage, String)>,
        fail_for: Option<&'static str>,
    }

    impl Notifier for FakeNotifier {
        fn send(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError> {
            if self.fail_for == Some(verdict.resource_id.as_str()) {
                return Err(AuditError::DeliveryFailed {
                    resource_id: Some(verdict.resource_id.clone()),
                    cause: "topic missing".to_string(),
                });
            }
            self.sent.push(verdict.resource_id.to_string());
            Ok(())
        }

        fn send_summary(&mut self, summary: &AuditSummary) -> Result<(), AuditError> {
            self.summaries.push(summary.clone());
            Ok(())
        }

        fn send_failure(&mut self, stage: FailureStage, cause: &str) -> Result<(), AuditError> {
            self.failures.push((stage, cause.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeRecorder {
        saved: Vec<String>,
        fail_all: bool,
    }

    impl Recorder for FakeRecorder {
        fn save(&mut self, verdict: &ExposureVerdict) -> Result<(), AuditError> {
            if self.fail_all {
                return Err(AuditError::PersistFailed {
                    resource_id: verdict.resource_id.clone(),
                    cause: "table missing".to_string(),
                });
            }
            self.saved.push(verdict.resource_id.to_string());
            Ok(())
        }
    }

    fn public_read(name: &str) -> AccessState {
        let mut s = AccessState::new(ResourceId::new(name));
        s.acl_grants.push(AclGrant {
            grantee: GranteeType::AllUsers,
            permission: AclPermission::Read,
        });
        s
    }

    fn public_write(name: &str) -> AccessState {
        let mut s = AccessState::new(ResourceId::new(name));
        s.acl_grants.push(AclGrant {
            grantee: GranteeType::AuthenticatedUsers,
            permission: AclPermission::Write,
        });
        s
    }

    fn locked(name: &str) -> AccessState {
        let mut s = public_write(name);
        s.block_public_access = Some(BlockPublicAccessConfig::block_all());
        s
    }

    fn config(toml: &str) -> EffectiveConfig {
        let cfg: BucketguardConfigV1 = bucketguard_settings::parse_config_toml(toml).expect("parse");
        resolve_config(cfg, Overrides::default())
            .expect("resolve")
            .effective
    }

    fn fetcher() -> FakeFetcher {
        FakeFetcher {
            states: BTreeMap::from([
                ("reads", public_read("reads")),
                ("writes", public_write("writes")),
                ("locked", locked("locked")),
                ("logs-1", public_write("logs-1")),
            ]),
        }
    }

    #[test]
    fn exposed_buckets_are_notified_and_recorded_in_listing_order() {
        let lister = FakeLister {
            names: vec!["writes", "locked", "reads"],
            fail: false,
        };
        let fetcher = fetcher();
        let mut notifier = FakeNotifier::default();
        let mut recorder = FakeRecorder::default();
        let cfg = config("");

        let report = run_audit(AuditInput {
            lister: &lister,
            fetcher: &fetcher,
            notifier: &mut notifier,
            recorder: &mut recorder,
            config: &cfg,
        })
        .expect("audit");

        assert_eq!(notifier.sent, vec!["writes", "reads"]);
        assert_eq!(recorder.saved, vec!["writes", "reads"]);
        assert_eq!(report.summary.resources_listed, 3);
        assert_eq!(report.summary.resources_evaluated, 3);
        assert_eq!(report.summary.resources_exposed, 2);
        assert_eq!(report.summary.status, AuditStatus::Fail);
        assert_eq!(report.schema, SCHEMA_REPORT_V1);
        assert_eq!(
            report
                .exposed
                .iter()
                .map(|v| v.resource_id.as_str())
                .collect::<Vec<_>>(),
            vec!["writes", "reads"]
        );
        assert_eq!(notifier.summaries.len(), 1);
        assert_eq!(notifier.summaries[0].resources_exposed, 2);
    }

    #[test]
    fn fetch_failure_is_isolated() {
        let lister = FakeLister {
            names: vec!["reads", "vanished", "writes"],
            fail: false,
        };
        let fetcher = fetcher();
        let mut notifier = FakeNotifier::default();
        let mut recorder = FakeRecorder::default();
        let cfg = config("");

        let report = run_audit(AuditInput {
            lister: &lister,
            fetcher: &fetcher,
            notifier: &mut notifier,
            recorder: &mut recorder,
            config: &cfg,
        })
        .expect("audit");

        assert_eq!(report.summary.fetch_failed, 1);
        assert_eq!(report.summary.resources_evaluated, 2);
        assert_eq!(report.summary.failures.len(), 1);
        let failure = &report.summary.failures[0];
        assert_eq!(failure.stage, FailureStage::Fetch);
        assert_eq!(
            failure.resource_id.as_ref().map(|r| r.as_str()),
            Some("vanished")
        );
        assert_eq!(failure.cause, "throttled");
        assert_eq!(notifier.sent, vec!["reads", "writes"]);
    }

    #[test]
    fn delivery_and_persist_failures_do_not_block_each_other() {
        let lister = FakeLister {
            names: vec!["reads", "writes"],
            fail: false,
        };
        let fetcher = fetcher();
        let mut notifier = FakeNotifier {
            fail_for: Some("reads"),
            ..FakeNotifier::default()
        };
        let mut recorder = FakeRecorder {
            fail_all: true,
            ..FakeRecorder::default()
        };
        let cfg = config("");

        let report = run_audit(AuditInput {
            lister: &lister,
            fetcher: &fetcher,
            notifier: &mut notifier,
            recorder: &mut recorder,
            config: &cfg,
        })
        .expect("audit");

        assert_eq!(notifier.sent, vec!["writes"]);
        assert_eq!(report.summary.delivery_failed, 1);
        assert_eq!(report.summary.persist_failed, 2);
        assert_eq!(report.exposed.len(), 2);
        let stages: Vec<FailureStage> =
            report.summary.failures.iter().map(|f| f.stage).collect();
        assert_eq!(
            stages,
            vec![
                FailureStage::Deliver,
                FailureStage::Persist,
                FailureStage::Persist
            ]
        );
    }

    #[test]
    fn listing_failure_alerts_and_aborts_without_findings() {
        let lister = FakeLister {
            names: vec!["writes"],
            fail: true,
        };
        let fetcher = fetcher();
        let mut notifier = FakeNotifier::default();
        let mut recorder = FakeRecorder::default();
        let cfg = config("");

        let err = run_audit(AuditInput {
            lister: &lister,
            fetcher: &fetcher,
            notifier: &mut notifier,
            recorder: &mut recorder,
            config: &cfg,
        })
        .expect_err("listing must fail");

        assert!(matches!(err, AuditError::ListingFailed { .. }));
        assert_eq!(
            notifier.failures,
            vec![(FailureStage::List, "access denied".to_string())]
        );
        assert!(notifier.sent.is_empty());
        assert!(notifier.summaries.is_empty());
        assert!(recorder.saved.is_empty());
    }

    #[test]
    fn excluded_buckets_are_never_fetched() {
        let lister = FakeLister {
            names: vec!["logs-1", "logs-unknown", "reads"],
            fail: false,
        };
        let fetcher = fetcher();
        let mut notifier = FakeNotifier::default();
        let mut recorder = FakeRecorder::default();
        let cfg = config("exclude = [\"logs-*\"]");

        let report = run_audit(AuditInput {
            lister: &lister,
            fetcher: &fetcher,
            notifier: &mut notifier,
            recorder: &mut recorder,
            config: &cfg,
        })
        .expect("audit");

        assert_eq!(report.summary.resources_listed, 3);
        assert_eq!(report.summary.resources_excluded, 2);
        assert_eq!(report.summary.fetch_failed, 0);
        assert_eq!(report.summary.resources_evaluated, 1);
        assert_eq!(notifier.sent, vec!["reads"]);
    }

    #[test]
    fn status_follows_fail_on() {
        let lister = FakeLister {
            names: vec!["reads"],
            fail: false,
        };
        let fetcher = fetcher();

        for (toml, expected) in [
            ("", AuditStatus::Pass),
            ("profile = \"strict\"", AuditStatus::Fail),
            ("fail_on = \"never\"", AuditStatus::Pass),
        ] {
            let mut notifier = FakeNotifier::default();
            let mut recorder = FakeRecorder::default();
            let cfg = config(toml);
            let report = run_audit(AuditInput {
                lister: &lister,
                fetcher: &fetcher,
                notifier: &mut notifier,
                recorder: &mut recorder,
                config: &cfg,
            })
            .expect("audit");
            assert_eq!(report.summary.status, expected, "config: {toml:?}");
            assert_eq!(audit_exit_code(&report.summary), match expected {
                AuditStatus::Pass => 0,
                AuditStatus::Fail => 2,
            });
        }
    }

    #[test]
    fn empty_listing_passes_and_still_sends_summary() {
        let lister = FakeLister {
            names: Vec::new(),
            fail: false,
        };
        let fetcher = fetcher();
        let mut notifier = FakeNotifier::default();
        let mut recorder = FakeRecorder::default();
        let cfg = config("profile = \"strict\"");

        let report = run_audit(AuditInput {
            lister: &lister,
            fetcher: &fetcher,
            notifier: &mut notifier,
            recorder: &mut recorder,
            config: &cfg,
        })
        .expect("audit");

        assert_eq!(report.summary.status, AuditStatus::Pass);
        assert!(report.exposed.is_empty());
        assert_eq!(notifier.summaries.len(), 1);
    }
}
