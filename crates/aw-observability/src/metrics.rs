//! Compliance metrics collection for Asset Warden.
//!
//! Publishes sweep outcomes through the metrics crate and keeps a small
//! rolling aggregate for KPI reporting.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use aw_core::SweepReport;

/// Aggregated compliance indicators across recorded sweeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceKpis {
    /// Total sweeps recorded.
    pub total_sweeps: u64,
    /// Total remediation drafts emitted.
    pub total_drafts: u64,
    /// Breached records in the most recent sweep.
    pub current_breaches: usize,
    /// At-risk records in the most recent sweep.
    pub current_at_risk: usize,
    /// Subjects with unusable timestamps in the most recent sweep.
    pub current_unknown_timestamps: usize,
    /// Breached records by deadline kind, most recent sweep.
    pub breaches_by_kind: HashMap<String, u64>,
    /// When the most recent sweep was recorded.
    pub last_sweep_at: Option<DateTime<Utc>>,
}

/// Records sweep reports and exposes them as metrics.
pub struct SweepMetricsCollector {
    kpis: Arc<RwLock<ComplianceKpis>>,
}

impl SweepMetricsCollector {
    /// Creates a new collector and registers metric descriptions.
    pub fn new() -> Self {
        Self::register_metrics();
        Self {
            kpis: Arc::new(RwLock::new(ComplianceKpis::default())),
        }
    }

    fn register_metrics() {
        describe_counter!("aw_sweeps_total", "Total number of deadline sweeps run");
        describe_counter!(
            "aw_drafts_emitted_total",
            "Total number of remediation ticket drafts emitted"
        );
        describe_gauge!(
            "aw_deadline_breaches",
            "Breached deadline records in the latest sweep"
        );
        describe_gauge!(
            "aw_deadline_at_risk",
            "At-risk deadline records in the latest sweep"
        );
        describe_gauge!(
            "aw_unknown_timestamps",
            "Subjects with unusable timestamps in the latest sweep"
        );
    }

    /// Records one sweep report.
    pub async fn record_sweep(&self, report: &SweepReport, at: DateTime<Utc>) {
        let breached = report.breached_count();
        let at_risk = report.at_risk().count();

        counter!("aw_sweeps_total").increment(1);
        counter!("aw_drafts_emitted_total").increment(report.drafts.len() as u64);
        gauge!("aw_deadline_breaches").set(breached as f64);
        gauge!("aw_deadline_at_risk").set(at_risk as f64);
        gauge!("aw_unknown_timestamps").set(report.diagnostics.unknown_timestamps as f64);

        let mut by_kind: HashMap<String, u64> = HashMap::new();
        for record in report.breached() {
            *by_kind.entry(record.kind.to_string()).or_default() += 1;
        }

        let mut kpis = self.kpis.write().await;
        kpis.total_sweeps += 1;
        kpis.total_drafts += report.drafts.len() as u64;
        kpis.current_breaches = breached;
        kpis.current_at_risk = at_risk;
        kpis.current_unknown_timestamps = report.diagnostics.unknown_timestamps;
        kpis.breaches_by_kind = by_kind;
        kpis.last_sweep_at = Some(at);
    }

    /// Returns a copy of the current KPIs.
    pub async fn kpis(&self) -> ComplianceKpis {
        self.kpis.read().await.clone()
    }
}

impl Default for SweepMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::{ClockReading, DeadlineKind, DeadlineRecord, DeadlineState};
    use uuid::Uuid;

    fn report_with_breach() -> SweepReport {
        let mut report = SweepReport::default();
        report.records.push(DeadlineRecord {
            subject_id: Uuid::new_v4(),
            kind: DeadlineKind::CertificateExpiry,
            state: DeadlineState::Breached,
            clock: ClockReading::Days(-2),
        });
        report.diagnostics.subjects_evaluated = 1;
        report
    }

    #[tokio::test]
    async fn test_record_sweep_updates_kpis() {
        let collector = SweepMetricsCollector::new();
        let now = Utc::now();

        collector.record_sweep(&report_with_breach(), now).await;

        let kpis = collector.kpis().await;
        assert_eq!(kpis.total_sweeps, 1);
        assert_eq!(kpis.current_breaches, 1);
        assert_eq!(kpis.last_sweep_at, Some(now));
        assert_eq!(
            kpis.breaches_by_kind.get("Certificate Expiry").copied(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_sweeps_accumulate() {
        let collector = SweepMetricsCollector::new();
        let now = Utc::now();

        collector.record_sweep(&report_with_breach(), now).await;
        collector.record_sweep(&SweepReport::default(), now).await;

        let kpis = collector.kpis().await;
        assert_eq!(kpis.total_sweeps, 2);
        assert_eq!(kpis.current_breaches, 0);
    }
}
