//! Regulatory deadline scheduler.
//!
//! Computes deadline states for security-incident tickets (NIS2 24h early
//! warning and 72h notification clocks), supplier certificate expiry,
//! policy review dates, and outstanding mandatory-policy acceptances.
//!
//! The sweep is a pure function of a snapshot and a `now` timestamp:
//! re-running it with the same inputs yields the same states and emits no
//! additional ticket drafts. One malformed record never aborts a sweep;
//! the subject is classified `Unknown` and counted in the diagnostics.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DeadlineConfig;
use crate::index::AssetIndex;
use crate::models::{Policy, Severity, Ticket, TicketCategory, TicketDraft};
use crate::snapshot::Snapshot;

/// Deadline state of a tracked subject.
///
/// `OnTime -> AtRisk -> Breached` is monotonic for a fixed base timestamp.
/// `Resolved` is reachable from any state once the underlying condition
/// clears and is terminal until a new base timestamp restarts the clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineState {
    /// Within the window.
    OnTime,
    /// Inside the configured pre-breach margin.
    AtRisk,
    /// Past the threshold.
    Breached,
    /// Underlying condition cleared (ticket closed, policy accepted).
    Resolved,
    /// Base timestamp missing or unparseable; excluded from alert totals.
    Unknown,
}

impl std::fmt::Display for DeadlineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadlineState::OnTime => write!(f, "On Time"),
            DeadlineState::AtRisk => write!(f, "At Risk"),
            DeadlineState::Breached => write!(f, "Breached"),
            DeadlineState::Resolved => write!(f, "Resolved"),
            DeadlineState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Which regulatory clock a record belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    /// NIS2 24-hour early warning for security incidents.
    IncidentEarlyWarning,
    /// NIS2 72-hour incident notification.
    IncidentNotification,
    /// Supplier ISO certificate expiry.
    CertificateExpiry,
    /// Scheduled policy review date.
    PolicyReview,
    /// Outstanding mandatory-policy acceptances after a revision.
    PolicyAcceptance,
}

impl std::fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadlineKind::IncidentEarlyWarning => write!(f, "Incident Early Warning (24h)"),
            DeadlineKind::IncidentNotification => write!(f, "Incident Notification (72h)"),
            DeadlineKind::CertificateExpiry => write!(f, "Certificate Expiry"),
            DeadlineKind::PolicyReview => write!(f, "Policy Review"),
            DeadlineKind::PolicyAcceptance => write!(f, "Policy Acceptance"),
        }
    }
}

/// Remaining time on a clock. Negative values mean overdue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "unit", content = "value")]
pub enum ClockReading {
    /// Hours remaining until the threshold.
    Hours(i64),
    /// Days remaining until the threshold.
    Days(i64),
    /// No reading; base timestamp was missing.
    Unknown,
}

impl std::fmt::Display for ClockReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockReading::Hours(h) if *h < 0 => write!(f, "{}h overdue", -h),
            ClockReading::Hours(h) => write!(f, "{}h remaining", h),
            ClockReading::Days(d) if *d < 0 => write!(f, "{}d overdue", -d),
            ClockReading::Days(d) => write!(f, "{}d remaining", d),
            ClockReading::Unknown => write!(f, "—"),
        }
    }
}

/// One subject/clock evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeadlineRecord {
    /// The tracked subject (ticket, supplier, or policy id).
    pub subject_id: Uuid,
    /// Which clock this record belongs to.
    pub kind: DeadlineKind,
    /// The computed state.
    pub state: DeadlineState,
    /// Remaining time on the clock.
    pub clock: ClockReading,
}

/// Counters for a single sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepDiagnostics {
    /// Subjects evaluated, including resolved and unknown ones.
    pub subjects_evaluated: usize,
    /// Subjects excluded because their base timestamp was unusable.
    pub unknown_timestamps: usize,
}

/// Result of one deadline sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// All evaluated records.
    pub records: Vec<DeadlineRecord>,
    /// Remediation ticket drafts for the caller to persist.
    pub drafts: Vec<TicketDraft>,
    /// Sweep counters.
    pub diagnostics: SweepDiagnostics,
}

impl SweepReport {
    /// Records currently breached.
    pub fn breached(&self) -> impl Iterator<Item = &DeadlineRecord> {
        self.records
            .iter()
            .filter(|r| r.state == DeadlineState::Breached)
    }

    /// Records currently at risk.
    pub fn at_risk(&self) -> impl Iterator<Item = &DeadlineRecord> {
        self.records
            .iter()
            .filter(|r| r.state == DeadlineState::AtRisk)
    }

    /// Number of breached records.
    pub fn breached_count(&self) -> usize {
        self.breached().count()
    }
}

/// Periodic deadline sweep over a snapshot.
pub struct DeadlineScheduler {
    config: DeadlineConfig,
}

impl DeadlineScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: DeadlineConfig) -> Self {
        Self { config }
    }

    /// Whether the ticket falls under the security-incident clocks.
    pub fn is_security_relevant(&self, ticket: &Ticket) -> bool {
        ticket.is_security_incident || self.config.security_categories.contains(&ticket.category)
    }

    /// Runs a full sweep at the given instant.
    pub fn sweep(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> SweepReport {
        let index = AssetIndex::build(snapshot);
        let mut report = SweepReport::default();

        for ticket in snapshot.tickets.iter().filter(|t| self.is_security_relevant(t)) {
            self.evaluate_incident_clocks(ticket, now, &mut report);
        }

        for supplier in snapshot.suppliers.iter().filter(|s| s.is_active) {
            report.diagnostics.subjects_evaluated += 1;
            match supplier.iso_certificate_expiry {
                Some(expiry) => {
                    let (state, days) = self.expiry_state(expiry, now);
                    report.records.push(DeadlineRecord {
                        subject_id: supplier.id,
                        kind: DeadlineKind::CertificateExpiry,
                        state,
                        clock: ClockReading::Days(days),
                    });
                }
                None => {
                    report.diagnostics.unknown_timestamps += 1;
                    report.records.push(DeadlineRecord {
                        subject_id: supplier.id,
                        kind: DeadlineKind::CertificateExpiry,
                        state: DeadlineState::Unknown,
                        clock: ClockReading::Unknown,
                    });
                }
            }
        }

        for policy in &snapshot.policies {
            if let Some(review_due) = policy.review_due {
                report.diagnostics.subjects_evaluated += 1;
                let (state, days) = self.expiry_state(review_due, now);
                report.records.push(DeadlineRecord {
                    subject_id: policy.id,
                    kind: DeadlineKind::PolicyReview,
                    state,
                    clock: ClockReading::Days(days),
                });
            }

            if policy.is_mandatory {
                report.diagnostics.subjects_evaluated += 1;
                let record = self.evaluate_acceptances(policy, snapshot, now);
                report.records.push(record);
            }
        }

        self.emit_drafts(snapshot, &index, &mut report);

        debug!(
            records = report.records.len(),
            breached = report.breached_count(),
            drafts = report.drafts.len(),
            unknown = report.diagnostics.unknown_timestamps,
            "deadline sweep complete"
        );
        report
    }

    /// Evaluates the 24h and 72h clocks for one security-relevant ticket.
    fn evaluate_incident_clocks(
        &self,
        ticket: &Ticket,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) {
        report.diagnostics.subjects_evaluated += 1;
        let clocks = [
            (DeadlineKind::IncidentEarlyWarning, self.config.early_warning_hours),
            (DeadlineKind::IncidentNotification, self.config.notification_hours),
        ];

        if ticket.status.is_terminal() {
            for (kind, threshold) in clocks {
                let clock = match ticket.created_at {
                    Some(created) => ClockReading::Hours(threshold - elapsed_hours(created, now)),
                    None => ClockReading::Unknown,
                };
                report.records.push(DeadlineRecord {
                    subject_id: ticket.id,
                    kind,
                    state: DeadlineState::Resolved,
                    clock,
                });
            }
            return;
        }

        let Some(created) = ticket.created_at else {
            report.diagnostics.unknown_timestamps += 1;
            for (kind, _) in clocks {
                report.records.push(DeadlineRecord {
                    subject_id: ticket.id,
                    kind,
                    state: DeadlineState::Unknown,
                    clock: ClockReading::Unknown,
                });
            }
            return;
        };

        let elapsed = elapsed_hours(created, now);
        for (kind, threshold) in clocks {
            report.records.push(DeadlineRecord {
                subject_id: ticket.id,
                kind,
                state: self.incident_state(elapsed, threshold),
                clock: ClockReading::Hours(threshold - elapsed),
            });
        }
    }

    /// State of an incident clock given elapsed whole hours.
    fn incident_state(&self, elapsed: i64, threshold: i64) -> DeadlineState {
        let margin = self.config.at_risk_margin_hours;
        if elapsed >= threshold {
            DeadlineState::Breached
        } else if margin > 0 && elapsed >= threshold - margin {
            DeadlineState::AtRisk
        } else {
            DeadlineState::OnTime
        }
    }

    /// State of a single-threshold expiry window, plus days remaining.
    fn expiry_state(&self, expiry: DateTime<Utc>, now: DateTime<Utc>) -> (DeadlineState, i64) {
        let days = (expiry - now).num_days();
        let state = if expiry < now {
            DeadlineState::Breached
        } else if expiry <= now + Duration::days(self.config.expiry_warning_days) {
            DeadlineState::AtRisk
        } else {
            DeadlineState::OnTime
        };
        (state, days)
    }

    /// Evaluates outstanding acceptances for a mandatory policy. The grace
    /// window for re-acceptance after a revision reuses the expiry warning
    /// window.
    fn evaluate_acceptances(
        &self,
        policy: &Policy,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
    ) -> DeadlineRecord {
        let outstanding = snapshot
            .collaborators
            .iter()
            .filter(|c| c.is_active)
            .filter(|c| {
                !snapshot
                    .policy_acceptances
                    .iter()
                    .any(|a| a.collaborator_id == c.id && a.covers(policy))
            })
            .count();

        let deadline = policy.updated_at + Duration::days(self.config.expiry_warning_days);
        let (state, days) = if outstanding == 0 {
            (DeadlineState::Resolved, (deadline - now).num_days())
        } else {
            self.expiry_state(deadline, now)
        };

        DeadlineRecord {
            subject_id: policy.id,
            kind: DeadlineKind::PolicyAcceptance,
            state,
            clock: ClockReading::Days(days),
        }
    }

    /// Emits ticket drafts for breached subjects with no open remediation
    /// ticket. Emission is idempotent: an open ticket linking the subject,
    /// or an earlier draft in the same sweep, suppresses it.
    fn emit_drafts(&self, snapshot: &Snapshot, index: &AssetIndex<'_>, report: &mut SweepReport) {
        if !self.config.auto_ticket {
            return;
        }

        let open_links: HashSet<Uuid> = snapshot
            .tickets
            .iter()
            .filter(|t| !t.status.is_terminal())
            .filter_map(|t| t.linked_entity_id)
            .collect();
        let mut drafted: HashSet<Uuid> = HashSet::new();

        let breached: Vec<DeadlineRecord> = report.breached().cloned().collect();
        for record in breached {
            if open_links.contains(&record.subject_id) || !drafted.insert(record.subject_id) {
                continue;
            }
            let draft = self.draft_for(&record, index);
            info!(subject_id = %record.subject_id, kind = %record.kind, "emitting remediation ticket draft");
            report.drafts.push(draft);
        }
    }

    /// Builds the remediation payload for a breached record.
    fn draft_for(&self, record: &DeadlineRecord, index: &AssetIndex<'_>) -> TicketDraft {
        let subject_name = |fallback: &str| -> String {
            match record.kind {
                DeadlineKind::CertificateExpiry => index
                    .supplier(&record.subject_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| fallback.to_string()),
                DeadlineKind::PolicyReview | DeadlineKind::PolicyAcceptance => index
                    .policy(&record.subject_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| fallback.to_string()),
                _ => index
                    .ticket(&record.subject_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_else(|| fallback.to_string()),
            }
        };
        let name = subject_name(&record.subject_id.to_string());

        let (title, description, severity) = match record.kind {
            DeadlineKind::IncidentEarlyWarning => (
                format!("NIS2 early warning overdue: {}", name),
                format!(
                    "The 24-hour early warning for security incident '{}' was not submitted in time ({}).",
                    name, record.clock
                ),
                Severity::High,
            ),
            DeadlineKind::IncidentNotification => (
                format!("NIS2 incident notification overdue: {}", name),
                format!(
                    "The 72-hour incident notification for security incident '{}' was not submitted in time ({}).",
                    name, record.clock
                ),
                Severity::Critical,
            ),
            DeadlineKind::CertificateExpiry => (
                format!("Supplier certificate expired: {}", name),
                format!(
                    "The ISO certificate for supplier '{}' has expired ({}). Request a renewed certificate.",
                    name, record.clock
                ),
                Severity::High,
            ),
            DeadlineKind::PolicyReview => (
                format!("Policy review overdue: {}", name),
                format!(
                    "The scheduled review of policy '{}' is overdue ({}).",
                    name, record.clock
                ),
                Severity::Medium,
            ),
            DeadlineKind::PolicyAcceptance => (
                format!("Outstanding policy acceptances: {}", name),
                format!(
                    "Mandatory policy '{}' has collaborators who have not accepted the current version ({}).",
                    name, record.clock
                ),
                Severity::Medium,
            ),
        };

        TicketDraft {
            title,
            description,
            category: TicketCategory::Compliance,
            linked_entity_id: record.subject_id,
            severity,
        }
    }
}

/// Whole hours elapsed between two instants, truncated toward zero.
fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_hours()
}
