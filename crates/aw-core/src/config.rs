//! Engine configuration.
//!
//! Configuration is an explicit value object injected into every engine
//! constructor. There is no module-level settings singleton; callers that
//! read configuration from a store pass the resulting value in per call.

use serde::{Deserialize, Serialize};

use crate::models::TicketCategory;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deadline scheduler settings.
    #[serde(default)]
    pub deadline: DeadlineConfig,

    /// Maximum number of blocking reasons shown inline by dashboards.
    /// The full list is always available on the verdict.
    #[serde(default = "default_display_reason_limit")]
    pub display_reason_limit: usize,
}

fn default_display_reason_limit() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deadline: DeadlineConfig::default(),
            display_reason_limit: default_display_reason_limit(),
        }
    }
}

/// Deadline scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineConfig {
    /// NIS2 early-warning window for security incidents, in hours.
    #[serde(default = "default_early_warning_hours")]
    pub early_warning_hours: i64,

    /// NIS2 incident-notification window, in hours.
    #[serde(default = "default_notification_hours")]
    pub notification_hours: i64,

    /// Expiry warning window for certificates and policy reviews, in days.
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    /// Width of the `AtRisk` band before an incident clock breaches, in
    /// hours. Zero disables the band for binary on-time/breached states.
    #[serde(default)]
    pub at_risk_margin_hours: i64,

    /// Ticket categories treated as security-relevant in addition to the
    /// explicit incident flag.
    #[serde(default = "default_security_categories")]
    pub security_categories: Vec<TicketCategory>,

    /// Whether breached subjects without an open remediation ticket
    /// produce ticket drafts.
    #[serde(default = "default_true")]
    pub auto_ticket: bool,
}

fn default_early_warning_hours() -> i64 {
    24
}

fn default_notification_hours() -> i64 {
    72
}

fn default_expiry_warning_days() -> i64 {
    30
}

fn default_security_categories() -> Vec<TicketCategory> {
    vec![TicketCategory::SecurityIncident]
}

fn default_true() -> bool {
    true
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            early_warning_hours: default_early_warning_hours(),
            notification_hours: default_notification_hours(),
            expiry_warning_days: default_expiry_warning_days(),
            at_risk_margin_hours: 0,
            security_categories: default_security_categories(),
            auto_ticket: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.display_reason_limit, 3);
        assert_eq!(config.deadline.early_warning_hours, 24);
        assert_eq!(config.deadline.notification_hours, 72);
        assert_eq!(config.deadline.expiry_warning_days, 30);
        assert_eq!(config.deadline.at_risk_margin_hours, 0);
        assert!(config.deadline.auto_ticket);
        assert_eq!(
            config.deadline.security_categories,
            vec![TicketCategory::SecurityIncident]
        );
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"deadline": {"notification_hours": 96}}"#).unwrap();

        assert_eq!(config.deadline.notification_hours, 96);
        assert_eq!(config.deadline.early_warning_hours, 24);
        assert_eq!(config.display_reason_limit, 3);
    }
}
