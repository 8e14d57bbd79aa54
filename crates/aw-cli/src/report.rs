//! Console rendering for engine results.

use colored::Colorize;

use aw_core::{
    ConcentrationRisk, DataIntegrityWarning, DeadlineState, DeletionVerdict, Diagnostics,
    SweepReport,
};

/// Prints a deadline sweep report as a console table.
pub fn print_sweep_report(report: &SweepReport) {
    println!("{}", "Deadline Sweep".bold());
    println!("──────────────");

    if report.records.is_empty() {
        println!("No tracked deadlines in this inventory.");
        return;
    }

    for record in &report.records {
        let state = match record.state {
            DeadlineState::OnTime => format!("{}", "On Time".green()),
            DeadlineState::AtRisk => format!("{}", "At Risk".yellow()),
            DeadlineState::Breached => format!("{}", "Breached".red().bold()),
            DeadlineState::Resolved => format!("{}", "Resolved".dimmed()),
            DeadlineState::Unknown => format!("{}", "Unknown".dimmed()),
        };
        println!(
            "  {:<30} {:<10} {}  {}",
            record.kind.to_string(),
            state,
            record.subject_id,
            record.clock
        );
    }

    println!();
    println!(
        "Evaluated: {}  Breached: {}  At risk: {}  Unknown timestamps: {}",
        report.diagnostics.subjects_evaluated,
        report.breached_count(),
        report.at_risk().count(),
        report.diagnostics.unknown_timestamps
    );

    if !report.drafts.is_empty() {
        println!();
        println!("{}", "Remediation Drafts".bold());
        for draft in &report.drafts {
            println!("  {} {}", "✗".red(), draft.title);
        }
    }
}

/// Prints a deletion verdict.
pub fn print_verdict(verdict: &DeletionVerdict) {
    if verdict.allowed {
        println!("  {} Deletion allowed: no active references", "✓".green());
    } else {
        println!("  {} Deletion blocked by:", "✗".red());
        for reason in &verdict.display_reasons {
            println!("    - {}", reason);
        }
    }
}

/// Prints a concentration risk signal, or its absence.
pub fn print_concentration(risk: Option<&ConcentrationRisk>) {
    println!("{}", "Provider Concentration".bold());
    println!("──────────────────────");
    match risk {
        Some(risk) => {
            let line = format!(
                "{} hosts {} of {} elevated services ({}%)",
                risk.provider, risk.count, risk.total, risk.percentage
            );
            if risk.percentage >= 50 {
                println!("  {} {}", "⚠".yellow(), line);
            } else {
                println!("  {}", line);
            }
        }
        None => println!("  No elevated services; no concentration signal."),
    }
}

/// Prints data integrity diagnostics.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    println!("{}", "Data Integrity".bold());
    println!("──────────────");

    if diagnostics.is_clean() {
        println!("  {} Inventory OK", "✓".green());
        return;
    }

    for warning in &diagnostics.warnings {
        let symbol = match warning {
            DataIntegrityWarning::DuplicateId { .. } => "⚠".yellow(),
            DataIntegrityWarning::DanglingEdge { .. } => "⚠".yellow(),
            DataIntegrityWarning::AmbiguousEdge { .. } => "✗".red(),
        };
        println!("  {} {}", symbol, warning);
    }
    println!();
    println!("  {} warning(s) found", diagnostics.warnings.len());
}
