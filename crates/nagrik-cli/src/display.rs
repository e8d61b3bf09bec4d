//! Vertical card display for classifications.
//!
//! Renders to a `String` so output can be tested; callers print it.

use std::fmt::Write;

use nagrik_ai::Classifier;
use nagrik_core::ClassificationResult;
use nagrik_core::api::{Analysis, BatchResponse, HealthResponse, StatsResponse};

const PREVIEW_WIDTH: usize = 48;

/// Card for a local classification.
pub fn classification_card(text: &str, result: &ClassificationResult) -> String {
    let mut out = String::new();
    header(&mut out, text);
    section(&mut out, "Routing");
    field(&mut out, "department", &result.department);
    field(&mut out, "department_confidence", &format!("{}%", result.department_confidence));
    field(&mut out, "recommended_action", &result.recommended_action());
    section(&mut out, "Urgency");
    field(&mut out, "priority", result.priority.as_str());
    field(&mut out, "priority_confidence", &format!("{}%", result.priority_confidence));
    field(&mut out, "urgency", result.urgency());
    field(&mut out, "deadline", &result.deadline.to_rfc3339());
    out
}

/// Card for an analysis returned by a remote API.
pub fn analysis_card(text: &str, analysis: &Analysis) -> String {
    let mut out = String::new();
    header(&mut out, text);
    section(&mut out, "Routing");
    field(&mut out, "department", &analysis.department);
    field(&mut out, "department_confidence", &format!("{}%", analysis.department_confidence));
    field(&mut out, "recommended_action", &analysis.recommended_action);
    section(&mut out, "Urgency");
    field(&mut out, "priority", analysis.priority.as_str());
    field(&mut out, "priority_confidence", &format!("{}%", analysis.priority_confidence));
    field(&mut out, "urgency", &analysis.urgency);
    field(&mut out, "deadline", &analysis.deadline);
    out
}

/// One line per analysed entry, then the totals.
pub fn batch_table(resp: &BatchResponse) -> String {
    let mut out = String::new();
    for item in &resp.results {
        let _ = writeln!(
            out,
            "  [{:>3}] {:<13} {:>3}%  {:<6} {:>3}%  {}",
            item.id,
            item.department,
            item.department_confidence,
            item.priority.as_str(),
            item.priority_confidence,
            truncate(&item.text_preview, PREVIEW_WIDTH),
        );
    }
    let _ = writeln!(
        out,
        "{} total, {} analysed, {} skipped",
        resp.summary.total, resp.summary.successful, resp.summary.failed
    );
    out
}

/// Category and phrase counts of the local keyword tables.
pub fn keyword_summary(classifier: &Classifier) -> String {
    let mut out = String::new();
    let summary = classifier.summary();

    section(&mut out, "Departments");
    for (label, phrases) in classifier.departments().iter() {
        field(&mut out, label, &phrases.len().to_string());
    }
    section(&mut out, "Priorities");
    for (label, phrases) in classifier.priorities().iter() {
        field(&mut out, label.as_str(), &phrases.len().to_string());
    }
    section(&mut out, "Totals");
    field(&mut out, "departments", &summary.departments.to_string());
    field(&mut out, "priority_levels", &summary.priority_levels.to_string());
    field(&mut out, "total_keywords", &summary.total_keywords.to_string());
    out
}

pub fn health_lines(health: &HealthResponse) -> String {
    let mut out = String::new();
    field(&mut out, "status", &health.status);
    field(&mut out, "service", &health.service);
    field(&mut out, "has_database", &health.has_database.to_string());
    field(&mut out, "timestamp", &health.timestamp);
    out
}

pub fn stats_lines(stats: &StatsResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} v{} ({}) ===", stats.service, stats.version, stats.status);
    section(&mut out, "Keywords");
    field(&mut out, "departments", &stats.keywords.departments.to_string());
    field(&mut out, "priority_levels", &stats.keywords.priority_levels.to_string());
    field(&mut out, "total_keywords", &stats.keywords.total_keywords.to_string());
    section(&mut out, "Database");
    field(&mut out, "connected", &stats.database.connected.to_string());
    field(&mut out, "mode", &stats.database.mode);
    section(&mut out, "Endpoints");
    for e in &stats.endpoints {
        let _ = writeln!(out, "  {:<6} {:<26} {}", e.method, e.path, e.description);
    }
    out
}

// ── Layout ──

fn header(out: &mut String, text: &str) {
    let _ = writeln!(out, "=== {} ===", truncate(text.trim(), PREVIEW_WIDTH));
    out.push('\n');
}

fn section(out: &mut String, name: &str) {
    let _ = writeln!(out, "{name}");
}

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "  {:<26} {}", name, value);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let head: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn card_shows_routing_and_deadline() {
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap();
        let result = Classifier::standard()
            .classify("there is a live wire near the broken transformer causing sparks", now)
            .unwrap();
        let card = classification_card("there is a live wire near the broken transformer causing sparks", &result);

        assert!(card.starts_with("=== there is a live wire near the broken transfor... ==="));
        assert!(card.contains("  department                 Electricity\n"));
        assert!(card.contains("  department_confidence      60%\n"));
        assert!(card.contains("  urgency                    High\n"));
        assert!(card.contains("  deadline                   2026-02-22T10:00:00+00:00\n"));
    }

    #[test]
    fn keyword_summary_lists_every_category() {
        let out = keyword_summary(&Classifier::standard());
        assert!(out.contains("  Police                     20\n"));
        assert!(out.contains("  High                       14\n"));
        assert!(out.contains("  total_keywords             123\n"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
