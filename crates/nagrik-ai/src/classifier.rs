//! Keyword classification for complaints.
//!
//! Scores normalised complaint text against each category of a
//! [`KeywordTable`], picks the best category per table (department, priority)
//! and turns the winning match count into a bounded confidence. When nothing
//! matches, a fixed fallback label and confidence are used instead.

use chrono::{DateTime, Utc};
use nagrik_core::{ClassificationResult, DeadlineError, Priority, deadline_for, normalize_text};
use thiserror::Error;
use tracing::debug;

use crate::keywords::{KeywordTable, department_table, priority_table};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error(transparent)]
    Deadline(#[from] DeadlineError),
}

/// How match counts become confidences for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRule<L> {
    /// Confidence points per matched phrase. Confidence is capped at 100.
    pub multiplier: u32,
    /// Label used when no phrase of any category matches.
    pub fallback: L,
    pub fallback_confidence: u8,
}

impl ScoringRule<String> {
    /// Departments: 20 points per match, unmatched text goes to Municipality at 30.
    pub fn departments() -> Self {
        Self {
            multiplier: 20,
            fallback: "Municipality".to_string(),
            fallback_confidence: 30,
        }
    }
}

impl ScoringRule<Priority> {
    /// Priorities: 25 points per match, unmatched text is Medium at 40.
    pub fn priorities() -> Self {
        Self {
            multiplier: 25,
            fallback: Priority::Medium,
            fallback_confidence: 40,
        }
    }
}

/// Best category for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction<L> {
    pub label: L,
    /// 0-100.
    pub confidence: u8,
    /// Number of the winning category's phrases found in the text.
    pub score: usize,
    /// Nothing matched; `label` and `confidence` come from the fallback.
    pub fallback: bool,
}

/// Keyword table sizes, reported by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierSummary {
    pub departments: usize,
    pub priority_levels: usize,
    pub total_keywords: usize,
}

/// Department and priority classifier over injected keyword tables.
///
/// Holds only immutable data, so one instance can be shared across threads
/// and requests.
#[derive(Debug, Clone)]
pub struct Classifier {
    departments: KeywordTable<String>,
    department_rule: ScoringRule<String>,
    priorities: KeywordTable<Priority>,
    priority_rule: ScoringRule<Priority>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl Classifier {
    pub fn new(
        departments: KeywordTable<String>,
        department_rule: ScoringRule<String>,
        priorities: KeywordTable<Priority>,
        priority_rule: ScoringRule<Priority>,
    ) -> Self {
        Self {
            departments,
            department_rule,
            priorities,
            priority_rule,
        }
    }

    /// The municipal department and priority tables with their standard rules.
    pub fn standard() -> Self {
        Self::new(
            department_table(),
            ScoringRule::departments(),
            priority_table(),
            ScoringRule::priorities(),
        )
    }

    /// Predict the responsible department for raw complaint text.
    pub fn predict_department(&self, text: &str) -> Prediction<String> {
        best_match(&self.departments, &normalize_text(text), &self.department_rule)
    }

    /// Predict the priority for raw complaint text.
    pub fn predict_priority(&self, text: &str) -> Prediction<Priority> {
        best_match(&self.priorities, &normalize_text(text), &self.priority_rule)
    }

    /// Full classification: department, priority and the priority's deadline from `now`.
    pub fn classify(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ClassificationResult, ClassifyError> {
        let normalized = normalize_text(text);
        let department = best_match(&self.departments, &normalized, &self.department_rule);
        let priority = best_match(&self.priorities, &normalized, &self.priority_rule);
        let deadline = deadline_for(priority.label, now)?;

        debug!(
            department = %department.label,
            department_score = department.score,
            priority = %priority.label,
            priority_score = priority.score,
            "classified complaint text"
        );

        Ok(ClassificationResult {
            department: department.label,
            department_confidence: department.confidence,
            priority: priority.label,
            priority_confidence: priority.confidence,
            deadline,
        })
    }

    pub fn summary(&self) -> ClassifierSummary {
        ClassifierSummary {
            departments: self.departments.len(),
            priority_levels: self.priorities.len(),
            total_keywords: self.departments.phrase_count() + self.priorities.phrase_count(),
        }
    }

    pub fn departments(&self) -> &KeywordTable<String> {
        &self.departments
    }

    pub fn priorities(&self) -> &KeywordTable<Priority> {
        &self.priorities
    }
}

/// Count the phrases that occur as substrings of `text`.
///
/// Multi-word phrases match contiguously. Overlapping phrases each count.
pub fn keyword_score(text: &str, phrases: &[String]) -> usize {
    if text.is_empty() {
        return 0;
    }
    phrases.iter().filter(|p| text.contains(p.as_str())).count()
}

// ── Selection ──

/// Highest-scoring category; ties go to the earliest category in table order.
fn best_match<L: Clone>(table: &KeywordTable<L>, text: &str, rule: &ScoringRule<L>) -> Prediction<L> {
    let mut best: Option<(&L, usize)> = None;

    for (label, phrases) in table.iter() {
        let score = keyword_score(text, phrases);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((label, score));
        }
    }

    match best {
        Some((label, score)) if score > 0 => Prediction {
            label: label.clone(),
            confidence: confidence(score, rule.multiplier),
            score,
            fallback: false,
        },
        _ => Prediction {
            label: rule.fallback.clone(),
            confidence: rule.fallback_confidence.min(100),
            score: 0,
            fallback: true,
        },
    }
}

fn confidence(score: usize, multiplier: u32) -> u8 {
    let points = u32::try_from(score)
        .unwrap_or(u32::MAX)
        .saturating_mul(multiplier);
    points.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap()
    }

    fn phrases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ── Scorer ──

    #[test]
    fn score_counts_substrings() {
        let p = phrases(&["leak", "leakage", "pipe", "burst"]);
        // "leakage" contains "leak": both count.
        assert_eq!(keyword_score("pipe leakage near school", &p), 3);
    }

    #[test]
    fn score_multi_word_phrase_is_contiguous() {
        let p = phrases(&["live wire"]);
        assert_eq!(keyword_score("a live wire fell", &p), 1);
        assert_eq!(keyword_score("the wire is live", &p), 0);
    }

    #[test]
    fn score_empty_text() {
        assert_eq!(keyword_score("", &phrases(&["water"])), 0);
    }

    #[test]
    fn score_matches_inside_words() {
        // Substring semantics: "tap" inside "tape", "lane" inside "planet".
        assert_eq!(keyword_score("tape on the planet", &phrases(&["tap", "lane"])), 2);
    }

    // ── Fallback ──

    #[test]
    fn empty_text_falls_back() {
        let clf = Classifier::standard();

        let dept = clf.predict_department("");
        assert_eq!(dept.label, "Municipality");
        assert_eq!(dept.confidence, 30);
        assert!(dept.fallback);

        let prio = clf.predict_priority("");
        assert_eq!(prio.label, Priority::Medium);
        assert_eq!(prio.confidence, 40);
        assert!(prio.fallback);
    }

    #[test]
    fn unmatched_text_falls_back() {
        let clf = Classifier::standard();
        let dept = clf.predict_department("hello there, please help");
        assert_eq!((dept.label.as_str(), dept.confidence), ("Municipality", 30));
    }

    #[test]
    fn matched_municipality_is_not_fallback() {
        let clf = Classifier::standard();
        let dept = clf.predict_department("garbage everywhere");
        assert_eq!(dept.label, "Municipality");
        assert_eq!(dept.confidence, 20);
        assert!(!dept.fallback);
    }

    // ── Fixtures ──

    #[test]
    fn live_wire_near_transformer() {
        let clf = Classifier::standard();
        let text = "there is a live wire near the broken transformer causing sparks";

        let dept = clf.predict_department(text);
        assert_eq!(dept.label, "Electricity");
        // wire, spark, transformer
        assert_eq!(dept.score, 3);
        assert_eq!(dept.confidence, 60);

        let prio = clf.predict_priority(text);
        assert_eq!(prio.label, Priority::High);
        assert_eq!(prio.score, 1);
        assert_eq!(prio.confidence, 25);
    }

    #[test]
    fn pothole_near_junction() {
        let clf = Classifier::standard();
        let text = "the road near the junction has a big pothole";

        // PWD: road, pothole. Traffic: junction.
        let dept = clf.predict_department(text);
        assert_eq!(dept.label, "PWD");
        assert_eq!(dept.score, 2);
        assert_eq!(dept.confidence, 40);

        // No phrase from any priority list occurs.
        let prio = clf.predict_priority(text);
        assert_eq!(prio.label, Priority::Medium);
        assert_eq!(prio.confidence, 40);
        assert!(prio.fallback);
    }

    #[test]
    fn raw_text_is_normalised_before_scoring() {
        let clf = Classifier::standard();
        let prio = clf.predict_priority("LIVE-WIRE!!! Electric.Shock");
        assert_eq!(prio.label, Priority::High);
        assert_eq!(prio.score, 2);
    }

    #[test]
    fn confidence_is_capped() {
        let clf = Classifier::standard();
        let text = "water supply pipe pipeline tap pressure tank leakage";
        let dept = clf.predict_department(text);
        assert_eq!(dept.label, "Water");
        assert!(dept.score > 5);
        assert_eq!(dept.confidence, 100);
    }

    // ── Tie-break ──

    #[test]
    fn tie_goes_to_first_category_in_table_order() {
        let clf = Classifier::standard();
        // Water: "water"; PWD: "road". Water comes first.
        assert_eq!(clf.predict_department("water on road").label, "Water");
        // Traffic: "accident"; Police: "theft". Police comes first.
        assert_eq!(clf.predict_department("theft after accident").label, "Police");
    }

    #[test]
    fn tie_order_follows_injected_table() {
        let departments = KeywordTable::new()
            .with_category("Beta".to_string(), ["alpha"])
            .with_category("Alpha".to_string(), ["alpha"]);
        let clf = Classifier::new(
            departments,
            ScoringRule::departments(),
            priority_table(),
            ScoringRule::priorities(),
        );
        assert_eq!(clf.predict_department("alpha").label, "Beta");
    }

    #[test]
    fn injected_rule_changes_fallback() {
        let clf = Classifier::new(
            KeywordTable::new(),
            ScoringRule {
                multiplier: 10,
                fallback: "Unrouted".to_string(),
                fallback_confidence: 0,
            },
            KeywordTable::new(),
            ScoringRule::priorities(),
        );
        let dept = clf.predict_department("anything");
        assert_eq!(dept.label, "Unrouted");
        assert_eq!(dept.confidence, 0);
    }

    // ── Full classification ──

    #[test]
    fn classify_sets_deadline_from_priority() {
        let clf = Classifier::standard();

        let high = clf.classify("fire in the building", now()).unwrap();
        assert_eq!(high.priority, Priority::High);
        assert_eq!(high.deadline - now(), TimeDelta::hours(24));

        let medium = clf.classify("", now()).unwrap();
        assert_eq!(medium.priority, Priority::Medium);
        assert_eq!(medium.deadline - now(), TimeDelta::hours(72));

        let low = clf.classify("minor dust on the footpath", now()).unwrap();
        assert_eq!(low.priority, Priority::Low);
        assert_eq!(low.deadline - now(), TimeDelta::days(7));
    }

    #[test]
    fn classify_is_deterministic() {
        let clf = Classifier::standard();
        let text = "Drunk men fighting near the bus stop, loud noise all night";
        let first = clf.classify(text, now()).unwrap();
        for _ in 0..5 {
            assert_eq!(clf.classify(text, now()).unwrap(), first);
        }
    }

    #[test]
    fn classify_deadline_overflow() {
        let clf = Classifier::standard();
        let err = clf.classify("fire", DateTime::<Utc>::MAX_UTC).unwrap_err();
        assert!(matches!(err, ClassifyError::Deadline(_)));
    }

    #[test]
    fn summary_counts() {
        let summary = Classifier::standard().summary();
        assert_eq!(summary.departments, 6);
        assert_eq!(summary.priority_levels, 3);
        assert_eq!(summary.total_keywords, 94 + 29);
    }
}
