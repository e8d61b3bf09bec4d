//! Complaint classification: keyword tables, additive scoring, department and priority prediction.

mod classifier;
pub mod keywords;

pub use classifier::{ClassifierSummary, ClassifyError, Classifier, Prediction, ScoringRule, keyword_score};
pub use keywords::{KeywordTable, department_table, priority_table};
