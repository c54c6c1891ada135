use std::collections::BTreeSet;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One answer as echoed back by the client. Grading trusts
/// `correct_answer` and `topic` as sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmittedAnswer {
    #[serde(default)]
    pub selected_answer: Option<Value>,
    #[serde(default)]
    pub correct_answer: Option<Value>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradingResult {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub topics_to_review: Vec<String>,
}

// An empty submission reports `"percentage": 0` rather than `0.0`.
impl Serialize for GradingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GradingResult", 4)?;
        state.serialize_field("score", &self.score)?;
        state.serialize_field("total", &self.total)?;
        if self.total == 0 {
            state.serialize_field("percentage", &0u64)?;
        } else {
            state.serialize_field("percentage", &self.percentage)?;
        }
        state.serialize_field("topics_to_review", &self.topics_to_review)?;
        state.end()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = score as f64 / total as f64 * 100.0;
    (raw * 10.0).round_ties_even() / 10.0
}

pub fn grade_answers(answers: &[SubmittedAnswer]) -> GradingResult {
    let mut score = 0;
    let mut topics_to_review = BTreeSet::new();

    for answer in answers {
        if answer.selected_answer == answer.correct_answer {
            score += 1;
        } else if let Some(topic) = answer.topic.as_deref().filter(|t| !t.is_empty()) {
            topics_to_review.insert(capitalize(topic));
        }
    }

    GradingResult {
        score,
        total: answers.len(),
        percentage: percentage(score, answers.len()),
        topics_to_review: topics_to_review.into_iter().collect(),
    }
}
