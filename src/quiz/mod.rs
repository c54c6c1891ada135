pub mod grading;
pub mod questions;
pub mod topics;

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::nlp::{Document, HeuristicTagger, Tagger};

pub use grading::{grade_answers, GradingResult, SubmittedAnswer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    Mcq {
        question: String,
        options: Vec<String>,
        correct_answer: String,
        topic: String,
    },
    TrueFalse {
        question: String,
        correct_answer: bool,
        topic: String,
    },
}

impl QuestionBody {
    pub fn question(&self) -> &str {
        match self {
            QuestionBody::Mcq { question, .. } | QuestionBody::TrueFalse { question, .. } => {
                question
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: usize,
    #[serde(flatten)]
    pub body: QuestionBody,
}

#[derive(Clone)]
pub struct QuizGenerator {
    tagger: Arc<dyn Tagger>,
}

impl Default for QuizGenerator {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicTagger))
    }
}

impl QuizGenerator {
    pub fn new(tagger: Arc<dyn Tagger>) -> Self {
        Self { tagger }
    }

    /// Candidate sentences and the topics they were selected for.
    pub fn process_text(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let doc = Document::parse(text, self.tagger.as_ref());
        let topics = topics::extract_topics(&doc);
        let sentences = topics::select_sentences(&doc, &topics);
        (sentences, topics)
    }

    /// Up to `num_questions` questions, fewer if the sentence pool runs out.
    pub fn generate_questions<R: Rng>(
        &self,
        text: &str,
        num_questions: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let (sentences, topics) = self.process_text(text);
        log::debug!(
            "Quiz pool: {} sentences, {} topics",
            sentences.len(),
            topics.len()
        );
        questions::synthesize(sentences, &topics, num_questions, rng)
    }
}
