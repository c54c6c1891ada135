//! Question synthesis from topic-bearing sentences

use std::sync::LazyLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Regex, RegexBuilder};

use super::topics::relevant_topics;
use super::{Question, QuestionBody};

pub const BLANK: &str = "_____";
const DISTRACTORS: usize = 3;

/// Pairs are looked up by the word found in the sentence, so the flip
/// depends only on sentence order.
const OPPOSITES: &[(&str, &str)] = &[
    ("increases", "decreases"),
    ("decreases", "increases"),
    ("improves", "reduces"),
    ("reduces", "improves"),
    ("essential", "optional"),
    ("required", "optional"),
    ("always", "never"),
    ("never", "always"),
    ("high", "low"),
    ("low", "high"),
    ("better", "worse"),
    ("worse", "better"),
    ("more", "less"),
    ("less", "more"),
];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").unwrap());

fn opposite_of(word: &str) -> Option<&'static str> {
    let lower = word.to_lowercase();
    OPPOSITES
        .iter()
        .find(|(w, _)| *w == lower)
        .map(|(_, opposite)| *opposite)
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().count() > 1 && original.chars().all(char::is_uppercase) {
        return replacement.to_uppercase();
    }
    if !original.chars().next().is_some_and(char::is_uppercase) {
        return replacement.to_string();
    }
    let mut rest = replacement.chars();
    let mut out = String::with_capacity(replacement.len());
    if let Some(c) = rest.next() {
        out.extend(c.to_uppercase());
    }
    out.push_str(rest.as_str());
    out
}

/// Flip the first word (in sentence order) that has an entry in the
/// opposites table. `None` when no word qualifies.
pub fn negate_statement(sentence: &str) -> Option<String> {
    WORD.find_iter(sentence).find_map(|m| {
        opposite_of(m.as_str()).map(|opposite| {
            format!(
                "{}{}{}",
                &sentence[..m.start()],
                match_case(m.as_str(), opposite),
                &sentence[m.end()..]
            )
        })
    })
}

pub fn true_false_question<R: Rng>(
    sentence: &str,
    topics: &[String],
    rng: &mut R,
) -> Option<QuestionBody> {
    let relevant = relevant_topics(sentence, topics);
    let topic = (*relevant.choose(rng)?).clone();

    let keep_true = rng.gen_bool(0.5);
    let (question, correct_answer) = if keep_true {
        (sentence.to_string(), true)
    } else {
        match negate_statement(sentence) {
            Some(flipped) => (flipped, false),
            // nothing to flip, so the statement is still true
            None => (sentence.to_string(), true),
        }
    };

    Some(QuestionBody::TrueFalse {
        question,
        correct_answer,
        topic,
    })
}

pub(crate) fn blank_out(sentence: &str, topic: &str) -> String {
    match RegexBuilder::new(&regex::escape(topic))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(sentence, BLANK).into_owned(),
        Err(_) => sentence.replace(topic, BLANK),
    }
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

pub fn mcq_question<R: Rng>(
    sentence: &str,
    topics: &[String],
    rng: &mut R,
) -> Option<QuestionBody> {
    let relevant = relevant_topics(sentence, topics);
    let topic = (*relevant.choose(rng)?).clone();
    let question = blank_out(sentence, &topic);

    let others: Vec<&String> = topics.iter().filter(|t| **t != topic).collect();
    let same_length: Vec<&String> = others
        .iter()
        .copied()
        .filter(|t| word_count(t) == word_count(&topic))
        .collect();
    let pool = if same_length.len() >= DISTRACTORS {
        same_length
    } else {
        others
    };

    let mut options: Vec<String> = pool
        .choose_multiple(rng, DISTRACTORS)
        .map(|t| t.to_string())
        .collect();
    options.push(topic.clone());
    options.shuffle(rng);

    Some(QuestionBody::Mcq {
        question,
        options,
        correct_answer: topic.clone(),
        topic,
    })
}

/// Draw sentences without replacement until `num_questions` questions exist
/// or the pool is empty.
pub fn synthesize<R: Rng>(
    mut sentences: Vec<String>,
    topics: &[String],
    num_questions: usize,
    rng: &mut R,
) -> Vec<Question> {
    if sentences.is_empty() || topics.is_empty() {
        return Vec::new();
    }

    let mut questions = Vec::new();
    while questions.len() < num_questions && !sentences.is_empty() {
        let sentence = sentences.swap_remove(rng.gen_range(0..sentences.len()));
        let body = if rng.gen_bool(0.5) {
            mcq_question(&sentence, topics, rng)
        } else {
            true_false_question(&sentence, topics, rng)
        };
        if let Some(body) = body {
            questions.push(Question {
                id: questions.len() + 1,
                body,
            });
        }
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn negation_flips_first_word_in_sentence_order() {
        assert_eq!(
            negate_statement("The system always requires high memory").as_deref(),
            Some("The system never requires high memory")
        );
    }

    #[test]
    fn negation_matches_whole_words_and_keeps_case() {
        assert_eq!(
            negate_statement("Highway traffic is High today").as_deref(),
            Some("Highway traffic is Low today")
        );
        assert_eq!(negate_statement("Nothing to change here"), None);
    }

    #[test]
    fn true_false_requires_a_topic_in_the_sentence() {
        let mut rng = StdRng::seed_from_u64(3);
        let topics = strings(&["paging", "virtual memory"]);
        for _ in 0..20 {
            assert!(true_false_question("The kernel schedules work.", &topics, &mut rng).is_none());
        }
    }

    #[test]
    fn true_false_answer_matches_modification() {
        let mut rng = StdRng::seed_from_u64(5);
        let sentence = "The system always requires high memory";
        let topics = strings(&["memory"]);
        let mut seen_false = false;
        for _ in 0..50 {
            match true_false_question(sentence, &topics, &mut rng) {
                Some(QuestionBody::TrueFalse {
                    question,
                    correct_answer,
                    topic,
                }) => {
                    assert_eq!(topic, "memory");
                    if correct_answer {
                        assert_eq!(question, sentence);
                    } else {
                        seen_false = true;
                        assert_eq!(question, "The system never requires high memory");
                    }
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(seen_false);
    }

    #[test]
    fn unflippable_sentence_is_always_true() {
        let mut rng = StdRng::seed_from_u64(9);
        let topics = strings(&["kernel"]);
        for _ in 0..20 {
            let q = true_false_question("The kernel schedules work.", &topics, &mut rng).unwrap();
            assert!(matches!(q, QuestionBody::TrueFalse { correct_answer: true, .. }));
        }
    }

    #[test]
    fn mcq_has_four_options_with_one_correct() {
        let mut rng = StdRng::seed_from_u64(42);
        let topics = strings(&["paging", "kernel", "scheduler", "virtual memory", "page table"]);
        for _ in 0..20 {
            let q = mcq_question("Paging lets the kernel swap memory.", &topics, &mut rng).unwrap();
            let QuestionBody::Mcq {
                question,
                options,
                correct_answer,
                topic,
            } = q
            else {
                panic!("expected mcq");
            };
            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|o| **o == correct_answer).count(), 1);
            assert_eq!(correct_answer, topic);
            assert!(question.contains(BLANK));
            assert!(!question.to_lowercase().contains(&topic));
        }
    }

    #[test]
    fn mcq_prefers_distractors_of_the_same_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let topics = strings(&[
            "page table",
            "virtual memory",
            "disk drive",
            "main memory",
            "kernel",
            "scheduler",
        ]);
        let q = mcq_question("The page table lives in RAM.", &topics, &mut rng).unwrap();
        if let QuestionBody::Mcq { options, .. } = q {
            assert!(options.iter().all(|o| o.split_whitespace().count() == 2));
        }
    }

    #[test]
    fn mcq_with_few_topics_uses_what_exists() {
        let mut rng = StdRng::seed_from_u64(2);
        let topics = strings(&["paging", "kernel"]);
        let q = mcq_question("Paging is handled by the kernel.", &topics, &mut rng).unwrap();
        if let QuestionBody::Mcq { options, .. } = q {
            assert_eq!(options.len(), 2);
        }
    }

    #[test]
    fn synthesis_stops_when_pool_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(8);
        let topics = strings(&["paging", "kernel", "scheduler"]);
        let sentences = strings(&[
            "Paging is one way the kernel manages memory for every running process.",
            "The scheduler picks the next process that the kernel should run on a core.",
        ]);
        let questions = synthesize(sentences, &topics, 5, &mut rng);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, 1);
        assert_eq!(questions[1].id, 2);
        assert_ne!(questions[0].body.question(), questions[1].body.question());
    }

    #[test]
    fn synthesis_with_empty_inputs_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(synthesize(Vec::new(), &strings(&["kernel"]), 5, &mut rng).is_empty());
        assert!(synthesize(strings(&["A sentence."]), &[], 5, &mut rng).is_empty());
    }
}
