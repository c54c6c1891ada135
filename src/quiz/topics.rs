use std::collections::BTreeSet;

use crate::nlp::Document;

const MAX_TOPIC_WORDS: usize = 3;
const MIN_SENTENCE_WORDS: usize = 10;
const MAX_SENTENCE_WORDS: usize = 30;

/// Short noun phrases usable as question subjects.
pub fn extract_topics(doc: &Document) -> Vec<String> {
    let mut topics = BTreeSet::new();
    for chunk in doc.noun_chunks() {
        let has_head = chunk.tokens.iter().any(|t| t.pos.is_nominal());
        let has_digit = chunk.text.chars().any(|c| c.is_ascii_digit());
        if has_head && chunk.word_count() <= MAX_TOPIC_WORDS && !has_digit {
            topics.insert(chunk.text.to_lowercase());
        }
    }
    topics
        .into_iter()
        .filter(|t| t.split_whitespace().count() > 1 || t.chars().count() > 5)
        .collect()
}

/// Topics that occur (case-insensitively) in `sentence`.
pub fn relevant_topics<'a>(sentence: &str, topics: &'a [String]) -> Vec<&'a String> {
    let lower = sentence.to_lowercase();
    topics.iter().filter(|t| lower.contains(t.as_str())).collect()
}

/// Sentences of 10 to 30 words that mention at least one topic.
pub fn select_sentences(doc: &Document, topics: &[String]) -> Vec<String> {
    doc.sentences
        .iter()
        .filter(|s| (MIN_SENTENCE_WORDS..=MAX_SENTENCE_WORDS).contains(&s.word_count()))
        .filter(|s| !relevant_topics(&s.text, topics).is_empty())
        .map(|s| s.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::HeuristicTagger;

    fn doc(text: &str) -> Document {
        Document::parse(text, &HeuristicTagger)
    }

    #[test]
    fn keeps_multi_word_and_long_single_word_topics() {
        let topics = extract_topics(&doc("The system always requires high memory. Paging helps."));
        assert!(topics.contains(&"the system".to_string()));
        assert!(topics.contains(&"high memory".to_string()));
        assert!(topics.contains(&"paging".to_string()));
    }

    #[test]
    fn verb_does_not_extend_the_subject_chunk() {
        let topics = extract_topics(&doc(
            "The page table maps each virtual address to a physical frame.",
        ));
        assert!(topics.contains(&"the page table".to_string()));
        assert!(topics.contains(&"a physical frame".to_string()));
        assert!(topics.iter().all(|t| !t.contains("maps")));
    }

    #[test]
    fn drops_short_single_words_and_numbers() {
        let topics = extract_topics(&doc("Disk usage hit 90 percent. Cache helps."));
        assert!(!topics.contains(&"cache".to_string()));
        assert!(topics.iter().all(|t| !t.chars().any(|c| c.is_ascii_digit())));
    }

    #[test]
    fn drops_long_phrases() {
        let topics = extract_topics(&doc("The big fast shared memory controller works."));
        assert!(topics.iter().all(|t| t.split_whitespace().count() <= 3));
    }

    #[test]
    fn selects_sentences_by_length_and_topic() {
        let text = "Paging divides memory into fixed size pages for the operating system to manage. \
                    Paging is good. \
                    The weather outside was pleasant and warm for the whole long afternoon today.";
        let d = doc(text);
        let topics = vec!["paging".to_string()];
        let selected = select_sentences(&d, &topics);
        assert_eq!(selected.len(), 1);
        assert!(selected[0].starts_with("Paging divides memory"));
    }

    #[test]
    fn relevance_is_case_insensitive() {
        let topics = vec!["virtual memory".to_string(), "kernel".to_string()];
        let found = relevant_topics("Virtual Memory is managed by the OS.", &topics);
        assert_eq!(found, vec![&topics[0]]);
    }
}
