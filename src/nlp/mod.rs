//! Minimal English text pipeline: sentences, tokens, tags and noun chunks.

pub mod stopwords;
pub mod tagger;

use std::sync::LazyLock;

use regex::Regex;

pub use tagger::{HeuristicTagger, Pos, Tagger};

static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["')\]]*(?:\s+|$)|\n[ \t]*\n\s*"#).unwrap()
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]").unwrap()
});

const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "mr", "mrs", "ms", "dr", "vs", "prof", "fig", "approx", "cf",
];

fn ends_with_abbreviation(before: &str) -> bool {
    let last = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '"', '\'']);
    if ABBREVIATIONS.contains(&last.to_lowercase().as_str()) {
        return true;
    }
    // initials such as "J. Smith"
    let mut chars = last.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        out.push(normalized);
    }
}

/// Split text into sentences, collapsing internal whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BOUNDARY.find_iter(text) {
        if m.as_str().starts_with('.') && ends_with_abbreviation(&text[start..m.start()]) {
            continue;
        }
        push_sentence(&mut sentences, &text[start..m.end()]);
        start = m.end();
    }
    if start < text.len() {
        push_sentence(&mut sentences, &text[start..]);
    }
    sentences
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy)]
pub struct NounChunk<'a> {
    pub text: &'a str,
    pub tokens: &'a [Token],
}

impl NounChunk<'_> {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn parse(text: String, tagger: &dyn Tagger) -> Self {
        let spans: Vec<(usize, usize)> = TOKEN
            .find_iter(&text)
            .map(|m| (m.start(), m.end()))
            .collect();
        let words: Vec<&str> = spans.iter().map(|&(s, e)| &text[s..e]).collect();
        let tags = tagger.tag(&words);

        let tokens = spans
            .iter()
            .zip(tags)
            .map(|(&(start, end), pos)| Token {
                text: text[start..end].to_string(),
                start,
                end,
                pos,
            })
            .collect();

        Self { text, tokens }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// `Determiner? (Adjective|Number)* (Noun|ProperNoun)+`, longest match.
    pub fn noun_chunks(&self) -> Vec<NounChunk<'_>> {
        let tokens = &self.tokens;
        let n = tokens.len();
        let mut chunks = Vec::new();
        let mut i = 0;

        while i < n {
            let start = i;
            let mut j = i;
            if tokens[j].pos == Pos::Determiner {
                j += 1;
            }
            while j < n && matches!(tokens[j].pos, Pos::Adjective | Pos::Number) {
                j += 1;
            }
            let head_start = j;
            while j < n && tokens[j].pos.is_nominal() {
                j += 1;
            }

            if j > head_start {
                let slice = &tokens[start..j];
                chunks.push(NounChunk {
                    text: &self.text[slice[0].start..slice[slice.len() - 1].end],
                    tokens: slice,
                });
                i = j;
            } else {
                i = start + 1;
            }
        }

        chunks
    }
}

/// A parsed text: sentences of tagged tokens.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn parse(text: &str, tagger: &dyn Tagger) -> Self {
        let sentences = split_sentences(text)
            .into_iter()
            .map(|s| Sentence::parse(s, tagger))
            .collect();
        Self { sentences }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    pub fn noun_chunks(&self) -> Vec<NounChunk<'_>> {
        self.sentences.iter().flat_map(|s| s.noun_chunks()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = split_sentences("First one. Second one!  Third?\nStill third.");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third?", "Still third."]
        );
    }

    #[test]
    fn abbreviations_do_not_end_sentences() {
        let sentences = split_sentences("Use a cache, e.g. Redis for speed. Done.");
        assert_eq!(sentences, vec!["Use a cache, e.g. Redis for speed.", "Done."]);
    }

    #[test]
    fn blank_lines_separate_headings() {
        let sentences = split_sentences("Chapter One\n\nMemory is finite.");
        assert_eq!(sentences, vec!["Chapter One", "Memory is finite."]);
    }

    #[test]
    fn decimals_stay_inside_a_sentence() {
        let sentences = split_sentences("Version 3.5 is stable. Next.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn empty_text_has_no_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n ").is_empty());
    }

    #[test]
    fn noun_chunks_include_determiner_and_modifiers() {
        let doc = Document::parse("The system always requires high memory.", &HeuristicTagger);
        let chunks: Vec<&str> = doc.noun_chunks().iter().map(|c| c.text).collect();
        assert_eq!(chunks, vec!["The system", "high memory"]);
    }

    #[test]
    fn tokens_carry_spans_into_the_sentence() {
        let sentence = Sentence::parse("Cache-line size matters.".to_string(), &HeuristicTagger);
        let first = &sentence.tokens[0];
        assert_eq!(first.text, "Cache-line");
        assert_eq!(&sentence.text[first.start..first.end], "Cache-line");
        assert_eq!(sentence.tokens.last().map(|t| t.pos), Some(Pos::Punct));
    }
}
