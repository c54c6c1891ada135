//! Part-of-speech tagging
//!
//! `HeuristicTagger` is a lexicon-and-suffix tagger. It is deliberately
//! coarse: the only consumer is the noun-chunker, which needs to tell
//! nominal heads apart from the function words and verbs around them.

use std::collections::HashSet;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Adverb,
    Determiner,
    Pronoun,
    Preposition,
    Conjunction,
    Auxiliary,
    Number,
    Punct,
    Other,
}

impl Pos {
    pub fn is_nominal(self) -> bool {
        matches!(self, Pos::Noun | Pos::ProperNoun)
    }
}

/// Assigns one tag per token of a single sentence.
pub trait Tagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Vec<Pos>;
}

fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static DETERMINERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any", "no",
        "all", "both", "either", "neither", "another", "such", "my", "your", "his", "her", "its",
        "our", "their", "many", "few", "several", "much",
    ])
});

static PRONOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "who", "whom",
        "which", "what", "whose", "itself", "themselves", "himself", "herself", "ourselves",
        "yourself", "mine", "yours", "ours", "theirs", "hers", "something", "anything",
        "everything", "nothing", "someone", "anyone", "everyone",
    ])
});

static PREPOSITIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
        "over", "under", "within", "without", "across", "among", "toward", "towards", "upon",
        "via", "per", "than", "as", "onto", "beyond", "around", "along", "behind", "beside",
        "despite", "except", "inside", "outside", "throughout", "until", "off", "out",
    ])
});

static CONJUNCTIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "and", "or", "but", "nor", "yet", "because", "although", "though", "while", "if",
        "unless", "whereas", "whether", "since", "when", "where", "how", "why", "so",
    ])
});

static AUXILIARIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "having",
        "do", "does", "did", "can", "could", "will", "would", "shall", "should", "may", "might",
        "must",
    ])
});

static ADVERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "not", "also", "very", "often", "always", "never", "usually", "sometimes", "only",
        "just", "even", "still", "already", "too", "quite", "rather", "however", "therefore",
        "thus", "hence", "then", "here", "there", "now", "more", "most", "less", "least",
        "well", "again", "further", "once", "almost", "ever", "soon", "instead", "first",
    ])
});

static ADJECTIVES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "high", "low", "large", "small", "big", "new", "old", "good", "bad", "better", "worse",
        "best", "worst", "important", "different", "essential", "optional", "main", "key",
        "common", "simple", "complex", "fast", "slow", "early", "late", "last", "other", "same",
        "various", "specific", "general", "major", "minor", "possible", "available", "efficient",
        "certain", "recent", "free", "full", "hard", "soft", "long", "short", "strong", "weak", "single",
        "multiple", "whole", "real", "open", "closed", "private", "public", "basic", "primary",
        "secondary", "local", "global", "low-level", "high-level", "next", "previous", "own",
        "similar", "necessary", "required", "significant", "overall", "direct", "indirect",
        "physical", "virtual", "digital", "natural", "human", "social", "economic", "modern",
    ])
});

/// Base forms; inflections are recognised by `is_known_verb`.
static VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "require", "use", "provide", "allow", "make", "take", "give", "show", "help", "include",
        "contain", "consist", "depend", "increase", "decrease", "improve", "reduce", "cause",
        "lead", "produce", "create", "store", "run", "perform", "support", "enable", "become",
        "remain", "mean", "refer", "describe", "explain", "define", "represent", "occur",
        "happen", "involve", "affect", "determine", "control", "manage", "handle", "convert",
        "change", "move", "read", "write", "send", "receive", "return", "call", "work", "exist",
        "need", "keep", "start", "stop", "end", "follow", "apply", "combine", "connect",
        "consume", "measure", "protect", "prevent", "ensure", "get", "set", "put", "let", "see",
        "know", "think", "find", "tell", "ask", "try", "leave", "feel", "seem", "bring", "begin",
        "grow", "build", "develop", "allocate", "execute", "access", "transfer", "generate",
        "identify", "maintain", "replace", "remove", "add", "compare", "select", "load", "save",
        "share", "limit", "operate", "transmit", "encrypt", "decrypt", "compute", "calculate",
        "relate", "form", "play", "hold", "lose", "gain", "rely", "differ", "vary", "belong",
        "serve", "act", "reach", "offer", "obtain", "achieve", "schedule",
    ])
});

/// Nouns that a suffix rule would otherwise tag as adjectives or adverbs.
static SUFFIX_EXCEPTIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    set(&[
        "drive", "archive", "objective", "executive", "alternative", "initiative", "motive",
        "incentive", "directive", "representative", "family", "supply", "assembly", "reply",
        "anomaly", "monopoly", "ally", "table", "cable", "variable", "vegetable", "bible",
        "fable", "label", "daily", "rally", "italy",
    ])
});

fn is_number(word: &str) -> bool {
    const NUMBER_WORDS: &[&str] = &[
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "hundred", "thousand", "million", "billion",
    ];
    word.chars().all(|c| c.is_ascii_digit()) || NUMBER_WORDS.contains(&word)
}

fn is_known_verb(word: &str) -> bool {
    if VERBS.contains(word) {
        return true;
    }
    let mut candidates: Vec<String> = Vec::new();
    for suffix in ["es", "s", "ed", "d", "ing"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            candidates.push(stem.to_string());
            if suffix == "ing" {
                candidates.push(format!("{}e", stem));
            }
        }
    }
    for (suffix, replacement) in [("ies", "y"), ("ied", "y")] {
        if let Some(stem) = word.strip_suffix(suffix) {
            candidates.push(format!("{}{}", stem, replacement));
        }
    }
    candidates
        .iter()
        .any(|c| c.len() > 1 && VERBS.contains(c.as_str()))
}

fn has_adjective_suffix(word: &str) -> bool {
    const SUFFIXES: &[&str] = &["ous", "ful", "ible", "able", "ical", "less", "ive"];
    word.len() > 4
        && !SUFFIX_EXCEPTIONS.contains(word)
        && SUFFIXES.iter().any(|s| word.ends_with(s))
}

fn is_word(token: &str) -> bool {
    token.chars().any(|c| c.is_alphanumeric())
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_acronym(token: &str) -> bool {
    token.chars().count() >= 2
        && token.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
        && token.chars().any(|c| c.is_uppercase())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    fn tag_one(&self, token: &str, index: usize, prev: Option<Pos>) -> Pos {
        if !is_word(token) {
            return Pos::Punct;
        }
        let lower = token.to_lowercase();
        let word = lower.as_str();

        if is_number(word) {
            return Pos::Number;
        }
        if is_acronym(token) {
            return Pos::ProperNoun;
        }
        if DETERMINERS.contains(word) {
            return Pos::Determiner;
        }
        if PRONOUNS.contains(word) {
            return Pos::Pronoun;
        }
        if AUXILIARIES.contains(word) {
            return Pos::Auxiliary;
        }
        if PREPOSITIONS.contains(word) {
            return Pos::Preposition;
        }
        if CONJUNCTIONS.contains(word) {
            return Pos::Conjunction;
        }
        if ADVERBS.contains(word) {
            return Pos::Adverb;
        }
        if ADJECTIVES.contains(word) {
            return Pos::Adjective;
        }

        let after_modifier = matches!(prev, Some(Pos::Determiner) | Some(Pos::Adjective));
        let after_subject = matches!(
            prev,
            Some(Pos::Auxiliary) | Some(Pos::Pronoun) | Some(Pos::Adverb)
        );

        if is_known_verb(word) {
            return if after_modifier { Pos::Noun } else { Pos::Verb };
        }
        if index > 0 && is_capitalized(token) {
            return Pos::ProperNoun;
        }
        if word.len() > 4 && word.ends_with("ly") && !SUFFIX_EXCEPTIONS.contains(word) {
            return Pos::Adverb;
        }
        if has_adjective_suffix(word) {
            return Pos::Adjective;
        }
        if word.len() > 4 && word.ends_with("ed") && !after_modifier {
            return Pos::Verb;
        }
        if word.len() > 5 && word.ends_with("ing") && after_subject {
            return Pos::Verb;
        }
        if word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'') {
            Pos::Noun
        } else if word.chars().any(|c| c.is_alphabetic()) {
            // mixed tokens such as "mp3" or "x86"
            Pos::Noun
        } else {
            Pos::Other
        }
    }
}

impl Tagger for HeuristicTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<Pos> {
        let mut tags = Vec::with_capacity(tokens.len());
        let mut prev = None;
        let mut index = 0;
        for token in tokens {
            let pos = self.tag_one(token, index, prev);
            tags.push(pos);
            if pos != Pos::Punct {
                prev = Some(pos);
                index += 1;
            } else if matches!(*token, ":" | ";" | "\"" | "(") {
                // a capital after these usually starts a new clause
                index = 0;
            }
        }
        retag_present_tense(tokens, &mut tags);
        tags
    }
}

fn looks_like_third_person(word: &str) -> bool {
    word.len() > 3
        && word.ends_with('s')
        && !["ss", "us", "is", "ics"].iter().any(|s| word.ends_with(s))
}

/// An unknown `-s` word between a nominal and the start of an object
/// ("the page table maps each address") is a verb, not a plural noun.
fn retag_present_tense(tokens: &[&str], tags: &mut [Pos]) {
    for i in 1..tokens.len().saturating_sub(1) {
        if tags[i] != Pos::Noun || !tags[i - 1].is_nominal() {
            continue;
        }
        let next_opens_object = matches!(
            tags[i + 1],
            Pos::Determiner | Pos::Pronoun | Pos::Preposition | Pos::Adjective | Pos::Number
        );
        if next_opens_object && looks_like_third_person(&tokens[i].to_lowercase()) {
            tags[i] = Pos::Verb;
        }
    }
}
