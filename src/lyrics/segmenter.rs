//! Dictionary-driven noun-phrase chunker.
//!
//! No tagger: a phrase is a run of words between punctuation and common
//! function words (pronouns, auxiliaries, prepositions, fillers). Determiners
//! open a phrase; "of" and coordinating conjunctions stay inside one when
//! content words sit on both sides.

use regex::Regex;
use std::sync::LazyLock;

use super::NlpSegmenter;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("token pattern is valid")
});

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "my", "your", "his", "her", "its", "our", "their", "this", "these",
    "those", "every", "some", "no", "each", "any",
];

const LINKERS: &[&str] = &["of", "and", "or", "but"];

const BREAKERS: &[&str] = &[
    // Pronouns
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself",
    "yourself", "i'm", "you're", "he's", "she's", "it's", "we're", "they're", "i'll",
    "you'll", "we'll", "i've", "you've", "i'd", "you'd", "let's", "that's", "there's",
    // Auxiliaries and everyday verbs
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "don't",
    "doesn't", "didn't", "can", "can't", "could", "couldn't", "will", "won't", "would",
    "wouldn't", "should", "shall", "might", "must", "have", "has", "had", "ain't", "isn't",
    "aren't", "wasn't", "get", "got", "go", "going", "gonna", "wanna", "gotta", "know",
    "want", "need", "feel", "see", "say", "said", "make", "take", "come", "let", "tell",
    "give", "keep",
    // Prepositions
    "in", "on", "at", "to", "from", "with", "for", "by", "into", "onto", "over", "under",
    "through", "about", "like", "up", "down", "out", "off", "away", "around", "without",
    "across", "till", "until", "'til",
    // Adverbs, wh-words, fillers
    "not", "never", "just", "so", "too", "very", "now", "then", "when", "where", "why",
    "how", "what", "who", "there", "here", "if", "that", "than", "as", "because", "'cause",
    "cause", "yeah", "oh", "ooh", "whoa", "hey", "na", "la", "uh", "ah", "still", "again",
    "ever", "always", "only", "really", "all",
];

fn word_key(word: &str) -> String {
    word.to_lowercase().replace('’', "'")
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WordClass {
    Determiner,
    Linker,
    Breaker,
    Content,
}

fn classify(token: &str) -> WordClass {
    if !token.chars().any(|c| c.is_alphanumeric()) {
        return WordClass::Breaker;
    }
    let key = word_key(token);
    let key = key.as_str();
    if DETERMINERS.contains(&key) {
        WordClass::Determiner
    } else if LINKERS.contains(&key) {
        WordClass::Linker
    } else if BREAKERS.contains(&key) {
        WordClass::Breaker
    } else {
        WordClass::Content
    }
}

/// Default segmenter for the CLI; swap in a real tagger through `NlpSegmenter`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicSegmenter;

#[derive(Default)]
struct PhraseBuilder<'a> {
    words: Vec<(&'a str, WordClass)>,
    pending: Option<&'a str>,
    phrases: Vec<String>,
}

impl<'a> PhraseBuilder<'a> {
    fn has_content(&self) -> bool {
        self.words.iter().any(|(_, c)| *c == WordClass::Content)
    }

    fn flush(&mut self) {
        self.pending = None;
        while matches!(
            self.words.last(),
            Some((_, WordClass::Determiner | WordClass::Linker))
        ) {
            self.words.pop();
        }
        if self.has_content() {
            let phrase: Vec<&str> = self.words.iter().map(|(w, _)| *w).collect();
            self.phrases.push(phrase.join(" "));
        }
        self.words.clear();
    }

    fn push(&mut self, token: &'a str) {
        match classify(token) {
            WordClass::Breaker => self.flush(),
            WordClass::Determiner => {
                // "king of the road" stays whole
                if self.pending.is_some_and(|p| word_key(p) == "of") {
                    let of = self.pending.take().unwrap_or(token);
                    self.words.push((of, WordClass::Linker));
                } else {
                    self.flush();
                }
                self.words.push((token, WordClass::Determiner));
            }
            WordClass::Linker => {
                let after_content =
                    matches!(self.words.last(), Some((_, WordClass::Content)));
                if after_content && self.pending.is_none() {
                    self.pending = Some(token);
                } else {
                    self.flush();
                }
            }
            WordClass::Content => {
                if let Some(linker) = self.pending.take() {
                    self.words.push((linker, WordClass::Linker));
                }
                self.words.push((token, WordClass::Content));
            }
        }
    }
}

impl NlpSegmenter for HeuristicSegmenter {
    fn segment_noun_phrases(&self, text: &str) -> Vec<String> {
        let mut builder = PhraseBuilder::default();
        for token in TOKEN_RE.find_iter(text) {
            builder.push(token.as_str());
        }
        builder.flush();
        builder.phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(text: &str) -> Vec<String> {
        HeuristicSegmenter.segment_noun_phrases(text)
    }

    #[test]
    fn test_long_phrase_kept_whole() {
        assert_eq!(
            chunks("the lonely road of endless summer nights"),
            vec!["the lonely road of endless summer nights"]
        );
    }

    #[test]
    fn test_determiner_splits_coordination() {
        assert_eq!(chunks("Oh, the sun and the moon."), vec!["the sun", "the moon"]);
    }

    #[test]
    fn test_conjunction_between_content_words() {
        assert_eq!(chunks("salt and pepper"), vec!["salt and pepper"]);
    }

    #[test]
    fn test_of_the_joins() {
        assert_eq!(
            chunks("I'm in love with the king of the road"),
            vec!["love", "the king of the road"]
        );
    }

    #[test]
    fn test_trailing_linker_dropped() {
        assert_eq!(chunks("the end of"), vec!["the end"]);
    }

    #[test]
    fn test_function_words_only() {
        assert!(chunks("and the").is_empty());
        assert!(chunks("oh yeah, I know you can").is_empty());
        assert!(chunks("").is_empty());
    }

    #[test]
    fn test_curly_apostrophe_pronoun_breaks() {
        assert_eq!(chunks("cold coffee I’m drinking"), vec!["cold coffee", "drinking"]);
    }
}
