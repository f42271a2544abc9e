use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::NamingConfig;
use crate::engine::{EngineError, Result};

/// Upper-case the first letter of every word, lower-case the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-word match after trimming punctuation, so "orange" is not "or".
fn is_conjunction(word: &str, config: &NamingConfig) -> bool {
    let bare = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    config.conjunctions.iter().any(|c| c.eq_ignore_ascii_case(&bare))
}

/// Whether a phrase can ever produce a name.
fn is_eligible(words: &[&str], config: &NamingConfig) -> bool {
    if words.len() < config.min_words {
        return false;
    }
    if words.len() <= config.max_whole_words {
        return true;
    }
    // Long phrases need two non-conjunctions to form the pair
    words.iter().filter(|w| !is_conjunction(w, config)).count() >= 2
}

/// Pick two distinct words (in sampled order) that neither start nor end on a conjunction.
fn two_word_name<R: Rng + ?Sized>(words: &[&str], config: &NamingConfig, rng: &mut R) -> Option<String> {
    let usable: Vec<usize> = (0..words.len())
        .filter(|&i| !is_conjunction(words[i], config))
        .collect();

    let pairs: Vec<(usize, usize)> = usable
        .iter()
        .flat_map(|&i| usable.iter().filter(move |&&j| j != i).map(move |&j| (i, j)))
        .collect();

    pairs
        .choose(rng)
        .map(|&(i, j)| format!("{} {}", words[i], words[j]))
}

/// Choose a playlist name from lyric phrases.
///
/// A phrase of at least `min_words` words is drawn uniformly. Up to
/// `max_whole_words` words it is used as is; longer phrases are cut to two
/// randomly sampled words. The result is title-cased.
pub fn choose_playlist_name<R: Rng + ?Sized>(
    chunks: &[String],
    config: &NamingConfig,
    rng: &mut R,
) -> Result<String> {
    let candidates: Vec<Vec<&str>> = chunks
        .iter()
        .map(|c| c.split_whitespace().collect::<Vec<_>>())
        .filter(|words| is_eligible(words, config))
        .collect();

    log::debug!(
        "{} of {} phrases are long enough to name a playlist",
        candidates.len(),
        chunks.len()
    );

    let words = candidates.choose(rng).ok_or(EngineError::NoNamingCandidates)?;

    let name = if words.len() > config.max_whole_words {
        two_word_name(words, config, rng).ok_or(EngineError::NoNamingCandidates)?
    } else {
        words.join(" ")
    };

    Ok(title_case(&name))
}
