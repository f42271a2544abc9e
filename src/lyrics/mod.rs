pub mod lrclib;
pub mod segmenter;

pub use lrclib::LrclibClient;
pub use segmenter::HeuristicSegmenter;

/// Splits text into noun-phrase spans.
pub trait NlpSegmenter {
    fn segment_noun_phrases(&self, text: &str) -> Vec<String>;
}

/// Source of raw lyric texts for `(artist, track)` pairs.
///
/// May return fewer texts than requested; tracks without lyrics are skipped.
pub trait LyricProvider {
    fn fetch_lyrics(&self, queries: &[(String, String)]) -> Vec<String>;
}

/// Collapse line breaks to spaces and trim the ends.
pub fn clean_lyric(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// All noun phrases from every lyric text, in encounter order.
pub fn extract_chunks<S: NlpSegmenter + ?Sized>(corpus: &[String], segmenter: &S) -> Vec<String> {
    corpus
        .iter()
        .map(|raw| clean_lyric(raw))
        .filter(|text| !text.is_empty())
        .flat_map(|text| segmenter.segment_noun_phrases(&text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records what it was asked to segment, returns each text's words as phrases.
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<String>>,
    }

    impl NlpSegmenter for Recorder {
        fn segment_noun_phrases(&self, text: &str) -> Vec<String> {
            self.seen.borrow_mut().push(text.to_string());
            text.split_whitespace().map(str::to_string).collect()
        }
    }

    #[test]
    fn test_clean_lyric() {
        assert_eq!(clean_lyric("  line one\nline two\r\nthree\n"), "line one line two three");
        assert_eq!(clean_lyric("\n\n"), "");
    }

    #[test]
    fn test_extract_flattens_in_order() {
        let seg = Recorder::default();
        let corpus = vec!["a b\nc".to_string(), "d".to_string()];
        let chunks = extract_chunks(&corpus, &seg);
        assert_eq!(chunks, vec!["a", "b", "c", "d"]);
        assert_eq!(*seg.seen.borrow(), vec!["a b c", "d"]);
    }

    #[test]
    fn test_empty_corpus_gives_no_chunks() {
        let seg = Recorder::default();
        assert!(extract_chunks(&[], &seg).is_empty());
        assert!(seg.seen.borrow().is_empty());
    }

    #[test]
    fn test_blank_lyrics_skipped() {
        let seg = Recorder::default();
        let corpus = vec!["   \n ".to_string(), "hello there".to_string()];
        assert_eq!(extract_chunks(&corpus, &seg), vec!["hello", "there"]);
        assert_eq!(seg.seen.borrow().len(), 1);
    }
}
