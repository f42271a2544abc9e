use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::features::{AudioFeatures, FeatureVector};

/// Either a bare array or the `{"audio_features": [...]}` API envelope.
/// Tracks the API has no features for come back as `null`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfileFile {
    Envelope { audio_features: Vec<Option<AudioFeatures>> },
    Bare(Vec<Option<AudioFeatures>>),
}

/// Parse the user's top-track audio features.
pub fn parse_profile(contents: &str) -> Result<Vec<FeatureVector>> {
    let file: ProfileFile =
        serde_json::from_str(contents).context("Profile is not a list of audio features")?;
    let rows = match file {
        ProfileFile::Envelope { audio_features } => audio_features,
        ProfileFile::Bare(rows) => rows,
    };

    let total = rows.len();
    let vectors: Vec<FeatureVector> = rows
        .into_iter()
        .flatten()
        .map(FeatureVector::from)
        .filter(FeatureVector::is_finite)
        .collect();

    if vectors.len() < total {
        log::warn!("Skipped {} profile tracks without usable features", total - vectors.len());
    }
    Ok(vectors)
}

/// Load the user's top-track audio features from a JSON file.
pub fn load_profile(path: &Path) -> Result<Vec<FeatureVector>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let vectors = parse_profile(&contents)
        .with_context(|| format!("Failed to parse profile {}", path.display()))?;
    log::info!("Loaded {} profile tracks from {}", vectors.len(), path.display());
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRACK: &str = r#"{"danceability": 0.5, "energy": 0.6, "key": 1, "loudness": -7,
        "mode": 0, "speechiness": 0.05, "acousticness": 0.1, "instrumentalness": 0,
        "liveness": 0.1, "valence": 0.4, "tempo": 128, "duration_ms": 200000,
        "id": "abc", "uri": "spotify:track:abc"}"#;

    #[test]
    fn test_parse_bare_array() {
        let v = parse_profile(&format!("[{TRACK}, {TRACK}]")).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].0[10], 128.0);
    }

    #[test]
    fn test_parse_envelope_skips_nulls() {
        let v = parse_profile(&format!(r#"{{"audio_features": [{TRACK}, null]}}"#)).unwrap();
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_profile(r#"{"tracks": 3}"#).is_err());
    }

    #[test]
    fn test_load_profile_without_features_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[null]").unwrap();
        assert!(load_profile(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_profile_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{TRACK}]").unwrap();
        assert_eq!(load_profile(file.path()).unwrap().len(), 1);
    }
}
