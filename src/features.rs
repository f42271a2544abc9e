use serde::Deserialize;

/// Number of audio-feature columns used for ranking.
pub const FEATURE_COUNT: usize = 12;

/// Column order shared by user profiles and the catalog.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
];

/// One row of audio features, in `FEATURE_NAMES` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const ZERO: FeatureVector = FeatureVector([0.0; FEATURE_COUNT]);

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Euclidean distance to another vector.
    pub fn distance(&self, other: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// Audio features as they appear in JSON dumps and API responses.
/// Extra fields (`id`, `uri`, `type`, ...) are ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub key: f64,
    pub loudness: f64,
    pub mode: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub duration_ms: f64,
}

impl From<AudioFeatures> for FeatureVector {
    fn from(f: AudioFeatures) -> Self {
        FeatureVector([
            f.danceability,
            f.energy,
            f.key,
            f.loudness,
            f.mode,
            f.speechiness,
            f.acousticness,
            f.instrumentalness,
            f.liveness,
            f.valence,
            f.tempo,
            f.duration_ms,
        ])
    }
}
