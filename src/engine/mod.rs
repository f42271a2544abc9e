pub mod normalize;
pub mod rank;
pub mod select;

use rand::Rng;
use thiserror::Error;

use crate::catalog::CatalogEntry;
use crate::config::{NamingConfig, RecommendationConfig};
use crate::features::FeatureVector;
use crate::lyrics::{self, NlpSegmenter};
use crate::naming;

pub use rank::RankedOrder;
pub use select::{Mode, Recommendation, Selection};

/// Tracks per recommended playlist.
pub const RECOMMENDATION_COUNT: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("catalog has {rows} rows, need at least {required}")]
    InsufficientCatalog { rows: usize, required: usize },
    #[error("selection pool has {available} positions, need at least {required}")]
    InsufficientPoolSize { available: usize, required: usize },
    #[error("no lyric phrases long enough to name a playlist")]
    NoNamingCandidates,
    #[error("user profile has no feature vectors")]
    EmptyUserProfile,
    #[error("ranking covers {ranked} rows but the catalog has {catalog}")]
    RankingMismatch { ranked: usize, catalog: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// One recommendation request's worth of machinery: settings plus the
/// phrase segmenter, built once at startup and reused.
pub struct PlaylistEngine<S> {
    pub recommend: RecommendationConfig,
    pub naming: NamingConfig,
    segmenter: S,
}

impl<S: NlpSegmenter> PlaylistEngine<S> {
    pub fn new(recommend: RecommendationConfig, naming: NamingConfig, segmenter: S) -> Self {
        Self {
            recommend,
            naming,
            segmenter,
        }
    }

    /// Normalize both tables, rank the catalog against the user's mean vector.
    pub fn rank(&self, user: &[FeatureVector], catalog: &[CatalogEntry]) -> Result<RankedOrder> {
        let user = normalize::normalize(user);
        let features: Vec<FeatureVector> = catalog.iter().map(|e| e.features).collect();
        let catalog_normed = normalize::normalize(&features);

        log::debug!(
            "Ranking {} catalog entries against {} profile tracks",
            catalog.len(),
            user.len()
        );
        rank::rank(&user, &catalog_normed)
    }

    /// Rank and draw ten picks for `mode`.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        user: &[FeatureVector],
        catalog: &[CatalogEntry],
        mode: Mode,
        rng: &mut R,
    ) -> Result<Selection> {
        let ranked = self.rank(user, catalog)?;
        let selection = select::select(&ranked, mode, catalog, &self.recommend, rng)?;
        log::info!("Generated {} playlist of {} tracks", mode, selection.picks.len());
        Ok(selection)
    }

    /// Extract phrases from the lyrics and pick a playlist name.
    pub fn name_playlist<R: Rng + ?Sized>(&self, corpus: &[String], rng: &mut R) -> Result<String> {
        let chunks = lyrics::extract_chunks(corpus, &self.segmenter);
        log::debug!("{} lyric texts yielded {} phrases", corpus.len(), chunks.len());
        naming::choose_playlist_name(&chunks, &self.naming, rng)
    }
}
