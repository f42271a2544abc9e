use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::rank::RankedOrder;
use super::{EngineError, RECOMMENDATION_COUNT, Result};
use crate::catalog::CatalogEntry;
use crate::config::RecommendationConfig;

/// Which end of the ranking to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Near neighbours ("good" playlist).
    Similar,
    /// Far neighbours ("bad" playlist).
    Dissimilar,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Similar => "good",
            Self::Dissimilar => "bad",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "good" | "similar" => Ok(Self::Similar),
            "bad" | "dissimilar" => Ok(Self::Dissimilar),
            other => Err(format!("unknown mode '{other}' (expected good or bad)")),
        }
    }
}

/// One recommended track.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub catalog_index: usize,
    pub name: String,
    pub id: String,
    /// First listed artist only.
    pub primary_artist: String,
}

/// The drawn recommendations, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub mode: Mode,
    pub picks: Vec<Recommendation>,
}

impl Selection {
    pub fn names(&self) -> Vec<&str> {
        self.picks.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.picks.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn artists(&self) -> Vec<&str> {
        self.picks.iter().map(|p| p.primary_artist.as_str()).collect()
    }

    /// `(artist, track)` pairs for lyric lookups.
    pub fn lyric_queries(&self) -> Vec<(String, String)> {
        self.picks
            .iter()
            .map(|p| (p.primary_artist.clone(), p.name.clone()))
            .collect()
    }
}

/// Range of ranked positions a mode may draw from, clamped to the ranking length.
pub fn pool_range(ranked_len: usize, mode: Mode, config: &RecommendationConfig) -> std::ops::Range<usize> {
    match mode {
        Mode::Similar => 0..config.similar_pool.min(ranked_len),
        Mode::Dissimilar => ranked_len - config.dissimilar_pool.min(ranked_len)..ranked_len,
    }
}

/// Draw `RECOMMENDATION_COUNT` distinct entries from the mode's end of the ranking.
/// `ranked` must have been computed over `catalog`; a length mismatch is an error.
pub fn select<R: Rng + ?Sized>(
    ranked: &RankedOrder,
    mode: Mode,
    catalog: &[CatalogEntry],
    config: &RecommendationConfig,
    rng: &mut R,
) -> Result<Selection> {
    if catalog.len() < RECOMMENDATION_COUNT {
        return Err(EngineError::InsufficientCatalog {
            rows: catalog.len(),
            required: RECOMMENDATION_COUNT,
        });
    }
    if ranked.len() != catalog.len() {
        return Err(EngineError::RankingMismatch {
            ranked: ranked.len(),
            catalog: catalog.len(),
        });
    }

    let pool = pool_range(ranked.len(), mode, config);
    if pool.len() < RECOMMENDATION_COUNT {
        return Err(EngineError::InsufficientPoolSize {
            available: pool.len(),
            required: RECOMMENDATION_COUNT,
        });
    }

    log::debug!(
        "Drawing {} {} picks from ranked positions {}..{}",
        RECOMMENDATION_COUNT,
        mode,
        pool.start,
        pool.end
    );

    let picks = rand::seq::index::sample(rng, pool.len(), RECOMMENDATION_COUNT)
        .into_iter()
        .map(|offset| {
            let idx = ranked.order[pool.start + offset];
            let entry = &catalog[idx];
            Recommendation {
                catalog_index: idx,
                name: entry.name.clone(),
                id: entry.id.clone(),
                primary_artist: entry.primary_artist().unwrap_or_default().to_string(),
            }
        })
        .collect();

    Ok(Selection { mode, picks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn make_catalog(n: usize) -> Vec<CatalogEntry> {
        (0..n)
            .map(|i| CatalogEntry {
                id: format!("id{i}"),
                name: format!("Song {i}"),
                artists: vec![format!("Artist {i}"), "Featured Guest".to_string()],
                features: FeatureVector::ZERO,
            })
            .collect()
    }

    /// Ranking that is the catalog reversed, so position p holds index n-1-p.
    fn reversed(n: usize) -> RankedOrder {
        RankedOrder {
            order: (0..n).rev().collect(),
            distances: (0..n).map(|p| p as f64).collect(),
        }
    }

    fn ranked_positions(ranked: &RankedOrder, sel: &Selection) -> Vec<usize> {
        sel.picks
            .iter()
            .map(|p| ranked.order.iter().position(|&i| i == p.catalog_index).unwrap())
            .collect()
    }

    #[test]
    fn test_similar_draws_from_head() {
        let catalog = make_catalog(500);
        let ranked = reversed(500);
        let config = RecommendationConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let sel = select(&ranked, Mode::Similar, &catalog, &config, &mut rng).unwrap();
            assert_eq!(sel.picks.len(), 10);
            let positions = ranked_positions(&ranked, &sel);
            assert!(positions.iter().all(|&p| p < 100));
            let distinct: HashSet<_> = sel.picks.iter().map(|p| p.catalog_index).collect();
            assert_eq!(distinct.len(), 10);
        }
    }

    #[test]
    fn test_dissimilar_draws_from_tail() {
        let catalog = make_catalog(500);
        let ranked = reversed(500);
        let config = RecommendationConfig::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let sel = select(&ranked, Mode::Dissimilar, &catalog, &config, &mut rng).unwrap();
            assert_eq!(sel.picks.len(), 10);
            let positions = ranked_positions(&ranked, &sel);
            assert!(positions.iter().all(|&p| p >= 200));
            let distinct: HashSet<_> = sel.picks.iter().map(|p| p.catalog_index).collect();
            assert_eq!(distinct.len(), 10);
        }
    }

    #[test]
    fn test_small_catalog_clamps_pool() {
        let catalog = make_catalog(12);
        let ranked = reversed(12);
        let config = RecommendationConfig::default();
        assert_eq!(pool_range(12, Mode::Similar, &config), 0..12);
        assert_eq!(pool_range(12, Mode::Dissimilar, &config), 0..12);

        let mut rng = StdRng::seed_from_u64(3);
        let sel = select(&ranked, Mode::Dissimilar, &catalog, &config, &mut rng).unwrap();
        let distinct: HashSet<_> = sel.picks.iter().map(|p| p.catalog_index).collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn test_parallel_sequences_and_primary_artist() {
        let catalog = make_catalog(20);
        let ranked = reversed(20);
        let mut rng = StdRng::seed_from_u64(1);
        let sel = select(&ranked, Mode::Similar, &catalog, &RecommendationConfig::default(), &mut rng)
            .unwrap();

        let names = sel.names();
        let ids = sel.ids();
        let artists = sel.artists();
        assert_eq!(names.len(), 10);
        for (i, pick) in sel.picks.iter().enumerate() {
            assert_eq!(names[i], format!("Song {}", pick.catalog_index));
            assert_eq!(ids[i], format!("id{}", pick.catalog_index));
            assert_eq!(artists[i], format!("Artist {}", pick.catalog_index));
        }
    }

    #[test]
    fn test_pool_smaller_than_picks_fails() {
        let catalog = make_catalog(50);
        let ranked = reversed(50);
        let config = RecommendationConfig {
            similar_pool: 9,
            dissimilar_pool: 300,
        };
        let mut rng = StdRng::seed_from_u64(0);
        match select(&ranked, Mode::Similar, &catalog, &config, &mut rng) {
            Err(EngineError::InsufficientPoolSize { available, required }) => {
                assert_eq!(available, 9);
                assert_eq!(required, 10);
            }
            other => panic!("expected InsufficientPoolSize, got {other:?}"),
        }
    }

    #[test]
    fn test_ranking_from_other_catalog_is_rejected() {
        let catalog = make_catalog(20);
        let ranked = reversed(50);
        let mut rng = StdRng::seed_from_u64(4);
        let err = select(&ranked, Mode::Dissimilar, &catalog, &RecommendationConfig::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, EngineError::RankingMismatch { ranked: 50, catalog: 20 });
    }

    #[test]
    fn test_same_seed_same_picks() {
        let catalog = make_catalog(400);
        let ranked = reversed(400);
        let config = RecommendationConfig::default();
        let a = select(&ranked, Mode::Dissimilar, &catalog, &config, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = select(&ranked, Mode::Dissimilar, &catalog, &config, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("good".parse::<Mode>().unwrap(), Mode::Similar);
        assert_eq!("BAD".parse::<Mode>().unwrap(), Mode::Dissimilar);
        assert_eq!("dissimilar".parse::<Mode>().unwrap(), Mode::Dissimilar);
        assert!("meh".parse::<Mode>().is_err());
    }
}
