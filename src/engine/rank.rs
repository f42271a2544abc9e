use super::{EngineError, RECOMMENDATION_COUNT, Result};
use crate::features::{FEATURE_COUNT, FeatureVector};

/// Every catalog index, nearest to the user's reference vector first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedOrder {
    /// Catalog indices in ranked order.
    pub order: Vec<usize>,
    /// Distance for each entry of `order` (same position).
    pub distances: Vec<f64>,
}

impl RankedOrder {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(catalog_index, distance)` nearest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, f64)> + '_ {
        self.order.iter().copied().zip(self.distances.iter().copied())
    }
}

/// Arithmetic mean of each column.
pub fn reference_vector(user: &[FeatureVector]) -> Result<FeatureVector> {
    if user.is_empty() {
        return Err(EngineError::EmptyUserProfile);
    }

    let mut means = [0.0_f64; FEATURE_COUNT];
    for vec in user {
        for (d, &val) in vec.values().iter().enumerate() {
            means[d] += val;
        }
    }
    for m in &mut means {
        *m /= user.len() as f64;
    }
    Ok(FeatureVector(means))
}

/// Rank the whole catalog by Euclidean distance to the mean user vector.
///
/// Both tables are expected to be normalized already. Ties keep catalog order.
pub fn rank(user: &[FeatureVector], catalog: &[FeatureVector]) -> Result<RankedOrder> {
    if user.is_empty() {
        return Err(EngineError::EmptyUserProfile);
    }
    if catalog.len() < RECOMMENDATION_COUNT {
        return Err(EngineError::InsufficientCatalog {
            rows: catalog.len(),
            required: RECOMMENDATION_COUNT,
        });
    }

    let reference = reference_vector(user)?;

    let mut distances: Vec<(usize, f64)> = catalog
        .iter()
        .enumerate()
        .map(|(i, row)| (i, reference.distance(row)))
        .collect();

    // Stable sort on an index-ordered vec keeps ties in catalog order
    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    let (order, distances) = distances.into_iter().unzip();
    Ok(RankedOrder { order, distances })
}
