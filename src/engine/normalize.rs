use crate::features::{FEATURE_COUNT, FeatureVector};

/// Min-max scale each column of `table` into [0, 1], fit on `table` alone.
///
/// Columns where every row holds the same value map to 0.0.
/// User profiles and the catalog are scaled separately, so the two spaces
/// line up only approximately.
pub fn normalize(table: &[FeatureVector]) -> Vec<FeatureVector> {
    if table.is_empty() {
        return Vec::new();
    }

    let mut mins = [f64::INFINITY; FEATURE_COUNT];
    let mut maxs = [f64::NEG_INFINITY; FEATURE_COUNT];
    for row in table {
        for (d, &val) in row.values().iter().enumerate() {
            mins[d] = mins[d].min(val);
            maxs[d] = maxs[d].max(val);
        }
    }

    table
        .iter()
        .map(|row| {
            let mut out = [0.0; FEATURE_COUNT];
            for (d, &val) in row.values().iter().enumerate() {
                let span = maxs[d] - mins[d];
                out[d] = if span > 0.0 { (val - mins[d]) / span } else { 0.0 };
            }
            FeatureVector(out)
        })
        .collect()
}
