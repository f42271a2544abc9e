use super::{Database, Result};
use crate::catalog::CatalogEntry;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

impl Database {
    /// Replace the whole catalog in a single transaction. Positions follow slice order.
    pub fn replace_catalog(&self, entries: &[CatalogEntry]) -> Result<usize> {
        let columns = FEATURE_NAMES.join(", ");
        let placeholders: Vec<String> = (1..=FEATURE_COUNT + 4).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO catalog (position, track_id, name, artists, {columns})
             VALUES ({})",
            placeholders.join(", ")
        );

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM catalog", [])?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (position, entry) in entries.iter().enumerate() {
                let mut values: Vec<Value> = vec![
                    Value::Integer(position as i64),
                    Value::Text(entry.id.clone()),
                    Value::Text(entry.name.clone()),
                    Value::Text(serde_json::to_string(&entry.artists)?),
                ];
                values.extend(entry.features.values().iter().map(|&v| Value::Real(v)));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        log::debug!("Stored {} catalog rows", entries.len());
        Ok(entries.len())
    }

    /// Load the catalog in dataset order.
    pub fn load_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let columns = FEATURE_NAMES.join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT track_id, name, artists, {columns} FROM catalog ORDER BY position"
        ))?;

        let rows = stmt
            .query_map([], |row| {
                let mut features = [0.0; FEATURE_COUNT];
                for (d, f) in features.iter_mut().enumerate() {
                    *f = row.get(3 + d)?;
                }
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    FeatureVector(features),
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for (id, name, artists, features) in rows {
            entries.push(CatalogEntry {
                id,
                name,
                artists: serde_json::from_str(&artists)?,
                features,
            });
        }
        Ok(entries)
    }

    pub fn catalog_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM catalog", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(i: usize) -> CatalogEntry {
        let mut f = [0.0; FEATURE_COUNT];
        for (d, v) in f.iter_mut().enumerate() {
            *v = (i * 100 + d) as f64 + 0.5;
        }
        CatalogEntry {
            id: format!("track{i}"),
            name: format!("Song {i}"),
            artists: vec![format!("Artist {i}"), "Guest".to_string()],
            features: FeatureVector(f),
        }
    }

    #[test]
    fn test_replace_and_load_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let entries: Vec<_> = (0..5).map(entry).collect();
        assert_eq!(db.replace_catalog(&entries).unwrap(), 5);
        assert_eq!(db.load_catalog().unwrap(), entries);
    }

    #[test]
    fn test_load_preserves_dataset_order() {
        let db = Database::open_in_memory().unwrap();
        let entries: Vec<_> = [3, 1, 4, 0, 2].into_iter().map(entry).collect();
        db.replace_catalog(&entries).unwrap();
        let ids: Vec<String> = db.load_catalog().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["track3", "track1", "track4", "track0", "track2"]);
    }

    #[test]
    fn test_replace_drops_previous_rows() {
        let db = Database::open_in_memory().unwrap();
        db.replace_catalog(&(0..8).map(entry).collect::<Vec<_>>()).unwrap();
        db.replace_catalog(&[entry(42)]).unwrap();
        assert_eq!(db.catalog_count().unwrap(), 1);
        assert_eq!(db.load_catalog().unwrap()[0].id, "track42");
    }

    #[test]
    fn test_duplicate_track_id_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        db.replace_catalog(&[entry(1)]).unwrap();
        assert!(db.replace_catalog(&[entry(2), entry(2)]).is_err());
        // Failed import leaves the old catalog in place
        assert_eq!(db.load_catalog().unwrap()[0].id, "track1");
    }
}
