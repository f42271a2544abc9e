use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::Deserialize;

use crate::db::Database;
use crate::features::{AudioFeatures, FeatureVector};

/// One song in the reference catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Credited artists, primary first.
    pub artists: Vec<String>,
    pub features: FeatureVector,
}

impl CatalogEntry {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

/// `artists` is a list literal string in the usual dataset dumps
/// (`"['Frank Sinatra', 'Count Basie']"`) but a real array in some exports.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtistsField {
    List(Vec<String>),
    Literal(String),
}

impl ArtistsField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(list) => list,
            Self::Literal(raw) => parse_artists(&raw),
        }
    }
}

/// A catalog row as found in the JSON dump.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    artists: ArtistsField,
    #[serde(flatten)]
    features: AudioFeatures,
}

// Single- or double-quoted items with backslash escapes
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#).expect("quoted item pattern is valid")
});

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a list-literal artist string into names.
///
/// A bare, unquoted name is returned as a single-element list.
pub fn parse_artists(raw: &str) -> Vec<String> {
    let quoted: Vec<String> = QUOTED_RE
        .captures_iter(raw)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|m| unescape(m.as_str()))
        .collect();

    if !quoted.is_empty() {
        return quoted;
    }

    let bare = raw.trim().trim_start_matches('[').trim_end_matches(']').trim();
    if bare.is_empty() {
        Vec::new()
    } else {
        vec![bare.to_string()]
    }
}

/// Parse a JSON catalog dump, keeping file order. Rows with non-finite features are dropped.
pub fn parse_catalog_json(contents: &str) -> Result<Vec<CatalogEntry>> {
    let rows: Vec<CatalogRow> =
        serde_json::from_str(contents).context("Catalog is not a JSON array of tracks")?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let features = FeatureVector::from(row.features);
        if !features.is_finite() {
            log::warn!("Skipping {} ({}): non-finite audio features", row.name, row.id);
            continue;
        }
        entries.push(CatalogEntry {
            id: row.id,
            name: row.name,
            artists: row.artists.into_vec(),
            features,
        });
    }
    Ok(entries)
}

/// Replace the stored catalog with the contents of a JSON dump.
pub fn import_json(db: &Database, path: &Path) -> Result<usize> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message(format!("Reading {}", path.display()));
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    pb.set_message("Parsing catalog");
    let entries = parse_catalog_json(&contents)?;

    pb.set_message(format!("Storing {} tracks", entries.len()));
    let stored = db.replace_catalog(&entries).context("Failed to store catalog")?;

    pb.finish_and_clear();
    log::info!("Imported {stored} catalog tracks from {}", path.display());
    Ok(stored)
}
