use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::LyricProvider;
use crate::config::LyricsConfig;

/// LRCLIB `/api/get` response (partial, we only need plain lyrics).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrclibTrack {
    #[serde(default)]
    instrumental: bool,
    plain_lyrics: Option<String>,
}

impl LrclibTrack {
    fn into_lyrics(self) -> Option<String> {
        if self.instrumental {
            return None;
        }
        self.plain_lyrics.filter(|l| !l.trim().is_empty())
    }
}

/// Blocking LRCLIB client.
pub struct LrclibClient {
    agent: ureq::Agent,
    config: LyricsConfig,
}

impl LrclibClient {
    pub fn new(config: LyricsConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .user_agent(concat!("moodswing/", env!("CARGO_PKG_VERSION")))
            .build()
            .into();
        Self { agent, config }
    }

    /// Look up lyrics for one track. `Ok(None)` when the API has none.
    pub fn lookup(&self, artist: &str, track: &str) -> Result<Option<String>> {
        let url = format!("{}/api/get", self.config.base_url.trim_end_matches('/'));
        log::debug!("Fetching {url} for {artist} - {track}");

        let response = self
            .agent
            .get(&url)
            .query("artist_name", artist)
            .query("track_name", track)
            .call();

        let track_info: LrclibTrack = match response {
            Ok(mut resp) => resp
                .body_mut()
                .read_json()
                .with_context(|| format!("Failed to parse lyrics for {artist} - {track}"))?,
            Err(ureq::Error::StatusCode(404)) => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("HTTP request failed for {artist} - {track}"));
            }
        };

        Ok(track_info.into_lyrics())
    }
}

impl LyricProvider for LrclibClient {
    fn fetch_lyrics(&self, queries: &[(String, String)]) -> Vec<String> {
        collect_lyrics(queries, &self.config, |artist, track| self.lookup(artist, track))
    }
}

/// Run `lookup` over each (artist, track) query in order, keeping the hits.
/// Failed lookups are logged and skipped.
fn collect_lyrics<F>(
    queries: &[(String, String)],
    config: &LyricsConfig,
    mut lookup: F,
) -> Vec<String>
where
    F: FnMut(&str, &str) -> Result<Option<String>>,
{
    let mut lyrics = Vec::new();

    for (i, (artist, track)) in queries.iter().enumerate() {
        if i > 0 && config.rate_limit_ms > 0 {
            thread::sleep(Duration::from_millis(config.rate_limit_ms));
        }

        match lookup(artist, track) {
            Ok(Some(text)) => {
                log::info!("Found lyrics for {artist} - {track}");
                lyrics.push(text);
            }
            Ok(None) => log::info!("No lyrics for {artist} - {track}"),
            Err(e) => log::warn!("Lyric lookup failed: {e:#}"),
        }

        if config.stop_after_first && !lyrics.is_empty() {
            log::debug!("Stopping after first lyrics found");
            break;
        }
    }

    lyrics
}
