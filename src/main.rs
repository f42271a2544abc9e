use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moodswing::catalog::CatalogEntry;
use moodswing::db::Database;
use moodswing::engine::{EngineError, Mode, PlaylistEngine, Selection};
use moodswing::lyrics::{HeuristicSegmenter, LrclibClient, LyricProvider};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moodswing", version, about = "Good/bad playlist recommender")]
struct Cli {
    /// Path to the SQLite catalog database
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the song catalog with a JSON dump
    Import {
        /// JSON array of tracks with id, name, artists and audio features
        path: PathBuf,
    },

    /// Rank the catalog against a listening profile
    Rank {
        /// JSON file of the user's top-track audio features
        #[arg(short, long)]
        profile: PathBuf,

        /// Number of results
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Show the farthest tracks instead of the nearest
        #[arg(long)]
        worst: bool,
    },

    /// Pick ten tracks for (or against) a listening profile and name the playlist
    Recommend {
        /// JSON file of the user's top-track audio features
        #[arg(short, long)]
        profile: PathBuf,

        /// good = closest to your taste, bad = farthest from it
        #[arg(short, long, default_value = "bad")]
        mode: Mode,

        /// RNG seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,

        /// Skip lyric lookup and playlist naming
        #[arg(long, conflicts_with = "lyrics")]
        no_lyrics: bool,

        /// Name the playlist from these lyric files instead of looking lyrics up
        #[arg(long)]
        lyrics: Vec<PathBuf>,
    },

    /// Name a playlist from local lyric files
    Name {
        /// Plain-text lyric files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// RNG seed for reproducible names
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show catalog statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = moodswing::config::AppConfig::load();

    // Database path: CLI > config > XDG default. Opened only by commands that need the catalog.
    let db_path = cli.db_path.or(config.db_path.clone());

    let engine = PlaylistEngine::new(
        config.recommend.clone(),
        config.naming.clone(),
        HeuristicSegmenter,
    );

    match cli.command {
        Commands::Import { path } => {
            let (db, _) = open_database(db_path)?;
            let count = moodswing::catalog::import_json(&db, &path).context("Import failed")?;
            println!("Import complete: {} tracks in catalog", count);
        }

        Commands::Rank { profile, limit, worst } => {
            let user = moodswing::profile::load_profile(&profile)?;
            let (db, _) = open_database(db_path)?;
            let catalog = db.load_catalog().context("Failed to load catalog")?;
            let ranked = engine.rank(&user, &catalog)?;

            let rows: Vec<(usize, f64)> = if worst {
                ranked.iter().rev().take(limit).collect()
            } else {
                ranked.iter().take(limit).collect()
            };

            let heading = if worst { "Farthest" } else { "Nearest" };
            println!("{} {} of {} catalog tracks:", heading, rows.len(), ranked.len());
            println!();
            print_rank_table(&rows, &catalog);
        }

        Commands::Recommend { profile, mode, seed, no_lyrics, lyrics } => {
            let mut rng = make_rng(seed.or(config.seed));
            let user = moodswing::profile::load_profile(&profile)?;
            let (db, _) = open_database(db_path)?;
            let catalog = db.load_catalog().context("Failed to load catalog")?;

            let selection = engine.recommend(&user, &catalog, mode, &mut rng)?;

            println!("Your {} playlist:", selection.mode);
            println!();
            print_selection(&selection);

            if no_lyrics {
                return Ok(());
            }

            let corpus = if lyrics.is_empty() {
                let client = LrclibClient::new(config.lyrics.clone());
                client.fetch_lyrics(&selection.lyric_queries())
            } else {
                read_lyric_files(&lyrics)?
            };

            println!();
            match engine.name_playlist(&corpus, &mut rng) {
                Ok(name) => println!("Playlist name: {}", name),
                Err(EngineError::NoNamingCandidates) => {
                    println!("No usable lyrics found for these tracks, playlist left unnamed.");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Name { files, seed } => {
            let mut rng = make_rng(seed.or(config.seed));
            let corpus = read_lyric_files(&files)?;
            let name = engine
                .name_playlist(&corpus, &mut rng)
                .context("Could not name a playlist from these lyrics")?;
            println!("{}", name);
        }

        Commands::Stats => {
            let (db, db_path) = open_database(db_path)?;
            let count = db.catalog_count().context("Failed to get stats")?;
            println!("Catalog Statistics");
            println!("==================");
            println!("Catalog tracks:   {}", count);
            println!("Database:         {}", db_path.display());
        }
    }

    Ok(())
}

fn open_database(path: Option<PathBuf>) -> Result<(Database, PathBuf)> {
    let path = path.unwrap_or_else(moodswing::config::default_db_path);
    log::info!("Database: {}", path.display());
    let db = Database::open(&path).context("Failed to open database")?;
    Ok((db, path))
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => {
            log::debug!("Using RNG seed {s}");
            StdRng::seed_from_u64(s)
        }
        None => StdRng::from_os_rng(),
    }
}

fn read_lyric_files(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read lyrics {}", path.display()))
        })
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Print ranked catalog rows with their distances.
fn print_rank_table(rows: &[(usize, f64)], catalog: &[CatalogEntry]) {
    println!("{:>6} {:<35} {:<25} {:>7}", "Index", "Song", "Artist", "Dist");
    println!("{}", "-".repeat(76));

    for &(idx, dist) in rows {
        let entry = &catalog[idx];
        println!(
            "{:>6} {:<35} {:<25} {:>7.3}",
            idx,
            truncate(&entry.name, 35),
            truncate(entry.primary_artist().unwrap_or("?"), 25),
            dist,
        );
    }

    println!();
    println!("Dist = Euclidean distance in normalized feature space (0 = your average taste)");
}

/// Print the drawn recommendations in draw order.
fn print_selection(selection: &Selection) {
    println!("{:<3} {:<35} {:<25} {}", "#", "Song", "Artist", "Track ID");
    println!("{}", "-".repeat(88));

    for (i, pick) in selection.picks.iter().enumerate() {
        println!(
            "{:<3} {:<35} {:<25} {}",
            i + 1,
            truncate(&pick.name, 35),
            truncate(&pick.primary_artist, 25),
            pick.id,
        );
    }
}
