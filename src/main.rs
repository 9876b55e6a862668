use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use media_gallery::config::{AppConfig, DatabaseConfig};
use media_gallery::logging::{init_logging, OperationTimer};
use media_gallery::models::{NewReview, ReviewPatch};
use media_gallery::seed::seed_sample_data;
use media_gallery::{
    Book, Catalog, Character, Database, Entity, EntityKind, MediaRef, MediaType, Photo,
    Repository, UserDocument, Video,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered over config/default and config/local
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL, overriding configuration and DATABASE_URL
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Init,
    /// Fill the catalog with sample data
    Seed {
        /// Seed for the random review generator
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show row counts per entity kind
    Stats,
    /// Search titles and names across all kinds
    Search {
        /// Text to look for
        query: String,

        /// Maximum results per kind
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List records of one kind
    List {
        /// Entity kind (photos, videos, books, documents, characters, reviews)
        kind: EntityKind,

        /// Records to skip
        #[arg(short, long, default_value = "0")]
        offset: u32,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show one record
    Get {
        /// Entity kind
        kind: EntityKind,
        /// Record identifier
        id: i64,
    },
    /// Create a record from a JSON object
    Create {
        /// Entity kind
        kind: EntityKind,
        /// Field values as JSON
        json: String,
    },
    /// Update the given fields of a record
    Update {
        /// Entity kind
        kind: EntityKind,
        /// Record identifier
        id: i64,
        /// Fields to overwrite as JSON
        json: String,
    },
    /// Delete a record and its links
    Delete {
        /// Entity kind
        kind: EntityKind,
        /// Record identifier
        id: i64,
    },
    /// Link a photo, video or book to a character
    Link {
        /// Character identifier
        character_id: i64,
        /// Media type (photo, video or book)
        media_type: MediaType,
        /// Media identifier
        media_id: i64,
    },
    /// Remove a character link
    Unlink {
        /// Character identifier
        character_id: i64,
        /// Media type (photo, video or book)
        media_type: MediaType,
        /// Media identifier
        media_id: i64,
    },
    /// Show a character with its linked media
    Media {
        /// Character identifier
        character_id: i64,
    },
    /// Show characters linked to a media item
    Characters {
        /// Media type (photo, video or book)
        media_type: MediaType,
        /// Media identifier
        media_id: i64,
    },
    /// List reviews of one media item, or by rating range
    Reviews {
        /// Media type of the reviewed item
        #[arg(long, requires = "media_id")]
        media_type: Option<MediaType>,

        /// Identifier of the reviewed item
        #[arg(long, requires = "media_type")]
        media_id: Option<i64>,

        /// Lowest rating (inclusive)
        #[arg(long, conflicts_with = "media_type")]
        min: Option<i32>,

        /// Highest rating (inclusive)
        #[arg(long, conflicts_with = "media_type")]
        max: Option<i32>,

        /// Maximum results for a range query
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show the average rating of a media item
    Rating {
        /// Media type of the reviewed item
        media_type: MediaType,
        /// Identifier of the reviewed item
        media_id: i64,
    },
    /// Search books by author
    ByAuthor {
        /// Text to look for in the author
        author: String,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

/// Generic record operations dispatched by entity kind
enum Crud {
    List { offset: u32, limit: u32 },
    Get(i64),
    Create(String),
    Update(i64, String),
    Delete(i64),
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = init_logging(&config.logging)?;

    info!("Starting media-gallery");

    // Initialize database with configuration
    let database_url = cli.database.clone().unwrap_or_else(|| config.get_database_url());
    let db = Database::with_config(&DatabaseConfig {
        url: database_url.clone(),
        ..config.database.clone()
    })
    .with_context(|| format!("Failed to open database at {database_url}"))?;

    let catalog = Catalog::with_config(db, config.catalog.clone());
    let page_size = config.catalog.default_page_size;
    let search_limit = config.catalog.default_search_limit;

    // Process command
    match cli.command {
        Commands::Init => {
            info!(database_url = %database_url, "Database initialized");
            emit(&catalog.statistics()?)?;
        },
        Commands::Seed { seed } => {
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let timer = OperationTimer::new("seed");
            let summary = seed_sample_data(&catalog, &mut rng).context("Failed to seed sample data")?;
            timer.finish();
            emit(&summary)?;
        },
        Commands::Stats => emit(&catalog.statistics()?)?,
        Commands::Search { query, limit } => {
            emit(&catalog.search_all(&query, limit.unwrap_or(search_limit))?)?;
        },
        Commands::List { kind, offset, limit } => {
            run(&catalog, kind, Crud::List {
                offset,
                limit: limit.unwrap_or(page_size),
            })?;
        },
        Commands::Get { kind, id } => run(&catalog, kind, Crud::Get(id))?,
        Commands::Create { kind, json } => run(&catalog, kind, Crud::Create(json))?,
        Commands::Update { kind, id, json } => run(&catalog, kind, Crud::Update(id, json))?,
        Commands::Delete { kind, id } => run(&catalog, kind, Crud::Delete(id))?,
        Commands::Link {
            character_id,
            media_type,
            media_id,
        } => {
            let characters = &catalog.characters;
            let linked = match media_type {
                MediaType::Photo => characters.add_photo(character_id, media_id)?,
                MediaType::Video => characters.add_video(character_id, media_id)?,
                MediaType::Book => characters.add_book(character_id, media_id)?,
                MediaType::Document => bail!("documents cannot be linked to characters"),
            };
            match linked {
                Some(character) => emit(&character)?,
                None => bail!("character {character_id} or {media_type} {media_id} not found"),
            }
        },
        Commands::Unlink {
            character_id,
            media_type,
            media_id,
        } => {
            let characters = &catalog.characters;
            let removed = match media_type {
                MediaType::Photo => characters.detach::<Photo>(character_id, media_id)?,
                MediaType::Video => characters.detach::<Video>(character_id, media_id)?,
                MediaType::Book => characters.detach::<Book>(character_id, media_id)?,
                MediaType::Document => bail!("documents cannot be linked to characters"),
            };
            emit(&serde_json::json!({ "removed": removed }))?;
        },
        Commands::Media { character_id } => match catalog.characters.with_media(character_id)? {
            Some(character) => emit(&character)?,
            None => bail!("character {character_id} not found"),
        },
        Commands::Characters { media_type, media_id } => {
            let characters = match media_type {
                MediaType::Photo => catalog.photos.characters(media_id)?,
                MediaType::Video => catalog.videos.characters(media_id)?,
                MediaType::Book => catalog.books.characters(media_id)?,
                MediaType::Document => bail!("documents cannot be linked to characters"),
            };
            emit(&characters)?;
        },
        Commands::Reviews {
            media_type,
            media_id,
            min,
            max,
            limit,
        } => {
            let reviews = match (media_type, media_id) {
                (Some(media_type), Some(media_id)) => {
                    catalog.reviews.get_by_media(MediaRef::new(media_type, media_id))?
                },
                _ => catalog.reviews.by_rating_range(
                    min.unwrap_or(media_gallery::validation::MIN_RATING),
                    max.unwrap_or(media_gallery::validation::MAX_RATING),
                    limit.unwrap_or(page_size),
                )?,
            };
            emit(&reviews)?;
        },
        Commands::Rating { media_type, media_id } => {
            let target = MediaRef::new(media_type, media_id);
            let average = catalog.reviews.average_rating(target)?;
            emit(&serde_json::json!({
                "media_type": media_type,
                "media_id": media_id,
                "average_rating": average,
            }))?;
        },
        Commands::ByAuthor { author, limit } => {
            emit(&catalog.books.search_by_author(&author, limit.unwrap_or(search_limit))?)?;
        },
    }

    Ok(())
}

/// Dispatch a generic operation to the repository of `kind`
fn run(catalog: &Catalog, kind: EntityKind, action: Crud) -> Result<()> {
    match kind {
        EntityKind::Photo => crud(&catalog.photos, action),
        EntityKind::Video => crud(&catalog.videos, action),
        EntityKind::Book => crud(&catalog.books, action),
        EntityKind::Document => crud::<UserDocument>(&catalog.documents, action),
        EntityKind::Character => crud::<Character>(&catalog.characters, action),
        EntityKind::Review => match action {
            // Review creation follows the catalog's target policy
            Crud::Create(json) => {
                let new: NewReview = parse_json(&json)?;
                emit(&catalog.create_review(new)?)
            },
            Crud::Update(id, json) => {
                let patch: ReviewPatch = parse_json(&json)?;
                emit_found(catalog.reviews.update(id, patch)?, kind, id)
            },
            other => crud(&catalog.reviews, other),
        },
    }
}

fn crud<E>(repo: &Repository<E>, action: Crud) -> Result<()>
where
    E: Entity + Serialize,
    E::Create: DeserializeOwned,
    E::Patch: DeserializeOwned,
{
    match action {
        Crud::List { offset, limit } => emit(&repo.list(offset, limit)?),
        Crud::Get(id) => emit_found(repo.get(id)?, E::KIND, id),
        Crud::Create(json) => {
            let record = repo.create(parse_json(&json)?)?;
            info!(kind = %E::KIND, id = record.id(), "Record created");
            emit(&record)
        },
        Crud::Update(id, json) => emit_found(repo.update(id, parse_json(&json)?)?, E::KIND, id),
        Crud::Delete(id) => emit_found(repo.delete(id)?, E::KIND, id),
    }
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).context("Invalid JSON payload")
}

fn emit_found<T: Serialize>(record: Option<T>, kind: EntityKind, id: i64) -> Result<()> {
    match record {
        Some(record) => emit(&record),
        None => bail!("{kind} {id} not found"),
    }
}

/// Write a value to stdout as pretty JSON
fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    debug!("Output written");
    Ok(())
}
