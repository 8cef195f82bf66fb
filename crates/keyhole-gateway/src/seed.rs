//! Loading access records from a JSON file at startup.
//!
//! Records are managed out-of-band; this is how an operator provisions them
//! for the in-memory backend (or bulk-loads a fresh MySQL table). The file is
//! a JSON array:
//!
//! ```json
//! [
//!   { "password": "abc123", "link": "https://example.com/x" },
//!   { "password": "abc123", "gameVersion": "main", "link": "https://example.com/y",
//!     "encryptedLink": "enc:...", "expireAt": "2030-01-01T00:00:00Z" }
//! ]
//! ```

use jiff::Timestamp;
use keyhole_core::{AccessCode, AccessRecord, ContextTag, CoreError, RecordKey, Repository, StorageError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read records file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse records file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record #{index} is invalid: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: CoreError,
    },
    #[error("record #{index} could not be stored: {source}")]
    Storage {
        index: usize,
        #[source]
        source: StorageError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RecordSeed {
    password: String,
    #[serde(default)]
    game_version: Option<String>,
    link: String,
    #[serde(default)]
    encrypted_link: Option<String>,
    #[serde(default)]
    expire_at: Option<Timestamp>,
}

/// Parses and validates seed records.
pub fn parse_records(json: &str) -> Result<Vec<(RecordKey, AccessRecord)>, SeedError> {
    let seeds: Vec<RecordSeed> = serde_json::from_str(json)?;

    seeds
        .into_iter()
        .enumerate()
        .map(|(index, seed)| {
            let code =
                AccessCode::new(seed.password).map_err(|source| SeedError::Invalid { index, source })?;
            let context = ContextTag::from_request(seed.game_version.as_deref())
                .map_err(|source| SeedError::Invalid { index, source })?;
            let record = AccessRecord {
                link: seed.link,
                encrypted_link: seed.encrypted_link,
                expire_at: seed.expire_at,
            };
            Ok((RecordKey::new(context, code), record))
        })
        .collect()
}

/// Inserts every record from `path` into `repository`.
///
/// Returns the number of records inserted. A duplicate key fails the load.
pub async fn seed_from_file<R: Repository>(
    repository: &R,
    path: &Path,
) -> Result<usize, SeedError> {
    let json = tokio::fs::read_to_string(path).await?;
    let records = parse_records(&json)?;
    let count = records.len();

    for (index, (key, record)) in records.into_iter().enumerate() {
        repository
            .insert(&key, record)
            .await
            .map_err(|source| SeedError::Storage { index, source })?;
    }

    info!(path = %path.display(), count, "seeded access records");
    Ok(count)
}
