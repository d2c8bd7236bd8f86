//! Resolution of partial score descriptors to stored records.
//!
//! Callers frequently hold a score built from an online leaderboard entry,
//! which carries an online id but no content hash. The resolver maps such a
//! lookup onto the canonical record in storage.

use crate::database::Database;
use crate::error::PresentError;
use crate::models::score::{ScoreLookup, ScoreRecord};

/// Storage queries the resolver depends on.
#[allow(async_fn_in_trait)]
pub trait ScoreSource {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<ScoreRecord>, sqlx::Error>;

    /// Best record for `online_id`: hashed records first, then most recent.
    async fn find_by_online_id(&self, online_id: i64) -> Result<Option<ScoreRecord>, sqlx::Error>;
}

impl ScoreSource for Database {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<ScoreRecord>, sqlx::Error> {
        self.score_by_hash(hash).await
    }

    async fn find_by_online_id(&self, online_id: i64) -> Result<Option<ScoreRecord>, sqlx::Error> {
        self.score_by_online_id(online_id).await
    }
}

pub struct ScoreResolver<'a, S: ScoreSource> {
    source: &'a S,
}

impl<'a, S: ScoreSource> ScoreResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolves `lookup` to its canonical stored record.
    ///
    /// A non-empty hash is authoritative and never falls back to the online
    /// id. An empty hash only enables the online id path; it is never compared
    /// against other empty hashes.
    pub async fn resolve(&self, lookup: &ScoreLookup) -> Result<ScoreRecord, PresentError> {
        if lookup.is_ambiguous() {
            log::warn!("RESOLVE: Lookup has neither hash nor online id");
            return Err(PresentError::AmbiguousIdentity);
        }

        let found = if !lookup.hash.is_empty() {
            self.source.find_by_hash(&lookup.hash).await?
        } else if let Some(online_id) = lookup.usable_online_id() {
            self.source
                .find_by_online_id(online_id)
                .await?
                .filter(|record| record.usable_online_id() == Some(online_id))
        } else {
            None
        };

        match found {
            Some(record) => {
                if let Some(hint) = lookup.ruleset
                    && hint != record.ruleset
                {
                    log::debug!(
                        "RESOLVE: Lookup ruleset {} overridden by stored {}",
                        hint,
                        record.ruleset
                    );
                }
                log::info!(
                    "RESOLVE: Lookup (hash '{}', online id {:?}) -> score {}",
                    lookup.hash,
                    lookup.online_id,
                    record.id
                );
                Ok(record)
            }
            None => {
                log::warn!(
                    "RESOLVE: No score for hash '{}' / online id {:?}",
                    lookup.hash,
                    lookup.online_id
                );
                Err(PresentError::UnknownScore)
            }
        }
    }
}
