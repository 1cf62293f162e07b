//! Card persistence contract.
//!
//! The pipeline never persists anything itself; callers hand each record to a
//! `CardStore` together with the identifier of the user who sent the photo.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MeishiResult;
use crate::types::ContactRecord;

/// A contact record saved on behalf of an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCard {
    pub id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: ContactRecord,
}

/// Storage backend for scanned cards.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Persist a record for the given owner.
    async fn save(&self, owner: &str, record: &ContactRecord) -> MeishiResult<StoredCard>;

    /// Most recent cards of an owner, newest first.
    async fn recent(&self, owner: &str, limit: usize) -> MeishiResult<Vec<StoredCard>>;

    /// Every card of an owner, newest first.
    async fn all(&self, owner: &str) -> MeishiResult<Vec<StoredCard>>;

    /// Cards whose name, company or email contains the keyword (case-insensitive).
    async fn search(&self, owner: &str, keyword: &str) -> MeishiResult<Vec<StoredCard>>;

    /// Delete one of the owner's cards. Returns `false` if no such card exists.
    async fn delete(&self, owner: &str, id: &str) -> MeishiResult<bool>;

    /// Increment the owner's scan counter and return the new value.
    async fn record_usage(&self, owner: &str) -> MeishiResult<u64>;

    /// Current scan counter of an owner.
    async fn usage(&self, owner: &str) -> MeishiResult<u64>;
}
