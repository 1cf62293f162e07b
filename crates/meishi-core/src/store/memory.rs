//! In-process card store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::MeishiResult;
use crate::traits::{CardStore, StoredCard};
use crate::types::ContactRecord;

/// Card store kept in memory, partitioned by owner.
///
/// Cards are kept in insertion order per owner so "newest first" does not
/// depend on timestamp resolution.
#[derive(Debug, Default)]
pub struct InMemoryCardStore {
    cards: RwLock<HashMap<String, Vec<StoredCard>>>,
    usage: RwLock<HashMap<String, u64>>,
}

impl InMemoryCardStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first<F>(&self, owner: &str, keep: F) -> Vec<StoredCard>
    where
        F: Fn(&StoredCard) -> bool,
    {
        let cards = self.cards.read().await;
        cards
            .get(owner)
            .map(|list| list.iter().rev().filter(|c| keep(c)).cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn save(&self, owner: &str, record: &ContactRecord) -> MeishiResult<StoredCard> {
        let card = StoredCard {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            created_at: Utc::now(),
            record: record.clone(),
        };
        let mut cards = self.cards.write().await;
        cards.entry(owner.to_string()).or_default().push(card.clone());
        Ok(card)
    }

    async fn recent(&self, owner: &str, limit: usize) -> MeishiResult<Vec<StoredCard>> {
        let mut cards = self.newest_first(owner, |_| true).await;
        cards.truncate(limit);
        Ok(cards)
    }

    async fn all(&self, owner: &str) -> MeishiResult<Vec<StoredCard>> {
        Ok(self.newest_first(owner, |_| true).await)
    }

    async fn search(&self, owner: &str, keyword: &str) -> MeishiResult<Vec<StoredCard>> {
        Ok(self
            .newest_first(owner, |c| c.record.matches_keyword(keyword))
            .await)
    }

    async fn delete(&self, owner: &str, id: &str) -> MeishiResult<bool> {
        let mut cards = self.cards.write().await;
        let Some(list) = cards.get_mut(owner) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|c| c.id != id);
        Ok(list.len() != before)
    }

    async fn record_usage(&self, owner: &str) -> MeishiResult<u64> {
        let mut usage = self.usage.write().await;
        let count = usage.entry(owner.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn usage(&self, owner: &str) -> MeishiResult<u64> {
        Ok(self.usage.read().await.get(owner).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, company: &str) -> ContactRecord {
        ContactRecord {
            name: Some(name.to_string()),
            company: Some(company.to_string()),
            ..ContactRecord::new(format!("{}\n{}", company, name))
        }
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let store = InMemoryCardStore::new();
        store.save("u1", &record("山田 太郎", "株式会社A")).await.unwrap();
        store.save("u1", &record("佐藤 花子", "株式会社B")).await.unwrap();
        store.save("u1", &record("John Smith", "Acme Inc.")).await.unwrap();

        let recent = store.recent("u1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].record.name.as_deref(), Some("John Smith"));
        assert_eq!(recent[1].record.name.as_deref(), Some("佐藤 花子"));
        assert_eq!(store.all("u1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = InMemoryCardStore::new();
        let card = store.save("u1", &record("山田 太郎", "株式会社A")).await.unwrap();

        assert!(store.all("u2").await.unwrap().is_empty());
        assert!(!store.delete("u2", &card.id).await.unwrap());
        assert!(store.delete("u1", &card.id).await.unwrap());
        assert!(store.all("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let store = InMemoryCardStore::new();
        store.save("u1", &record("John Smith", "Acme Inc.")).await.unwrap();
        store.save("u1", &record("山田 太郎", "株式会社A")).await.unwrap();

        let hits = store.search("u1", "acme").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.company.as_deref(), Some("Acme Inc."));
        assert!(store.search("u1", "missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_usage_counter() {
        let store = InMemoryCardStore::new();
        assert_eq!(store.usage("u1").await.unwrap(), 0);
        assert_eq!(store.record_usage("u1").await.unwrap(), 1);
        assert_eq!(store.record_usage("u1").await.unwrap(), 2);
        assert_eq!(store.usage("u1").await.unwrap(), 2);
        assert_eq!(store.usage("u2").await.unwrap(), 0);
    }
}
