//! Advertisement persistence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use placard_core::{Error, Result};
use tokio::sync::RwLock;

use crate::{Advertisement, AdvertisementSpec, EntityMetadata, NewAdvertisement};

/// Abstract advertisement storage.
///
/// Implementations own the technical fields: ids, versions and the
/// created/modified metadata.
#[async_trait]
pub trait AdvertisementRepository: Send + Sync {
    /// Store a new advertisement created by `created_by`.
    async fn insert(&self, new: NewAdvertisement, created_by: &str) -> Result<Advertisement>;

    /// Look up one advertisement.
    async fn find_by_id(&self, id: i64) -> Result<Option<Advertisement>>;

    /// Look up several advertisements; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Advertisement>>;

    /// Every advertisement matching `spec`, in ascending id order.
    async fn find_matching(&self, spec: &AdvertisementSpec) -> Result<Vec<Advertisement>>;

    /// Replace an advertisement.
    ///
    /// `ad.metadata.version` must equal the stored version, otherwise
    /// `Conflict`. Returns the stored copy with a bumped version.
    async fn update(&self, ad: &Advertisement, modified_by: &str) -> Result<Advertisement>;

    /// Delete an advertisement; `false` if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Advertisement>,
}

/// Advertisement repository kept in memory.
#[derive(Debug)]
pub struct InMemoryAdvertisementRepository {
    table: RwLock<Table>,
}

impl InMemoryAdvertisementRepository {
    /// Create an empty repository; ids start at 1.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryAdvertisementRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdvertisementRepository for InMemoryAdvertisementRepository {
    async fn insert(&self, new: NewAdvertisement, created_by: &str) -> Result<Advertisement> {
        new.validate()?;
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;

        let ad = Advertisement {
            id,
            title: new.title,
            contact: new.contact,
            published: false,
            confidentiality_level: new.confidentiality_level.unwrap_or_default(),
            metadata: EntityMetadata {
                version: 0,
                created_at: Utc::now(),
                created_by: created_by.to_string(),
                modified_at: None,
                modified_by: None,
            },
        };
        table.rows.insert(id, ad.clone());
        Ok(ad)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Advertisement>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Advertisement>> {
        let table = self.table.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| table.rows.get(id).cloned())
            .collect())
    }

    async fn find_matching(&self, spec: &AdvertisementSpec) -> Result<Vec<Advertisement>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|ad| spec.matches(ad))
            .cloned()
            .collect())
    }

    async fn update(&self, ad: &Advertisement, modified_by: &str) -> Result<Advertisement> {
        let mut table = self.table.write().await;
        let stored = table
            .rows
            .get(&ad.id)
            .ok_or_else(|| Error::not_found("advertisement", ad.id))?;

        if stored.metadata.version != ad.metadata.version {
            return Err(Error::conflict(
                "advertisement",
                ad.id,
                ad.metadata.version,
                stored.metadata.version,
            ));
        }

        let mut updated = ad.clone();
        // Creation fields are not updatable.
        updated.metadata.created_at = stored.metadata.created_at;
        updated.metadata.created_by.clone_from(&stored.metadata.created_by);
        updated.metadata.version = stored.metadata.version + 1;
        updated.metadata.modified_at = Some(Utc::now());
        updated.metadata.modified_by = Some(modified_by.to_string());

        table.rows.insert(ad.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
