use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::cache::{CachePolicy, Lookup, TtlCache};
use super::cdn::{ImageUrlBuilder, Transform};
use super::{PhotoCatalog, PhotoRecord};
use crate::config::{AppConfig, MediaConfig};
use crate::media::{MediaApi, MediaClient};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogKind {
    WithPlaceholders,
    IdsOnly,
}

type CacheSelector<K, V> = fn(&Inner) -> &TtlCache<K, V>;

fn catalog_cache(inner: &Inner) -> &TtlCache<CatalogKind, Arc<PhotoCatalog>> {
    &inner.catalogs
}

fn photo_cache(inner: &Inner) -> &TtlCache<String, Option<PhotoRecord>> {
    &inner.photos
}

/// Background refresh claim, released on drop so a panicking task cannot
/// leave its key marked as refreshing
struct RefreshClaim<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    inner: Arc<Inner>,
    select: CacheSelector<K, V>,
    key: K,
}

impl<K, V> Drop for RefreshClaim<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        (self.select)(&self.inner).end_refresh(&self.key);
    }
}

struct Inner {
    api: Arc<dyn MediaApi>,
    urls: ImageUrlBuilder,
    expression: String,
    max_results: u32,
    placeholder_concurrency: usize,
    catalogs: TtlCache<CatalogKind, Arc<PhotoCatalog>>,
    photos: TtlCache<String, Option<PhotoRecord>>,
}

/// Read-through cached access to the photo collection
///
/// Cloning is cheap; all clones share one cache.
#[derive(Clone)]
pub struct CatalogProvider {
    inner: Arc<Inner>,
}

impl CatalogProvider {
    pub fn new(api: Arc<dyn MediaApi>, media: &MediaConfig, policy: CachePolicy) -> Result<Self> {
        let urls = ImageUrlBuilder::new(&media.delivery_base, &media.cloud_name)?;
        let expression = format!("folder:{}/*", media.folder.trim_matches('/'));

        Ok(Self {
            inner: Arc::new(Inner {
                api,
                urls,
                expression,
                max_results: media.max_results,
                placeholder_concurrency: media.placeholder_concurrency.max(1),
                catalogs: TtlCache::new(policy),
                photos: TtlCache::new(policy),
            }),
        })
    }

    /// Provider backed by the HTTP media client
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = MediaClient::new(&config.media)?;
        Self::new(Arc::new(client), &config.media, config.cache.policy())
    }

    pub fn urls(&self) -> &ImageUrlBuilder {
        &self.inner.urls
    }

    pub fn api(&self) -> Arc<dyn MediaApi> {
        Arc::clone(&self.inner.api)
    }

    pub fn policy(&self) -> CachePolicy {
        self.inner.catalogs.policy()
    }

    /// Full catalog with placeholders; empty when the API is unreachable
    pub async fn list_photos(&self) -> Arc<PhotoCatalog> {
        let result = self
            .inner
            .read_through(catalog_cache, CatalogKind::WithPlaceholders, |inner| async move {
                inner.fetch_catalog(true).await
            })
            .await;

        match result {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Error fetching photos: {}", e);
                Arc::new(PhotoCatalog::empty())
            }
        }
    }

    /// Ids in catalog order, without fetching placeholders
    pub async fn photo_ids(&self) -> Vec<String> {
        let result = self
            .inner
            .read_through(catalog_cache, CatalogKind::IdsOnly, |inner| async move {
                inner.fetch_catalog(false).await
            })
            .await;

        match result {
            Ok(catalog) => catalog.ids(),
            Err(e) => {
                tracing::error!("Error fetching photo ids: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_photo_by_id(&self, id: &str) -> Option<PhotoRecord> {
        let owned = id.to_string();
        let result = self
            .inner
            .read_through(photo_cache, id.to_string(), move |inner| async move {
                inner.fetch_photo(&owned).await
            })
            .await;

        match result {
            Ok(photo) => photo,
            Err(e) => {
                tracing::error!("Error fetching photo '{}': {}", id, e);
                None
            }
        }
    }

    /// Drop every cached entry and fetch the catalog again
    pub async fn refresh(&self) -> Arc<PhotoCatalog> {
        self.inner.catalogs.clear();
        self.inner.photos.clear();
        self.list_photos().await
    }
}

impl Inner {
    async fn read_through<K, V, F, Fut>(
        self: &Arc<Self>,
        select: CacheSelector<K, V>,
        key: K,
        fetch: F,
    ) -> Result<V>
    where
        K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        F: FnOnce(Arc<Inner>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let cache = select(self);
        match cache.get(&key) {
            Lookup::Fresh(value) => Ok(value),
            Lookup::Stale(value) => {
                if cache.begin_refresh(&key) {
                    tracing::debug!("Revalidating {:?} in the background", key);
                    let claim = RefreshClaim {
                        inner: Arc::clone(self),
                        select,
                        key,
                    };
                    tokio::spawn(async move {
                        let result = fetch(Arc::clone(&claim.inner)).await;
                        match result {
                            Ok(fresh) => (claim.select)(&claim.inner).insert(claim.key.clone(), fresh),
                            Err(e) => {
                                tracing::warn!("Background refresh of {:?} failed: {}", claim.key, e)
                            }
                        }
                    });
                }
                Ok(value)
            }
            Lookup::Miss => {
                let value = fetch(Arc::clone(self)).await?;
                cache.insert(key, value.clone());
                Ok(value)
            }
        }
    }

    async fn fetch_catalog(&self, with_placeholders: bool) -> Result<Arc<PhotoCatalog>> {
        let resources = self.api.search(&self.expression, self.max_results).await?;
        let records: Vec<PhotoRecord> = resources.iter().map(PhotoRecord::from_resource).collect();

        let records = if with_placeholders {
            self.attach_placeholders(records).await
        } else {
            records
        };

        tracing::info!("Fetched catalog of {} photos", records.len());
        Ok(Arc::new(PhotoCatalog::new(records)))
    }

    async fn fetch_photo(&self, id: &str) -> Result<Option<PhotoRecord>> {
        let resource = match self.api.resource(id).await {
            Ok(resource) => resource,
            Err(Error::PhotoNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let record = PhotoRecord::from_resource(&resource);
        let url = self.urls.url(&record, &Transform::PLACEHOLDER);
        let placeholder = fetch_placeholder(self.api.as_ref(), &url).await;
        Ok(Some(record.with_placeholder(placeholder)))
    }

    /// Fetch every placeholder concurrently, keeping catalog order
    async fn attach_placeholders(&self, records: Vec<PhotoRecord>) -> Vec<PhotoRecord> {
        let semaphore = Arc::new(Semaphore::new(self.placeholder_concurrency));
        let mut join_set = JoinSet::new();

        for (index, record) in records.iter().enumerate() {
            let url = self.urls.url(record, &Transform::PLACEHOLDER);
            let api = Arc::clone(&self.api);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (index, fetch_placeholder(api.as_ref(), &url).await)
            });
        }

        let mut placeholders: Vec<Option<String>> = vec![None; records.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, placeholder)) => placeholders[index] = placeholder,
                Err(e) => tracing::warn!("Placeholder task failed: {}", e),
            }
        }

        records
            .into_iter()
            .zip(placeholders)
            .map(|(record, placeholder)| record.with_placeholder(placeholder))
            .collect()
    }
}

async fn fetch_placeholder(api: &dyn MediaApi, url: &str) -> Option<String> {
    match api.fetch_bytes(url).await {
        Ok(bytes) => Some(STANDARD.encode(&bytes)),
        Err(e) => {
            tracing::warn!("Failed to fetch placeholder {}: {}", url, e);
            None
        }
    }
}
