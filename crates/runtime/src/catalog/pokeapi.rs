//! PokeAPI HTTP catalog.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;

use pairs_core::Entity;

use super::types::{Detail, IndexEntry, IndexPage};
use super::{CatalogSource, FetchError, draw};

/// Catalog backed by the public PokeAPI.
///
/// One draw is two rounds of requests: the index listing, then one detail
/// request per selected entry, issued concurrently and joined all-or-nothing.
pub struct PokeApiCatalog {
    /// API root, without trailing slash (e.g. `https://pokeapi.co/api/v2`)
    base_url: String,

    /// How many index entries to list before sampling
    index_limit: u32,

    /// HTTP client
    http_client: reqwest::Client,

    rng: Mutex<StdRng>,
}

impl PokeApiCatalog {
    pub const DEFAULT_BASE_URL: &'static str = "https://pokeapi.co/api/v2";
    pub const DEFAULT_INDEX_LIMIT: u32 = 1000;

    pub fn new(base_url: impl Into<String>, index_limit: u32, rng: StdRng) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            index_limit,
            http_client: reqwest::Client::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn index_url(&self) -> String {
        format!("{}/pokemon?limit={}", self.base_url, self.index_limit)
    }

    async fn fetch_index(&self) -> Result<Vec<IndexEntry>, FetchError> {
        let page: IndexPage = get_json(&self.http_client, &self.index_url()).await?;
        Ok(page.results)
    }

    fn select(&self, index: &[IndexEntry], count: usize) -> Result<Vec<IndexEntry>, FetchError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(index, count, &mut *rng)
    }
}

#[async_trait]
impl CatalogSource for PokeApiCatalog {
    async fn fetch_random_entities(&self, count: usize) -> Result<Vec<Entity>, FetchError> {
        let index = self.fetch_index().await?;
        let selected = self.select(&index, count)?;

        tracing::debug!(
            target: "runtime::catalog",
            listed = index.len(),
            selected = selected.len(),
            "Fetching catalog details"
        );

        let mut details = JoinSet::new();
        for (slot, entry) in selected.into_iter().enumerate() {
            let client = self.http_client.clone();
            details.spawn(async move {
                let detail: Detail = get_json(&client, &entry.url).await?;
                Ok::<_, FetchError>((slot, detail.into_entity()?))
            });
        }

        // Dropping the set on an early return aborts the remaining requests.
        let mut entities: Vec<Option<Entity>> = vec![None; count];
        while let Some(joined) = details.join_next().await {
            let (slot, entity) = joined.map_err(FetchError::Join)??;
            entities[slot] = Some(entity);
        }

        let entities: Vec<Entity> = entities.into_iter().flatten().collect();
        tracing::info!(
            target: "runtime::catalog",
            count = entities.len(),
            "Catalog draw complete"
        );
        Ok(entities)
    }
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, FetchError> {
    tracing::debug!(target: "runtime::catalog", url, "GET");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    // Decoded separately so a bad payload surfaces as `Decode`, not `Transport`.
    let body = response
        .text()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    serde_json::from_str(&body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
