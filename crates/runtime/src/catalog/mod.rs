//! Sources of creatures for a new board.
//!
//! A [`CatalogSource`] draws `count` distinct entities at random. The HTTP
//! implementation talks to PokeAPI; [`StaticCatalog`] serves a fixed list for
//! offline play and tests. Draws are all-or-nothing: any failure surfaces as a
//! single [`FetchError`] and no partial list is returned.

mod memory;
mod pokeapi;
mod types;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::index;
use thiserror::Error;

use pairs_core::Entity;

pub use memory::StaticCatalog;
pub use pokeapi::PokeApiCatalog;
pub use types::{Artwork, Detail, IndexEntry, IndexPage, OtherSprites, Sprites};

/// Failure to draw entities from a catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("catalog response from {url} could not be decoded")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog lists {available} entries but {requested} were requested")]
    NotEnoughEntries { requested: usize, available: usize },

    #[error("`{name}` has no image")]
    MissingImage { name: String },

    #[error("catalog detail task failed")]
    Join(#[source] tokio::task::JoinError),
}

/// Asynchronous source of random entities.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Draws exactly `count` distinct entities, uniformly without replacement.
    async fn fetch_random_entities(&self, count: usize) -> Result<Vec<Entity>, FetchError>;
}

/// Uniform sample of `count` items from `pool` without replacement.
pub(crate) fn draw<T: Clone, R: Rng + ?Sized>(
    pool: &[T],
    count: usize,
    rng: &mut R,
) -> Result<Vec<T>, FetchError> {
    if pool.len() < count {
        return Err(FetchError::NotEnoughEntries {
            requested: count,
            available: pool.len(),
        });
    }

    Ok(index::sample(rng, pool.len(), count)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn draw_returns_distinct_items() {
        let pool: Vec<u32> = (0..1000).collect();
        let mut rng = StdRng::seed_from_u64(9);

        let picked = draw(&pool, 12, &mut rng).unwrap();
        assert_eq!(picked.len(), 12);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 12);
    }

    #[test]
    fn draw_can_take_the_whole_pool() {
        let pool = vec!["a", "b", "c"];
        let mut rng = StdRng::seed_from_u64(1);

        let mut picked = draw(&pool, 3, &mut rng).unwrap();
        picked.sort();
        assert_eq!(picked, pool);
    }

    #[test]
    fn draw_fails_when_pool_is_too_small() {
        let pool = vec![1, 2];
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            draw(&pool, 6, &mut rng),
            Err(FetchError::NotEnoughEntries {
                requested: 6,
                available: 2
            })
        ));
    }
}
