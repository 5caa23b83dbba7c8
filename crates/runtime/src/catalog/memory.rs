//! In-memory catalog for offline play and tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use pairs_core::Entity;

use super::{CatalogSource, FetchError, draw};

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// National dex numbers and names bundled for offline play.
const BUILTIN: &[(u32, &str)] = &[
    (1, "bulbasaur"),
    (4, "charmander"),
    (7, "squirtle"),
    (12, "butterfree"),
    (16, "pidgey"),
    (25, "pikachu"),
    (35, "clefairy"),
    (39, "jigglypuff"),
    (43, "oddish"),
    (52, "meowth"),
    (54, "psyduck"),
    (58, "growlithe"),
    (63, "abra"),
    (66, "machop"),
    (74, "geodude"),
    (79, "slowpoke"),
    (92, "gastly"),
    (94, "gengar"),
    (104, "cubone"),
    (113, "chansey"),
    (129, "magikarp"),
    (133, "eevee"),
    (143, "snorlax"),
    (150, "mewtwo"),
];

/// In-memory catalog with the same sampling semantics as the HTTP one.
pub struct StaticCatalog {
    entities: Vec<Entity>,
    rng: Mutex<StdRng>,
}

impl StaticCatalog {
    pub fn new(entities: Vec<Entity>, rng: StdRng) -> Self {
        Self {
            entities,
            rng: Mutex::new(rng),
        }
    }

    /// Catalog seeded from a fixed number, for reproducible draws.
    pub fn seeded(entities: Vec<Entity>, seed: u64) -> Self {
        Self::new(entities, StdRng::seed_from_u64(seed))
    }

    /// Bundled list large enough for every difficulty tier.
    pub fn builtin(rng: StdRng) -> Self {
        let entities = BUILTIN
            .iter()
            .map(|&(id, name)| Entity::new(name, format!("{ARTWORK_BASE}/{id}.png")))
            .collect();
        Self::new(entities, rng)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_random_entities(&self, count: usize) -> Result<Vec<Entity>, FetchError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&self.entities, count, &mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_core::Difficulty;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[tokio::test]
    async fn builtin_covers_every_difficulty() {
        let catalog = StaticCatalog::builtin(StdRng::seed_from_u64(0));

        for difficulty in Difficulty::iter() {
            let pairs = difficulty.preset().pairs as usize;
            let drawn = catalog.fetch_random_entities(pairs).await.unwrap();
            assert_eq!(drawn.len(), pairs);
            let names: HashSet<_> = drawn.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names.len(), pairs);
        }
    }

    #[tokio::test]
    async fn too_large_draw_fails() {
        let catalog = StaticCatalog::seeded(vec![Entity::new("a", "a.png")], 0);
        assert!(matches!(
            catalog.fetch_random_entities(2).await,
            Err(FetchError::NotEnoughEntries { .. })
        ));
    }
}
