//! PokeAPI wire types.
//!
//! Only the fields the game consumes are modelled; everything else in the
//! payloads is ignored. Optional sprite fields default to `None` so a missing
//! or `null` artwork entry falls through to the next candidate.

use serde::Deserialize;

use pairs_core::Entity;

use super::FetchError;

/// `GET /pokemon?limit=N`
#[derive(Debug, Clone, Deserialize)]
pub struct IndexPage {
    #[serde(default)]
    pub count: Option<u32>,
    pub results: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    /// Detail endpoint for this entry.
    pub url: String,
}

/// `GET /pokemon/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct Detail {
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

impl Detail {
    /// Official artwork when present, otherwise the default sprite.
    pub fn image(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    pub fn into_entity(self) -> Result<Entity, FetchError> {
        match self.image().map(str::to_owned) {
            Some(image) => Ok(Entity::new(self.name, image)),
            None => Err(FetchError::MissingImage { name: self.name }),
        }
    }
}
