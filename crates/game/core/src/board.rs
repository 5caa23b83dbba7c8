//! Board construction: one pair of cards per entity, uniformly shuffled.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::{Card, CardId, Entity};

/// Errors raised while building a board from catalog entities.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cannot build a board without entities")]
    Empty,

    #[error("entity `{name}` appears more than once")]
    DuplicateEntity { name: String },
}

/// Shuffled cards of one session, two per entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Duplicates `entities`, numbers the doubled list and shuffles it.
    ///
    /// The shuffle is Fisher–Yates, so every ordering is equally likely.
    pub fn build<R: Rng + ?Sized>(entities: &[Entity], rng: &mut R) -> Result<Self, BoardError> {
        if entities.is_empty() {
            return Err(BoardError::Empty);
        }

        let mut seen = HashSet::with_capacity(entities.len());
        for entity in entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(BoardError::DuplicateEntity {
                    name: entity.name.clone(),
                });
            }
        }

        let mut cards: Vec<Card> = entities
            .iter()
            .chain(entities.iter())
            .enumerate()
            .map(|(index, entity)| Card::new(CardId(index as u32), entity))
            .collect();
        cards.shuffle(rng);

        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs on the board.
    pub fn pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    pub(crate) fn cards_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn entities(count: usize) -> Vec<Entity> {
        (0..count)
            .map(|i| Entity::new(format!("mon-{i}"), format!("https://img/{i}.png")))
            .collect()
    }

    #[test]
    fn builds_two_cards_per_entity_with_unique_ids() {
        for (pairs, seed) in [(1, 1), (6, 7), (8, 42), (12, 99)] {
            let mut rng = StdRng::seed_from_u64(seed);
            let board = Board::build(&entities(pairs), &mut rng).unwrap();

            assert_eq!(board.len(), pairs * 2);
            assert_eq!(board.pairs(), pairs);

            let ids: HashSet<_> = board.cards().iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), pairs * 2);

            let mut names: HashMap<&str, usize> = HashMap::new();
            for card in board.cards() {
                *names.entry(card.name.as_str()).or_default() += 1;
            }
            assert_eq!(names.len(), pairs);
            assert!(names.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn ids_k_and_k_plus_n_share_a_name() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::build(&entities(6), &mut rng).unwrap();

        for k in 0..6 {
            let a = board.card(CardId(k)).unwrap();
            let b = board.card(CardId(k + 6)).unwrap();
            assert_eq!(a.name, b.name);
            assert_eq!(a.image, b.image);
        }
    }

    #[test]
    fn cards_start_face_down() {
        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::build(&entities(4), &mut rng).unwrap();
        assert!(board.cards().iter().all(|c| !c.is_face_up()));
    }

    #[test]
    fn shuffle_moves_cards_across_seeds() {
        let orderings: HashSet<Vec<u32>> = (0..16)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                Board::build(&entities(6), &mut rng)
                    .unwrap()
                    .cards()
                    .iter()
                    .map(|c| c.id.0)
                    .collect()
            })
            .collect();
        assert!(orderings.len() > 1);
    }

    #[test]
    fn rejects_empty_and_duplicate_entities() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Board::build(&[], &mut rng), Err(BoardError::Empty));

        let dup = vec![Entity::new("pikachu", "a"), Entity::new("pikachu", "b")];
        assert_eq!(
            Board::build(&dup, &mut rng),
            Err(BoardError::DuplicateEntity {
                name: "pikachu".into()
            })
        );
    }
}
