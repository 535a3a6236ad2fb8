//! Runtime cards: [`Card`], [`Hand`] and [`Deck`].
//!
//! A `Card` is one copy of a template owned by a side. The deck is a FIFO
//! queue of undrawn cards, the hand a bounded list. Newly drawn cards go to
//! the front of the hand.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CardInstanceId, GameRng, IdAllocator, PlayerId};

use super::definition::CardData;

/// One copy of a card template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardInstanceId,
    pub data: Arc<CardData>,
    pub owner: PlayerId,
}

impl Card {
    /// Create a card instance.
    #[must_use]
    pub fn new(id: CardInstanceId, data: Arc<CardData>, owner: PlayerId) -> Self {
        Self { id, data, owner }
    }

    /// Mana cost of the template.
    #[must_use]
    pub fn cost(&self) -> i32 {
        self.data.cost
    }

    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.id, self.data.name)
    }
}

/// Cards a side can cast. Never holds more than its capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    capacity: usize,
}

impl Hand {
    /// Create an empty hand.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of cards.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }

    /// Put a card at the front of the hand.
    ///
    /// A full hand hands the card back.
    pub fn insert(&mut self, card: Card) -> Result<(), Card> {
        if self.is_full() {
            return Err(card);
        }
        self.cards.insert(0, card);
        Ok(())
    }

    /// Look up a card by id.
    #[must_use]
    pub fn get(&self, id: CardInstanceId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: CardInstanceId) -> bool {
        self.get(id).is_some()
    }

    /// The front card, which the commander plays.
    #[must_use]
    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    /// Remove a card by id.
    pub fn remove(&mut self, id: CardInstanceId) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(pos))
    }

    /// Remove the card at a position.
    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }

    /// Ids of every card, front first.
    #[must_use]
    pub fn ids(&self) -> Vec<CardInstanceId> {
        self.cards.iter().map(|c| c.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

/// Undrawn cards, drawn from the front.
///
/// Backed by `im::Vector` so a battle snapshot shares structure with the
/// live deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deck with one card per template, in order.
    #[must_use]
    pub fn from_templates(
        templates: &[Arc<CardData>],
        owner: PlayerId,
        ids: &mut IdAllocator,
    ) -> Self {
        let cards = templates
            .iter()
            .map(|data| Card::new(ids.next_card(), Arc::clone(data), owner))
            .collect();
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Take the front card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// The front card without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Add a card at the back.
    pub fn push_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
