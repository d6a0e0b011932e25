//! The bank: finite resource supply and the development card deck.

use crate::board::Resource;
use crate::errors::ErrorKind;
use crate::player::{DevelopmentCard, ResourceHand};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Starting supply of each resource
pub const STANDARD_SUPPLY: u32 = 19;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BankError {
    #[error("Bank holds {available} {resource:?}, {requested} requested")]
    InsufficientSupply {
        resource: Resource,
        requested: u32,
        available: u32,
    },

    #[error("No development cards left in deck")]
    DeckEmpty,
}

impl BankError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InsufficientSupply
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBank {
    supply: ResourceHand,
    /// Drawn from the front
    deck: VecDeque<DevelopmentCard>,
}

impl ResourceBank {
    /// Full supply and a freshly shuffled deck
    pub fn standard_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_supply(STANDARD_SUPPLY, rng)
    }

    pub fn with_supply<R: Rng + ?Sized>(per_resource: u32, rng: &mut R) -> Self {
        let mut deck = DevelopmentCard::standard_deck();
        deck.shuffle(rng);
        Self::from_parts(ResourceHand::uniform(per_resource), deck)
    }

    /// A bank with an explicit supply and deck order
    pub fn from_parts(supply: ResourceHand, deck: Vec<DevelopmentCard>) -> Self {
        Self {
            supply,
            deck: deck.into(),
        }
    }

    pub fn supply(&self) -> &ResourceHand {
        &self.supply
    }

    pub fn available(&self, resource: Resource) -> u32 {
        self.supply.get(resource)
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Move `amount` of `resource` into `hand`.
    ///
    /// Nothing moves unless the whole amount is available.
    pub fn grant(
        &mut self,
        hand: &mut ResourceHand,
        resource: Resource,
        amount: u32,
    ) -> Result<(), BankError> {
        if !self.supply.try_remove(resource, amount) {
            return Err(BankError::InsufficientSupply {
                resource,
                requested: amount,
                available: self.supply.get(resource),
            });
        }
        hand.add(resource, amount);
        Ok(())
    }

    /// Take the front card of the deck
    pub fn draw_development_card(&mut self) -> Result<DevelopmentCard, BankError> {
        self.deck.pop_front().ok_or(BankError::DeckEmpty)
    }
}
