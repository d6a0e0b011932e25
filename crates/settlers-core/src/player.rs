//! Player state and resource management.
//!
//! This module contains:
//! - Player struct with resources, victory points and development cards
//! - ResourceHand for managing resource counts
//! - Development card types and the standard deck

use crate::board::{PlayerId, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DevelopmentCard {
    Knight,
    VictoryPoint,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
}

impl DevelopmentCard {
    /// Create the standard development card deck (25 cards, unshuffled)
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        const DISTRIBUTION: [(DevelopmentCard, usize); 5] = [
            (DevelopmentCard::Knight, 14),
            (DevelopmentCard::VictoryPoint, 5),
            (DevelopmentCard::RoadBuilding, 2),
            (DevelopmentCard::YearOfPlenty, 2),
            (DevelopmentCard::Monopoly, 2),
        ];

        let mut deck = Vec::with_capacity(25);
        for (card, count) in DISTRIBUTION {
            deck.extend(std::iter::repeat(card).take(count));
        }
        deck
    }
}

/// A hand of resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub brick: u32,
    pub lumber: u32,
    pub ore: u32,
    pub grain: u32,
    pub wool: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(brick: u32, lumber: u32, ore: u32, grain: u32, wool: u32) -> Self {
        Self {
            brick,
            lumber,
            ore,
            grain,
            wool,
        }
    }

    /// A hand holding `amount` of every resource
    pub fn uniform(amount: u32) -> Self {
        Self::with_amounts(amount, amount, amount, amount, amount)
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.brick + self.lumber + self.ore + self.grain + self.wool
    }

    /// Check if hand is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Brick => &mut self.brick,
            Resource::Lumber => &mut self.lumber,
            Resource::Ore => &mut self.ore,
            Resource::Grain => &mut self.grain,
            Resource::Wool => &mut self.wool,
        }
    }

    /// Set count of a specific resource
    pub fn set(&mut self, resource: Resource, count: u32) {
        *self.slot_mut(resource) = count;
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot_mut(resource) += amount;
    }

    /// Remove `amount` of a resource, or nothing at all if the hand holds less
    pub fn try_remove(&mut self, resource: Resource, amount: u32) -> bool {
        let slot = self.slot_mut(resource);
        match slot.checked_sub(amount) {
            Some(left) => {
                *slot = left;
                true
            }
            None => false,
        }
    }

    /// Convert to HashMap for iteration (zero counts omitted)
    pub fn to_map(&self) -> HashMap<Resource, u32> {
        Resource::ALL
            .into_iter()
            .map(|r| (r, self.get(r)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat index, also the position in the roster
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Current resources
    pub resources: ResourceHand,
    /// Points from buildings on the board
    pub victory_points: u32,
    /// Development cards held, by kind
    pub dev_cards: HashMap<DevelopmentCard, u32>,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            resources: ResourceHand::new(),
            victory_points: 0,
            dev_cards: HashMap::new(),
        }
    }

    /// Number of development cards of a kind in hand
    pub fn dev_card_count(&self, card: DevelopmentCard) -> u32 {
        self.dev_cards.get(&card).copied().unwrap_or(0)
    }

    pub fn add_dev_card(&mut self, card: DevelopmentCard) {
        *self.dev_cards.entry(card).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_hand_total() {
        let hand = ResourceHand::with_amounts(1, 2, 3, 4, 5);
        assert_eq!(hand.total(), 15);
        assert_eq!(hand.get(Resource::Grain), 4);
    }

    #[test]
    fn test_try_remove_is_all_or_nothing() {
        let mut hand = ResourceHand::with_amounts(0, 0, 3, 0, 0);
        assert!(!hand.try_remove(Resource::Ore, 5));
        assert_eq!(hand.ore, 3);

        assert!(hand.try_remove(Resource::Ore, 3));
        assert!(hand.is_empty());
    }

    #[test]
    fn test_to_map_skips_empty() {
        let hand = ResourceHand::with_amounts(2, 0, 0, 1, 0);
        let map = hand.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Resource::Brick], 2);
    }

    #[test]
    fn test_dev_card_deck_size() {
        let deck = DevelopmentCard::standard_deck();
        assert_eq!(deck.len(), 25);

        let knights = deck
            .iter()
            .filter(|c| matches!(c, DevelopmentCard::Knight))
            .count();
        assert_eq!(knights, 14);
    }

    #[test]
    fn test_player_dev_card_counts() {
        let mut player = Player::new(0, "Test".to_string());
        assert_eq!(player.dev_card_count(DevelopmentCard::Monopoly), 0);

        player.add_dev_card(DevelopmentCard::Monopoly);
        player.add_dev_card(DevelopmentCard::Monopoly);
        assert_eq!(player.dev_card_count(DevelopmentCard::Monopoly), 2);
    }
}
