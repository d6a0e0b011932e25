//! Events produced by game commands.
//!
//! Every successful command on [`crate::game::GameState`] returns the events
//! it caused, in the order they happened. A failed command returns none.

use crate::board::{PlayerId, Resource};
use crate::graph::{EdgeId, VertexId};
use crate::player::DevelopmentCard;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The roll-off picked who places first
    StartingPlayerResolved { player: PlayerId, rounds: u32 },

    /// Setup began with this build order
    SetupStarted { order: Vec<PlayerId> },

    /// Every setup placement is done; normal play begins
    SetupCompleted,

    /// A settlement was built
    SettlementBuilt { player: PlayerId, vertex: VertexId },

    /// A road was built
    RoadBuilt { player: PlayerId, edge: EdgeId },

    /// A settlement was upgraded to a city
    CityBuilt { player: PlayerId, vertex: VertexId },

    /// Resources moved from the bank to a player
    ResourcesGranted {
        player: PlayerId,
        resource: Resource,
        amount: u32,
    },

    /// The bank could not cover a setup credit, so it was skipped
    SetupResourceSkipped { player: PlayerId, resource: Resource },

    /// A development card was drawn from the deck
    DevelopmentCardDrawn {
        player: PlayerId,
        card: DevelopmentCard,
    },
}
