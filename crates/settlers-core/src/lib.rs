//! Settlers - board core for a hex settlement-building game
//!
//! This crate provides the shared board state for 3 to 4 players:
//! - Hex coordinate system for tiles, corners and sides
//! - The generated tile grid and the vertex/edge graph derived from it
//! - Placement rules for setup and normal play
//! - Starting-player roll-off and snake build order
//! - The resource bank and development deck
//!
//! # Modules
//!
//! - [`hex`]: Axial coordinates and canonical corner/side keys
//! - [`board`]: Tiles, resources, harbors and grid generation
//! - [`graph`]: Vertex/edge graph with stable ids
//! - [`placement`]: Placement validation and commands
//! - [`turn_order`]: Roll-off and snake order
//! - [`bank`]: Finite resource supply and development deck
//! - [`game`]: `GameState`, the session that owns all of the above
//!
//! Everything is synchronous and single-threaded. Randomness comes from an
//! injected `rand::Rng`, so seeded games are reproducible.

pub mod actions;
pub mod bank;
pub mod board;
pub mod config;
pub mod errors;
pub mod game;
pub mod graph;
pub mod hex;
pub mod placement;
pub mod player;
pub mod turn_order;

// Re-export commonly used types
pub use actions::GameEvent;
pub use bank::{BankError, ResourceBank};
pub use board::{Harbor, HarborPlacement, PlayerId, Resource, Tile, TileGrid, TileType};
pub use config::{ConfigError, GameConfig};
pub use errors::ErrorKind;
pub use game::{GameError, GamePhase, GameState};
pub use graph::{
    BoardGraph, Edge, EdgeBuilding, EdgeId, GraphError, Port, Vertex, VertexBuilding, VertexId,
};
pub use hex::{EdgeCoord, EdgeDirection, HexCoord, VertexCoord, VertexDirection};
pub use placement::PlacementError;
pub use player::{DevelopmentCard, Player, ResourceHand};
pub use turn_order::{RollOff, RollOffOutcome, RollOffPolicy, RollOffState, TurnOrderError};
