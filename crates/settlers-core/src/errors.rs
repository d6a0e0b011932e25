//! Error taxonomy shared by every component error.

use serde::{Deserialize, Serialize};

/// Coarse classification of a failed request.
///
/// Every component error maps onto one of these through its `kind()` method,
/// so a driving loop can decide how to re-prompt without matching on each
/// variant. None of them are fatal; the state is unchanged after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown vertex, edge or player
    NotFound,
    /// Vertex or edge already owned
    AlreadyOccupied,
    /// Distance, connectivity, turn or phase rule broken
    RuleViolation,
    /// Bank cannot cover the request
    InsufficientSupply,
    /// Bad player count or malformed board
    InvalidConfiguration,
}
