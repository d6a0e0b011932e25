//! Starting-player roll-off and the snake build order for setup.
//!
//! Both work on player ids borrowed from the roster and never reorder or drop
//! anyone from it.

use crate::board::PlayerId;
use crate::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TurnOrderError {
    #[error("No players to order")]
    NoPlayers,

    #[error("Player {0} is not in the roster")]
    UnknownPlayer(PlayerId),
}

impl TurnOrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TurnOrderError::NoPlayers => ErrorKind::InvalidConfiguration,
            TurnOrderError::UnknownPlayer(_) => ErrorKind::NotFound,
        }
    }
}

/// How a roll-off treats rounds where every contender ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RollOffPolicy {
    /// Full-field ties that get re-rolled. One more and the first contender
    /// in roster order wins.
    pub max_stalemates: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOffState {
    /// Still rolling; `round` rounds played so far
    Rolling {
        contenders: Vec<PlayerId>,
        round: u32,
    },
    Resolved {
        winner: PlayerId,
        rounds: u32,
    },
}

/// Outcome of a finished roll-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOffOutcome {
    pub winner: PlayerId,
    pub rounds: u32,
}

/// A roll-off in progress, one round at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOff {
    state: RollOffState,
    policy: RollOffPolicy,
    stalemates: u32,
}

impl RollOff {
    /// Start a roll-off between `players`, in roster order
    pub fn new(players: &[PlayerId], policy: RollOffPolicy) -> Result<Self, TurnOrderError> {
        let state = match players {
            [] => return Err(TurnOrderError::NoPlayers),
            [only] => RollOffState::Resolved {
                winner: *only,
                rounds: 0,
            },
            _ => RollOffState::Rolling {
                contenders: players.to_vec(),
                round: 0,
            },
        };
        Ok(Self {
            state,
            policy,
            stalemates: 0,
        })
    }

    pub fn state(&self) -> &RollOffState {
        &self.state
    }

    pub fn outcome(&self) -> Option<RollOffOutcome> {
        match self.state {
            RollOffState::Resolved { winner, rounds } => Some(RollOffOutcome { winner, rounds }),
            RollOffState::Rolling { .. } => None,
        }
    }

    /// Roll once for every contender and keep those tied for the highest
    /// roll. Does nothing once resolved.
    pub fn roll_round<F>(&mut self, roll: &mut F) -> &RollOffState
    where
        F: FnMut(PlayerId) -> u8,
    {
        let (contenders, round) = match &self.state {
            RollOffState::Rolling { contenders, round } => (contenders, round + 1),
            RollOffState::Resolved { .. } => return &self.state,
        };

        let rolls: Vec<(PlayerId, u8)> = contenders.iter().map(|p| (*p, roll(*p))).collect();
        let best = rolls.iter().map(|(_, r)| *r).max().unwrap_or_default();
        let leaders: Vec<PlayerId> = rolls
            .iter()
            .filter(|(_, r)| *r == best)
            .map(|(p, _)| *p)
            .collect();
        debug!(round, ?rolls, ?leaders, "roll-off round");

        let stalemate = leaders.len() == contenders.len();
        if stalemate {
            self.stalemates += 1;
        }

        self.state = match leaders.as_slice() {
            [winner] => RollOffState::Resolved {
                winner: *winner,
                rounds: round,
            },
            [first, ..] if stalemate && self.stalemates > self.policy.max_stalemates => {
                RollOffState::Resolved {
                    winner: *first,
                    rounds: round,
                }
            }
            _ => RollOffState::Rolling {
                contenders: leaders,
                round,
            },
        };
        &self.state
    }
}

/// Roll until one player remains.
///
/// Every round either narrows the field or counts as a stalemate, and the
/// policy caps stalemates, so this always finishes.
pub fn resolve_starting_player<F>(
    players: &[PlayerId],
    mut roll: F,
    policy: RollOffPolicy,
) -> Result<RollOffOutcome, TurnOrderError>
where
    F: FnMut(PlayerId) -> u8,
{
    let mut roll_off = RollOff::new(players, policy)?;
    loop {
        if let Some(outcome) = roll_off.outcome() {
            return Ok(outcome);
        }
        roll_off.roll_round(&mut roll);
    }
}

/// Setup build order: one lap forward from `starting`, wrapping around the
/// roster, then the same lap backwards. Everyone appears twice.
pub fn snake_order(
    players: &[PlayerId],
    starting: PlayerId,
) -> Result<Vec<PlayerId>, TurnOrderError> {
    if players.is_empty() {
        return Err(TurnOrderError::NoPlayers);
    }
    let start = players
        .iter()
        .position(|p| *p == starting)
        .ok_or(TurnOrderError::UnknownPlayer(starting))?;

    let lap: Vec<PlayerId> = players[start..]
        .iter()
        .chain(&players[..start])
        .copied()
        .collect();
    let mut order = Vec::with_capacity(lap.len() * 2);
    order.extend(lap.iter().copied());
    order.extend(lap.iter().rev().copied());
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_constant_die_resolves_in_one_round() {
        for players in [vec![0, 1, 2], vec![0, 1, 2, 3]] {
            let mut calls = 0;
            let outcome = resolve_starting_player(
                &players,
                |_| {
                    calls += 1;
                    4
                },
                RollOffPolicy::default(),
            )
            .unwrap();

            assert_eq!(outcome, RollOffOutcome { winner: 0, rounds: 1 });
            assert_eq!(calls, players.len());
        }
    }

    #[test]
    fn test_highest_roll_wins() {
        let outcome =
            resolve_starting_player(&[0, 1, 2], |p| [3, 6, 2][p as usize], RollOffPolicy::default())
                .unwrap();
        assert_eq!(outcome, RollOffOutcome { winner: 1, rounds: 1 });
    }

    #[test]
    fn test_tied_leaders_roll_again() {
        // Round 1: players 1 and 3 tie on 6. Round 2: player 3 wins.
        let mut script = vec![2, 6, 5, 6, 1, 5].into_iter();
        let mut rolled = Vec::new();
        let outcome = resolve_starting_player(
            &[0, 1, 2, 3],
            |p| {
                rolled.push(p);
                script.next().unwrap()
            },
            RollOffPolicy::default(),
        )
        .unwrap();

        assert_eq!(outcome, RollOffOutcome { winner: 3, rounds: 2 });
        assert_eq!(rolled, vec![0, 1, 2, 3, 1, 3]);
    }

    #[test]
    fn test_narrowing_rounds_do_not_count_as_stalemates() {
        // 6,6,1 narrows; then 3,3 is the first stalemate and ends it
        let mut script = vec![6, 6, 1, 3, 3].into_iter();
        let outcome =
            resolve_starting_player(&[2, 0, 1], |_| script.next().unwrap(), RollOffPolicy::default())
                .unwrap();
        assert_eq!(outcome, RollOffOutcome { winner: 2, rounds: 2 });
    }

    #[test]
    fn test_stalemates_rerolled_up_to_policy() {
        let policy = RollOffPolicy { max_stalemates: 2 };
        let mut roll_off = RollOff::new(&[0, 1, 2], policy).unwrap();
        let mut die = |_| 5;

        roll_off.roll_round(&mut die);
        roll_off.roll_round(&mut die);
        assert_eq!(
            roll_off.state(),
            &RollOffState::Rolling {
                contenders: vec![0, 1, 2],
                round: 2
            }
        );

        roll_off.roll_round(&mut die);
        assert_eq!(roll_off.outcome(), Some(RollOffOutcome { winner: 0, rounds: 3 }));

        // Further rounds are ignored
        roll_off.roll_round(&mut |_| panic!("resolved roll-off must not roll"));
        assert_eq!(roll_off.outcome(), Some(RollOffOutcome { winner: 0, rounds: 3 }));
    }

    #[test]
    fn test_single_player_needs_no_roll() {
        let outcome = resolve_starting_player(
            &[3],
            |_| panic!("no roll expected"),
            RollOffPolicy::default(),
        )
        .unwrap();
        assert_eq!(outcome, RollOffOutcome { winner: 3, rounds: 0 });
    }

    #[test]
    fn test_empty_roster() {
        let err = resolve_starting_player(&[], |_| 1, RollOffPolicy::default()).unwrap_err();
        assert_eq!(err, TurnOrderError::NoPlayers);
        assert_eq!(snake_order(&[], 0), Err(TurnOrderError::NoPlayers));
    }

    #[test]
    fn test_snake_order_four_players_from_index_two() {
        let players = vec![0, 1, 2, 3];
        let order = snake_order(&players, 2).unwrap();

        assert_eq!(order, vec![2, 3, 0, 1, 1, 0, 3, 2]);
        for p in &players {
            assert_eq!(order.iter().filter(|x| *x == p).count(), 2);
        }
        let reversed: Vec<_> = order.iter().rev().copied().collect();
        assert_eq!(order, reversed);
        assert_eq!(players, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_snake_order_three_players() {
        assert_eq!(snake_order(&[0, 1, 2], 0).unwrap(), vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(snake_order(&[0, 1, 2], 2).unwrap(), vec![2, 0, 1, 1, 0, 2]);
    }

    #[test]
    fn test_snake_order_unknown_starter() {
        let err = snake_order(&[0, 1, 2], 7).unwrap_err();
        assert_eq!(err, TurnOrderError::UnknownPlayer(7));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
