//! Game session.
//!
//! `GameState` owns the board, the players and the bank, and is the only way
//! to change any of them. It walks through three phases:
//!
//! 1. `StartingRoll`: nothing placed yet, waiting for the roll-off
//! 2. `Setup`: players place a settlement and road each, in snake order
//! 3. `Main`: normal-play building
//!
//! Commands check everything before they change anything, so a command that
//! returns an error leaves the game exactly as it was.

use crate::actions::GameEvent;
use crate::bank::{BankError, ResourceBank};
use crate::board::{PlayerId, Resource, TileGrid};
use crate::config::{ConfigError, GameConfig};
use crate::errors::ErrorKind;
use crate::graph::{BoardGraph, EdgeId, GraphError, VertexId};
use crate::placement::{self, PlacementError};
use crate::player::Player;
use crate::turn_order::{self, RollOffOutcome, RollOffPolicy, TurnOrderError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Settlements each player places during setup
const SETUP_ROUNDS: usize = 2;

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the roll-off that picks the first player
    StartingRoll,

    /// Initial placement phase
    Setup {
        /// Snake build order, one entry per placement
        order: Vec<PlayerId>,
        /// Index into `order` of the player to place next
        cursor: usize,
    },

    /// Normal play
    Main,
}

/// Errors that can occur when running game commands
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn, waiting on player {0}")]
    NotYourTurn(PlayerId),

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    TurnOrder(#[from] TurnOrderError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotYourTurn(_) | GameError::InvalidPhase => ErrorKind::RuleViolation,
            GameError::UnknownPlayer(_) => ErrorKind::NotFound,
            GameError::Placement(e) => e.kind(),
            GameError::Bank(e) => e.kind(),
            GameError::TurnOrder(e) => e.kind(),
            GameError::Graph(e) => e.kind(),
            GameError::Config(e) => e.kind(),
        }
    }
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    grid: TileGrid,
    graph: BoardGraph,
    /// Roster in seat order; `players[i].id == i`
    players: Vec<Player>,
    bank: ResourceBank,
    phase: GamePhase,
    roll_off: RollOffPolicy,
}

impl GameState {
    /// New game with default settings and a random board
    pub fn new_game(player_count: u8) -> Result<Self, GameError> {
        Self::new_game_with_rng(player_count, &mut rand::thread_rng())
    }

    /// New game with default settings, drawing the board and deck from `rng`
    pub fn new_game_with_rng<R: Rng + ?Sized>(
        player_count: u8,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        Self::build(&GameConfig::with_players(player_count), rng)
    }

    /// New game from a config; a seeded config always yields the same game
    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        let mut rng = config.rng();
        Self::build(config, &mut rng)
    }

    fn build<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self, GameError> {
        config.validate()?;

        let grid = TileGrid::generate_with_rng(rng);
        let graph = BoardGraph::build(&grid)?;
        let players = config
            .names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name))
            .collect();
        let bank = ResourceBank::with_supply(config.bank_supply, rng);

        info!(
            players = config.player_count,
            vertices = graph.vertices().len(),
            edges = graph.edges().len(),
            "new game created"
        );
        Ok(Self {
            grid,
            graph,
            players,
            bank,
            phase: GamePhase::StartingRoll,
            roll_off: config.roll_off,
        })
    }

    // ==================== Accessors ====================

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn graph(&self) -> &BoardGraph {
        &self.graph
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn bank(&self) -> &ResourceBank {
        &self.bank
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    /// Who places next during setup
    pub fn setup_player(&self) -> Option<PlayerId> {
        match &self.phase {
            GamePhase::Setup { order, cursor } => order.get(*cursor).copied(),
            _ => None,
        }
    }

    // ==================== Query Methods ====================

    pub fn list_valid_initial_vertices(&self) -> Vec<VertexId> {
        placement::valid_initial_vertices(&self.graph)
    }

    pub fn list_valid_roads_from_vertex(&self, vertex: VertexId) -> Result<Vec<EdgeId>, GameError> {
        Ok(placement::valid_roads_from_vertex(&self.graph, vertex)?)
    }

    pub fn list_valid_roads(&self, player: PlayerId) -> Vec<EdgeId> {
        placement::valid_roads(&self.graph, player)
    }

    pub fn list_valid_settlements(&self, player: PlayerId) -> Vec<VertexId> {
        placement::valid_settlements(&self.graph, player)
    }

    pub fn list_valid_city_upgrades(&self, player: PlayerId) -> Vec<VertexId> {
        placement::valid_city_upgrades(&self.graph, player)
    }

    // ==================== Turn Order ====================

    /// Run a roll-off over the whole roster. The roster is left untouched.
    pub fn resolve_starting_player<F>(&self, roll: F) -> Result<RollOffOutcome, GameError>
    where
        F: FnMut(PlayerId) -> u8,
    {
        Ok(turn_order::resolve_starting_player(
            &self.player_ids(),
            roll,
            self.roll_off,
        )?)
    }

    pub fn build_snake_order(&self, starting: PlayerId) -> Result<Vec<PlayerId>, GameError> {
        Ok(turn_order::snake_order(&self.player_ids(), starting)?)
    }

    /// Resolve the starting player and open the setup phase
    pub fn start_setup<F>(&mut self, roll: F) -> Result<Vec<GameEvent>, GameError>
    where
        F: FnMut(PlayerId) -> u8,
    {
        if self.phase != GamePhase::StartingRoll {
            return Err(GameError::InvalidPhase);
        }
        let outcome = self.resolve_starting_player(roll)?;
        let order = self.build_snake_order(outcome.winner)?;

        info!(starting = outcome.winner, rounds = outcome.rounds, ?order, "setup started");
        self.phase = GamePhase::Setup {
            order: order.clone(),
            cursor: 0,
        };
        Ok(vec![
            GameEvent::StartingPlayerResolved {
                player: outcome.winner,
                rounds: outcome.rounds,
            },
            GameEvent::SetupStarted { order },
        ])
    }

    // ==================== Setup Phase ====================

    pub fn place_initial_settlement_and_road(
        &mut self,
        player: PlayerId,
        vertex: VertexId,
        edge: EdgeId,
    ) -> Result<Vec<GameEvent>, GameError> {
        let idx = self.player_index(player)?;
        let expected = self.setup_player().ok_or(GameError::InvalidPhase)?;
        if player != expected {
            return Err(GameError::NotYourTurn(expected));
        }

        placement::place_initial_settlement_and_road(&mut self.graph, vertex, edge, player)?;
        self.players[idx].victory_points += 1;

        let mut events = vec![
            GameEvent::SettlementBuilt { player, vertex },
            GameEvent::RoadBuilt { player, edge },
        ];
        if self.graph.buildings_owned(player) == SETUP_ROUNDS {
            events.extend(self.credit_setup_resources(idx, vertex));
        }
        events.extend(self.advance_setup());
        Ok(events)
    }

    /// One card per resource tile touching the second setup settlement.
    /// Anything the bank can't cover is skipped.
    fn credit_setup_resources(&mut self, idx: usize, vertex: VertexId) -> Vec<GameEvent> {
        let resources: Vec<Resource> = self
            .graph
            .vertex(vertex)
            .map(|v| {
                v.tiles
                    .iter()
                    .filter_map(|coord| self.grid.get_tile(coord))
                    .filter_map(|tile| tile.resource())
                    .collect()
            })
            .unwrap_or_default();

        let player = &mut self.players[idx];
        let mut events = Vec::with_capacity(resources.len());
        for resource in resources {
            match self.bank.grant(&mut player.resources, resource, 1) {
                Ok(()) => events.push(GameEvent::ResourcesGranted {
                    player: player.id,
                    resource,
                    amount: 1,
                }),
                Err(err) => {
                    warn!(player = player.id, %err, "setup resource skipped");
                    events.push(GameEvent::SetupResourceSkipped {
                        player: player.id,
                        resource,
                    });
                }
            }
        }
        events
    }

    fn advance_setup(&mut self) -> Vec<GameEvent> {
        let GamePhase::Setup { order, cursor } = &mut self.phase else {
            return Vec::new();
        };
        *cursor += 1;
        if *cursor < order.len() {
            debug!(next = order[*cursor], "setup advanced");
            return Vec::new();
        }

        info!("setup completed");
        self.phase = GamePhase::Main;
        vec![GameEvent::SetupCompleted]
    }

    // ==================== Building ====================

    pub fn place_road(&mut self, player: PlayerId, edge: EdgeId) -> Result<Vec<GameEvent>, GameError> {
        self.require_main()?;
        self.player_index(player)?;

        placement::place_road(&mut self.graph, edge, player)?;
        Ok(vec![GameEvent::RoadBuilt { player, edge }])
    }

    pub fn place_settlement(
        &mut self,
        player: PlayerId,
        vertex: VertexId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.require_main()?;
        let idx = self.player_index(player)?;

        placement::place_settlement(&mut self.graph, vertex, player)?;
        self.players[idx].victory_points += 1;
        Ok(vec![GameEvent::SettlementBuilt { player, vertex }])
    }

    /// Upgrade a settlement; the city is worth one more point than it was
    pub fn upgrade_to_city(
        &mut self,
        player: PlayerId,
        vertex: VertexId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.require_main()?;
        let idx = self.player_index(player)?;

        placement::upgrade_to_city(&mut self.graph, vertex, player)?;
        self.players[idx].victory_points += 1;
        Ok(vec![GameEvent::CityBuilt { player, vertex }])
    }

    // ==================== Bank ====================

    /// Move resources from the bank to a player, all or nothing
    pub fn grant_resources(
        &mut self,
        player: PlayerId,
        resource: Resource,
        amount: u32,
    ) -> Result<Vec<GameEvent>, GameError> {
        let idx = self.player_index(player)?;

        self.bank
            .grant(&mut self.players[idx].resources, resource, amount)?;
        debug!(player, ?resource, amount, "resources granted");
        Ok(vec![GameEvent::ResourcesGranted {
            player,
            resource,
            amount,
        }])
    }

    pub fn draw_development_card(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.require_main()?;
        let idx = self.player_index(player)?;

        let card = self.bank.draw_development_card()?;
        self.players[idx].add_dev_card(card);
        debug!(player, ?card, left = self.bank.deck_len(), "development card drawn");
        Ok(vec![GameEvent::DevelopmentCardDrawn { player, card }])
    }

    // ==================== Helper Methods ====================

    fn player_index(&self, player: PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    fn require_main(&self) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Main => Ok(()),
            _ => Err(GameError::InvalidPhase),
        }
    }
}
