//! Headless setup driver.
//!
//! Rolls a seeded die for the starting player, then lets every player in
//! snake order take the first legal settlement and road.

use rand::Rng;
use serde::Serialize;
use settlers_core::{
    GameError, GameEvent, GamePhase, GameState, PlayerId, ResourceHand, VertexId,
};
use tracing::{debug, info};

/// Where a game stands once setup is over
#[derive(Debug, Clone, Serialize)]
pub struct SetupSummary {
    pub starting_player: PlayerId,
    pub order: Vec<PlayerId>,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub victory_points: u32,
    pub settlements: Vec<VertexId>,
    pub resources: ResourceHand,
}

/// Play the roll-off and the whole setup phase
pub fn run_setup<R: Rng + ?Sized>(
    game: &mut GameState,
    die: &mut R,
) -> Result<SetupSummary, GameError> {
    let events = game.start_setup(|player| {
        let roll = die.gen_range(1..=6);
        debug!(player, roll, "rolled for start");
        roll
    })?;
    log_events(&events);

    let (starting_player, order) = match game.phase() {
        GamePhase::Setup { order, .. } => (order[0], order.clone()),
        _ => return Err(GameError::InvalidPhase),
    };

    while let Some(player) = game.setup_player() {
        let vertex = game
            .list_valid_initial_vertices()
            .first()
            .copied()
            .ok_or(GameError::InvalidPhase)?;
        let edge = game
            .list_valid_roads_from_vertex(vertex)?
            .first()
            .copied()
            .ok_or(GameError::InvalidPhase)?;

        let events = game.place_initial_settlement_and_road(player, vertex, edge)?;
        log_events(&events);
    }

    Ok(summarize(game, starting_player, order))
}

fn summarize(game: &GameState, starting_player: PlayerId, order: Vec<PlayerId>) -> SetupSummary {
    let players = game
        .players()
        .iter()
        .map(|p| PlayerSummary {
            id: p.id,
            name: p.name.clone(),
            victory_points: p.victory_points,
            settlements: game
                .graph()
                .vertices()
                .iter()
                .filter(|v| v.building.owner() == Some(p.id))
                .map(|v| v.id)
                .collect(),
            resources: p.resources.clone(),
        })
        .collect();

    SetupSummary {
        starting_player,
        order,
        players,
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::StartingPlayerResolved { player, rounds } => {
                info!(player, rounds, "starting player resolved")
            }
            GameEvent::SetupStarted { order } => info!(?order, "snake order"),
            GameEvent::SettlementBuilt { player, vertex } => {
                info!(player, %vertex, "settlement built")
            }
            GameEvent::RoadBuilt { player, edge } => info!(player, %edge, "road built"),
            GameEvent::ResourcesGranted {
                player,
                resource,
                amount,
            } => info!(player, ?resource, amount, "resources granted"),
            GameEvent::SetupResourceSkipped { player, resource } => {
                info!(player, ?resource, "bank empty, credit skipped")
            }
            GameEvent::SetupCompleted => info!("setup completed"),
            other => debug!(?other, "event"),
        }
    }
}
