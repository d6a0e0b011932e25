//! Placement rules for settlements, cities and roads.
//!
//! Two rule sets exist:
//! - setup: a settlement anywhere the distance rule allows, plus a road touching it
//! - normal play: roads extend the player's network, settlements sit on it
//!
//! Every `valid_*` query is a pure read. Every command runs all of its checks
//! before touching the graph, so a failed command leaves the board unchanged.

use crate::board::PlayerId;
use crate::errors::ErrorKind;
use crate::graph::{BoardGraph, Edge, EdgeBuilding, EdgeId, Vertex, VertexBuilding, VertexId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when validating a placement
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("Unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("Unknown edge {0}")]
    UnknownEdge(EdgeId),

    #[error("Vertex {0} is already occupied")]
    OccupiedVertex(VertexId),

    #[error("Vertex {vertex} is next to a building at {neighbor}")]
    AdjacentConflict { vertex: VertexId, neighbor: VertexId },

    #[error("Edge {0} already has a road")]
    OccupiedEdge(EdgeId),

    #[error("Edge {edge} does not touch vertex {vertex}")]
    Disconnected { vertex: VertexId, edge: EdgeId },

    #[error("Edge {0} is not connected to the player's buildings or roads")]
    NoConnection(EdgeId),

    #[error("Vertex {0} is not reached by one of the player's roads")]
    NoRoadConnection(VertexId),

    #[error("Vertex {0} does not hold a settlement of this player")]
    NotOwnSettlement(VertexId),
}

impl PlacementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlacementError::UnknownVertex(_) | PlacementError::UnknownEdge(_) => {
                ErrorKind::NotFound
            }
            PlacementError::OccupiedVertex(_) | PlacementError::OccupiedEdge(_) => {
                ErrorKind::AlreadyOccupied
            }
            PlacementError::AdjacentConflict { .. }
            | PlacementError::Disconnected { .. }
            | PlacementError::NoConnection(_)
            | PlacementError::NoRoadConnection(_)
            | PlacementError::NotOwnSettlement(_) => ErrorKind::RuleViolation,
        }
    }
}

fn vertex(graph: &BoardGraph, id: VertexId) -> Result<&Vertex, PlacementError> {
    graph.vertex(id).ok_or(PlacementError::UnknownVertex(id))
}

fn edge(graph: &BoardGraph, id: EdgeId) -> Result<&Edge, PlacementError> {
    graph.edge(id).ok_or(PlacementError::UnknownEdge(id))
}

/// Vertex exists, is empty, and no neighbor holds a building of any player
fn check_distance_rule(graph: &BoardGraph, id: VertexId) -> Result<&Vertex, PlacementError> {
    let site = vertex(graph, id)?;
    if site.building != VertexBuilding::Empty {
        return Err(PlacementError::OccupiedVertex(id));
    }
    let blocked = site.adjacent.iter().copied().find(|n| {
        graph
            .vertex(*n)
            .is_some_and(|v| v.building.owner().is_some())
    });
    match blocked {
        Some(neighbor) => Err(PlacementError::AdjacentConflict {
            vertex: id,
            neighbor,
        }),
        None => Ok(site),
    }
}

fn owns_road(graph: &BoardGraph, id: EdgeId, player: PlayerId) -> bool {
    graph
        .edge(id)
        .is_some_and(|e| e.building == EdgeBuilding::Road(player))
}

// ==================== Setup Phase ====================

/// Check a setup settlement and its road without placing them
pub fn check_initial_placement(
    graph: &BoardGraph,
    vertex_id: VertexId,
    edge_id: EdgeId,
) -> Result<(), PlacementError> {
    check_distance_rule(graph, vertex_id)?;

    let road = edge(graph, edge_id)?;
    if road.building != EdgeBuilding::Empty {
        return Err(PlacementError::OccupiedEdge(edge_id));
    }
    if !road.connects(vertex_id) {
        return Err(PlacementError::Disconnected {
            vertex: vertex_id,
            edge: edge_id,
        });
    }
    Ok(())
}

/// Place a setup settlement and its road as one step
pub fn place_initial_settlement_and_road(
    graph: &mut BoardGraph,
    vertex_id: VertexId,
    edge_id: EdgeId,
    player: PlayerId,
) -> Result<(), PlacementError> {
    check_initial_placement(graph, vertex_id, edge_id)?;

    graph.set_vertex_building(vertex_id, VertexBuilding::Settlement(player));
    graph.set_edge_building(edge_id, EdgeBuilding::Road(player));
    debug!(player, vertex = %vertex_id, edge = %edge_id, "initial settlement and road placed");
    Ok(())
}

/// Every vertex a setup settlement may go on
pub fn valid_initial_vertices(graph: &BoardGraph) -> Vec<VertexId> {
    graph
        .vertices()
        .iter()
        .filter(|v| check_distance_rule(graph, v.id).is_ok())
        .map(|v| v.id)
        .collect()
}

/// Free edges touching a vertex, i.e. the setup road choices for it
pub fn valid_roads_from_vertex(
    graph: &BoardGraph,
    vertex_id: VertexId,
) -> Result<Vec<EdgeId>, PlacementError> {
    let site = vertex(graph, vertex_id)?;
    Ok(site
        .edges
        .iter()
        .copied()
        .filter(|e| {
            graph
                .edge(*e)
                .is_some_and(|edge| edge.building == EdgeBuilding::Empty)
        })
        .collect())
}

// ==================== Normal Play ====================

/// Check a normal-play road without placing it
pub fn check_road(graph: &BoardGraph, edge_id: EdgeId, player: PlayerId) -> Result<(), PlacementError> {
    let road = edge(graph, edge_id)?;
    if road.building != EdgeBuilding::Empty {
        return Err(PlacementError::OccupiedEdge(edge_id));
    }

    let connected = road.vertices.iter().any(|end| {
        graph.vertex(*end).is_some_and(|v| {
            v.building.owner() == Some(player)
                || v
                    .edges
                    .iter()
                    .any(|e| *e != edge_id && owns_road(graph, *e, player))
        })
    });
    if !connected {
        return Err(PlacementError::NoConnection(edge_id));
    }
    Ok(())
}

pub fn place_road(
    graph: &mut BoardGraph,
    edge_id: EdgeId,
    player: PlayerId,
) -> Result<(), PlacementError> {
    check_road(graph, edge_id, player)?;
    graph.set_edge_building(edge_id, EdgeBuilding::Road(player));
    debug!(player, edge = %edge_id, "road placed");
    Ok(())
}

/// Every edge the player may extend their network onto
pub fn valid_roads(graph: &BoardGraph, player: PlayerId) -> Vec<EdgeId> {
    graph
        .edges()
        .iter()
        .filter(|e| check_road(graph, e.id, player).is_ok())
        .map(|e| e.id)
        .collect()
}

/// Check a normal-play settlement without placing it
pub fn check_settlement(
    graph: &BoardGraph,
    vertex_id: VertexId,
    player: PlayerId,
) -> Result<(), PlacementError> {
    let site = check_distance_rule(graph, vertex_id)?;
    if !site.edges.iter().any(|e| owns_road(graph, *e, player)) {
        return Err(PlacementError::NoRoadConnection(vertex_id));
    }
    Ok(())
}

pub fn place_settlement(
    graph: &mut BoardGraph,
    vertex_id: VertexId,
    player: PlayerId,
) -> Result<(), PlacementError> {
    check_settlement(graph, vertex_id, player)?;
    graph.set_vertex_building(vertex_id, VertexBuilding::Settlement(player));
    debug!(player, vertex = %vertex_id, "settlement placed");
    Ok(())
}

/// Every vertex the player may settle during normal play
pub fn valid_settlements(graph: &BoardGraph, player: PlayerId) -> Vec<VertexId> {
    graph
        .vertices()
        .iter()
        .filter(|v| check_settlement(graph, v.id, player).is_ok())
        .map(|v| v.id)
        .collect()
}

/// Turn one of the player's settlements into a city
pub fn upgrade_to_city(
    graph: &mut BoardGraph,
    vertex_id: VertexId,
    player: PlayerId,
) -> Result<(), PlacementError> {
    let site = vertex(graph, vertex_id)?;
    if site.building != VertexBuilding::Settlement(player) {
        return Err(PlacementError::NotOwnSettlement(vertex_id));
    }
    graph.set_vertex_building(vertex_id, VertexBuilding::City(player));
    debug!(player, vertex = %vertex_id, "settlement upgraded to city");
    Ok(())
}

/// Every settlement the player could upgrade
pub fn valid_city_upgrades(graph: &BoardGraph, player: PlayerId) -> Vec<VertexId> {
    graph
        .vertices()
        .iter()
        .filter(|v| v.building == VertexBuilding::Settlement(player))
        .map(|v| v.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileGrid;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn graph() -> BoardGraph {
        let grid = TileGrid::generate_with_rng(&mut StdRng::seed_from_u64(11));
        BoardGraph::build(&grid).unwrap()
    }

    /// A vertex with three neighbors, well inside the board
    fn inland_vertex(graph: &BoardGraph) -> VertexId {
        graph
            .vertices()
            .iter()
            .find(|v| v.tiles.len() == 3)
            .map(|v| v.id)
            .unwrap()
    }

    #[test]
    fn test_initial_placement_claims_both() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let e = graph.vertex(v).unwrap().edges[0];

        place_initial_settlement_and_road(&mut graph, v, e, 1).unwrap();
        assert_eq!(graph.vertex(v).unwrap().building, VertexBuilding::Settlement(1));
        assert_eq!(graph.edge(e).unwrap().building, EdgeBuilding::Road(1));
    }

    #[test]
    fn test_distance_rule_over_every_vertex() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let e = graph.vertex(v).unwrap().edges[0];
        place_initial_settlement_and_road(&mut graph, v, e, 0).unwrap();

        for candidate in graph.vertices() {
            if candidate.id == v {
                continue;
            }
            let owned_neighbor = candidate
                .adjacent
                .iter()
                .any(|n| graph.vertex(*n).unwrap().building.owner().is_some());
            let free_edge = candidate
                .edges
                .iter()
                .copied()
                .find(|e| graph.edge(*e).unwrap().building == EdgeBuilding::Empty)
                .unwrap();

            let mut attempt = graph.clone();
            let result = place_initial_settlement_and_road(&mut attempt, candidate.id, free_edge, 1);
            if owned_neighbor {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::RuleViolation);
                assert!(matches!(err, PlacementError::AdjacentConflict { .. }));
                assert_eq!(attempt, graph, "failed placement must not mutate");
            } else {
                assert!(result.is_ok(), "{:?} should be free", candidate.id);
            }
        }
    }

    #[test]
    fn test_occupied_vertex_and_edge() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let edges = graph.vertex(v).unwrap().edges.clone();
        place_initial_settlement_and_road(&mut graph, v, edges[0], 0).unwrap();

        let err = check_initial_placement(&graph, v, edges[1]).unwrap_err();
        assert_eq!(err, PlacementError::OccupiedVertex(v));
        assert_eq!(err.kind(), ErrorKind::AlreadyOccupied);

        // Far end of the claimed road is blocked by the distance rule first
        let far = graph
            .edge(edges[0])
            .unwrap()
            .vertices
            .into_iter()
            .find(|x| *x != v)
            .unwrap();
        assert!(matches!(
            check_initial_placement(&graph, far, edges[0]),
            Err(PlacementError::AdjacentConflict { .. })
        ));
    }

    #[test]
    fn test_initial_road_must_touch_settlement() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let foreign = graph
            .edges()
            .iter()
            .find(|e| !e.connects(v))
            .map(|e| e.id)
            .unwrap();

        let before = graph.clone();
        let err = place_initial_settlement_and_road(&mut graph, v, foreign, 0).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Disconnected {
                vertex: v,
                edge: foreign
            }
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn test_unknown_ids() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let e = graph.vertex(v).unwrap().edges[0];

        let err = place_initial_settlement_and_road(&mut graph, VertexId(999), e, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = place_initial_settlement_and_road(&mut graph, v, EdgeId(999), 0).unwrap_err();
        assert_eq!(err, PlacementError::UnknownEdge(EdgeId(999)));
        assert_eq!(graph.vertex(v).unwrap().building, VertexBuilding::Empty);
    }

    #[test]
    fn test_valid_initial_vertices_shrink() {
        let mut graph = graph();
        assert_eq!(valid_initial_vertices(&graph).len(), 54);

        let v = inland_vertex(&graph);
        let e = graph.vertex(v).unwrap().edges[0];
        place_initial_settlement_and_road(&mut graph, v, e, 0).unwrap();

        // The settlement and its three neighbors drop out
        assert_eq!(valid_initial_vertices(&graph).len(), 50);
    }

    #[test]
    fn test_valid_roads_from_vertex() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        assert_eq!(valid_roads_from_vertex(&graph, v).unwrap().len(), 3);

        let e = graph.vertex(v).unwrap().edges[0];
        place_initial_settlement_and_road(&mut graph, v, e, 0).unwrap();
        let free = valid_roads_from_vertex(&graph, v).unwrap();
        assert_eq!(free.len(), 2);
        assert!(!free.contains(&e));

        assert_eq!(
            valid_roads_from_vertex(&graph, VertexId(500)),
            Err(PlacementError::UnknownVertex(VertexId(500)))
        );
    }

    #[test]
    fn test_road_connectivity() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let edges = graph.vertex(v).unwrap().edges.clone();
        place_initial_settlement_and_road(&mut graph, v, edges[0], 0).unwrap();

        // Both other edges at the settlement are open to the owner only
        for e in &edges[1..] {
            assert!(check_road(&graph, *e, 0).is_ok());
            assert_eq!(check_road(&graph, *e, 1), Err(PlacementError::NoConnection(*e)));
        }
        assert_eq!(
            check_road(&graph, edges[0], 0),
            Err(PlacementError::OccupiedEdge(edges[0]))
        );

        // Roads extend from the far end of an owned road
        let far = graph
            .edge(edges[0])
            .unwrap()
            .vertices
            .into_iter()
            .find(|x| *x != v)
            .unwrap();
        let extension = graph
            .vertex(far)
            .unwrap()
            .edges
            .iter()
            .copied()
            .find(|e| *e != edges[0])
            .unwrap();
        assert!(valid_roads(&graph, 0).contains(&extension));
        place_road(&mut graph, extension, 0).unwrap();
        assert_eq!(graph.edge(extension).unwrap().building, EdgeBuilding::Road(0));

        assert!(valid_roads(&graph, 1).is_empty());
    }

    #[test]
    fn test_normal_settlement_needs_road() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let e = graph.vertex(v).unwrap().edges[0];
        place_initial_settlement_and_road(&mut graph, v, e, 0).unwrap();

        // Walk two roads away so the distance rule is satisfied
        let far = graph.edge(e).unwrap().vertices.into_iter().find(|x| *x != v).unwrap();
        let next = graph
            .vertex(far)
            .unwrap()
            .edges
            .iter()
            .copied()
            .find(|x| *x != e)
            .unwrap();
        let target = graph
            .edge(next)
            .unwrap()
            .vertices
            .into_iter()
            .find(|x| *x != far)
            .unwrap();

        assert_eq!(
            check_settlement(&graph, target, 0),
            Err(PlacementError::NoRoadConnection(target))
        );
        place_road(&mut graph, next, 0).unwrap();

        assert!(valid_settlements(&graph, 0).contains(&target));
        assert!(!valid_settlements(&graph, 1).contains(&target));
        place_settlement(&mut graph, target, 0).unwrap();
        assert_eq!(
            graph.vertex(target).unwrap().building,
            VertexBuilding::Settlement(0)
        );

        // The road's middle vertex is adjacent to both settlements
        assert!(matches!(
            check_settlement(&graph, far, 0),
            Err(PlacementError::AdjacentConflict { .. })
        ));
    }

    #[test]
    fn test_city_upgrade() {
        let mut graph = graph();
        let v = inland_vertex(&graph);
        let e = graph.vertex(v).unwrap().edges[0];
        place_initial_settlement_and_road(&mut graph, v, e, 2).unwrap();

        assert_eq!(valid_city_upgrades(&graph, 2), vec![v]);
        assert_eq!(
            upgrade_to_city(&mut graph, v, 1),
            Err(PlacementError::NotOwnSettlement(v))
        );

        upgrade_to_city(&mut graph, v, 2).unwrap();
        assert_eq!(graph.vertex(v).unwrap().building, VertexBuilding::City(2));
        assert!(valid_city_upgrades(&graph, 2).is_empty());
        assert_eq!(graph.building_points(2), 2);

        // A city cannot be upgraded again
        assert_eq!(
            upgrade_to_city(&mut graph, v, 2),
            Err(PlacementError::NotOwnSettlement(v))
        );
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let graph = graph();
        let before = graph.clone();
        let _ = valid_initial_vertices(&graph);
        let _ = valid_roads(&graph, 0);
        let _ = valid_settlements(&graph, 0);
        assert_eq!(graph, before);
    }
}
