//! Vertex/edge graph derived from the tile grid.
//!
//! Every tile contributes its 6 corners and 6 sides. Corners and sides shared
//! between tiles collapse onto a single canonical key (see [`crate::hex`]), and
//! ids are handed out in sorted key order, so the same tiles always produce the
//! same graph regardless of the order they are visited in.
//!
//! The graph is structurally fixed once built. Only the building on a vertex or
//! edge changes, and only through [`crate::placement`].

use crate::board::{Harbor, HarborPlacement, PlayerId, Tile, TileGrid};
use crate::errors::ErrorKind;
use crate::hex::{EdgeCoord, HexCoord, VertexCoord, CORNERS_PER_HEX};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Stable identifier of a settlement site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);

/// Stable identifier of a road site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// What's built on a vertex (corner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VertexBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (1 VP)
    Settlement(PlayerId),
    /// City (2 VP)
    City(PlayerId),
}

impl VertexBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            VertexBuilding::Empty => None,
            VertexBuilding::Settlement(p) | VertexBuilding::City(p) => Some(*p),
        }
    }

    /// Victory points provided by this building
    pub fn victory_points(&self) -> u32 {
        match self {
            VertexBuilding::Empty => 0,
            VertexBuilding::Settlement(_) => 1,
            VertexBuilding::City(_) => 2,
        }
    }
}

/// What's built on an edge (side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Road
    Road(PlayerId),
}

impl EdgeBuilding {
    /// Get the owner of this road, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgeBuilding::Empty => None,
            EdgeBuilding::Road(p) => Some(*p),
        }
    }
}

/// A settlement/city site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub coord: VertexCoord,
    pub building: VertexBuilding,
    /// Vertices one edge away (2 or 3)
    pub adjacent: Vec<VertexId>,
    /// Edges ending here (2 or 3)
    pub edges: Vec<EdgeId>,
    /// Land tiles touching this corner (1 to 3), sorted
    pub tiles: Vec<HexCoord>,
    pub harbor: Option<Harbor>,
}

/// A road site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub coord: EdgeCoord,
    pub building: EdgeBuilding,
    /// The two distinct endpoints
    pub vertices: [VertexId; 2],
    /// Land tiles sharing this side (1 or 2), sorted
    pub tiles: Vec<HexCoord>,
}

impl Edge {
    /// Whether `vertex` is one of the two endpoints
    pub fn connects(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// A harbor attached to two perimeter vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub harbor: Harbor,
    pub edge: EdgeId,
    pub vertices: [VertexId; 2],
}

/// Errors raised while deriving the graph from tiles
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GraphError {
    #[error("Tile {0:?} appears more than once")]
    DuplicateTile(HexCoord),

    #[error("Edge {0:?} does not join two distinct vertices")]
    DegenerateEdge(EdgeCoord),

    #[error("Harbor edge {0:?} is not on the board")]
    HarborOffBoard(EdgeCoord),

    #[error("Harbor edge {0:?} is not on the perimeter")]
    HarborInland(EdgeCoord),

    #[error("Vertex {0:?} already has a harbor")]
    HarborOverlap(VertexCoord),
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

struct EdgeSeed {
    /// Endpoint keys, sorted so the visiting tile does not matter
    ends: [VertexCoord; 2],
    tiles: Vec<HexCoord>,
}

/// The complete vertex/edge graph of a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardGraph {
    /// Indexed by `VertexId`, sorted by coordinate
    vertices: Vec<Vertex>,
    /// Indexed by `EdgeId`, sorted by coordinate
    edges: Vec<Edge>,
    ports: Vec<Port>,
}

impl BoardGraph {
    /// Build the graph for a generated tile grid
    pub fn build(grid: &TileGrid) -> Result<Self, GraphError> {
        Self::build_from_tiles(grid.tiles(), grid.harbors())
    }

    /// Build the graph from tiles in any order
    pub fn build_from_tiles(
        tiles: &[Tile],
        harbors: &[HarborPlacement],
    ) -> Result<Self, GraphError> {
        let mut seen = HashSet::new();
        let mut corner_tiles: BTreeMap<VertexCoord, Vec<HexCoord>> = BTreeMap::new();
        let mut side_seeds: BTreeMap<EdgeCoord, EdgeSeed> = BTreeMap::new();

        for tile in tiles {
            if !seen.insert(tile.coord) {
                return Err(GraphError::DuplicateTile(tile.coord));
            }
            for index in 0..CORNERS_PER_HEX {
                corner_tiles
                    .entry(VertexCoord::from_corner(tile.coord, index))
                    .or_default()
                    .push(tile.coord);

                side_seeds
                    .entry(EdgeCoord::from_side(tile.coord, index))
                    .or_insert_with(|| {
                        let mut ends = [
                            VertexCoord::from_corner(tile.coord, index),
                            VertexCoord::from_corner(tile.coord, index + 1),
                        ];
                        ends.sort_unstable();
                        EdgeSeed {
                            ends,
                            tiles: Vec::with_capacity(2),
                        }
                    })
                    .tiles
                    .push(tile.coord);
            }
        }

        let mut vertices: Vec<Vertex> = corner_tiles
            .into_iter()
            .enumerate()
            .map(|(idx, (coord, mut tiles))| {
                tiles.sort_unstable();
                Vertex {
                    id: VertexId(idx),
                    coord,
                    building: VertexBuilding::Empty,
                    adjacent: Vec::with_capacity(3),
                    edges: Vec::with_capacity(3),
                    tiles,
                    harbor: None,
                }
            })
            .collect();

        let lookup = |vertices: &[Vertex], coord: &VertexCoord| {
            vertices
                .binary_search_by_key(coord, |v| v.coord)
                .ok()
                .map(VertexId)
        };

        let mut edges = Vec::with_capacity(side_seeds.len());
        for (idx, (coord, seed)) in side_seeds.into_iter().enumerate() {
            let [a, b] = seed.ends;
            let ends = lookup(&vertices, &a).zip(lookup(&vertices, &b));
            let (a, b) = match ends {
                Some((a, b)) if a != b => (a, b),
                _ => return Err(GraphError::DegenerateEdge(coord)),
            };

            let id = EdgeId(idx);
            for (here, there) in [(a, b), (b, a)] {
                let vertex = &mut vertices[here.0];
                vertex.edges.push(id);
                vertex.adjacent.push(there);
            }

            let mut tiles = seed.tiles;
            tiles.sort_unstable();
            edges.push(Edge {
                id,
                coord,
                building: EdgeBuilding::Empty,
                vertices: [a, b],
                tiles,
            });
        }

        let mut graph = Self {
            vertices,
            edges,
            ports: Vec::with_capacity(harbors.len()),
        };
        for placement in harbors {
            graph.attach_harbor(placement)?;
        }

        debug!(
            vertices = graph.vertices.len(),
            edges = graph.edges.len(),
            ports = graph.ports.len(),
            "built board graph"
        );
        Ok(graph)
    }

    fn attach_harbor(&mut self, placement: &HarborPlacement) -> Result<(), GraphError> {
        let edge_id = self
            .edge_id(&placement.edge)
            .ok_or(GraphError::HarborOffBoard(placement.edge))?;
        let edge = &self.edges[edge_id.0];
        if edge.tiles.len() != 1 {
            return Err(GraphError::HarborInland(placement.edge));
        }
        let ends = edge.vertices;

        for id in ends {
            let vertex = &self.vertices[id.0];
            if vertex.harbor.is_some() {
                return Err(GraphError::HarborOverlap(vertex.coord));
            }
        }
        for id in ends {
            self.vertices[id.0].harbor = Some(placement.harbor_type);
        }

        self.ports.push(Port {
            harbor: placement.harbor_type,
            edge: edge_id,
            vertices: ends,
        });
        Ok(())
    }

    // ==================== Query Methods ====================

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Look up the id of a vertex by its canonical coordinate
    pub fn vertex_id(&self, coord: &VertexCoord) -> Option<VertexId> {
        self.vertices
            .binary_search_by_key(coord, |v| v.coord)
            .ok()
            .map(VertexId)
    }

    /// Look up the id of an edge by coordinate (canonicalized first)
    pub fn edge_id(&self, coord: &EdgeCoord) -> Option<EdgeId> {
        let coord = coord.canonical();
        self.edges
            .binary_search_by_key(&coord, |e| e.coord)
            .ok()
            .map(EdgeId)
    }

    /// The edge joining two vertices, if they are adjacent
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.vertex(a)?
            .edges
            .iter()
            .copied()
            .find(|e| self.edges[e.0].connects(b))
    }

    /// Every harbor a player has a building on
    pub fn player_harbors(&self, player: PlayerId) -> Vec<Harbor> {
        self.ports
            .iter()
            .filter(|port| {
                port.vertices
                    .iter()
                    .any(|v| self.vertices[v.0].building.owner() == Some(player))
            })
            .map(|port| port.harbor)
            .collect()
    }

    /// Victory points a player holds through buildings on the board
    pub fn building_points(&self, player: PlayerId) -> u32 {
        self.vertices
            .iter()
            .filter(|v| v.building.owner() == Some(player))
            .map(|v| v.building.victory_points())
            .sum()
    }

    /// Number of settlements and cities a player has on the board
    pub fn buildings_owned(&self, player: PlayerId) -> usize {
        self.vertices
            .iter()
            .filter(|v| v.building.owner() == Some(player))
            .count()
    }

    // ==================== Mutation Methods ====================

    pub(crate) fn set_vertex_building(&mut self, id: VertexId, building: VertexBuilding) {
        if let Some(vertex) = self.vertices.get_mut(id.0) {
            vertex.building = building;
        }
    }

    pub(crate) fn set_edge_building(&mut self, id: EdgeId, building: EdgeBuilding) {
        if let Some(edge) = self.edges.get_mut(id.0) {
            edge.building = building;
        }
    }
}
