//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the coordinate types every other part of the board is keyed by:
//! - `HexCoord`: Identifies individual hex tiles
//! - `VertexCoord`: Identifies vertices (corners) where settlements/cities are placed
//! - `EdgeCoord`: Identifies edges where roads are placed
//!
//! Tiles are pointy-top. Every vertex is either the north tip of the hex directly
//! below it or the south tip of the hex directly above it, so a `(hex, North|South)`
//! pair names each geometric corner exactly once. Edges are named from the
//! lexicographically smaller of their two hexes. Both keys are pure functions of a
//! tile coordinate and a corner/side index.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of corners (and sides) of a hex.
pub const CORNERS_PER_HEX: usize = 6;

/// Direction of a vertex relative to a hex (North or South pole)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum VertexDirection {
    /// Top vertex of the hex
    North,
    /// Bottom vertex of the hex
    South,
}

/// Direction of an edge relative to a hex
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EdgeDirection {
    /// Northeast edge (top-right)
    NorthEast,
    /// East edge (right)
    East,
    /// Southeast edge (bottom-right)
    SouthEast,
    /// Southwest edge (bottom-left)
    SouthWest,
    /// West edge (left)
    West,
    /// Northwest edge (top-left)
    NorthWest,
}

impl EdgeDirection {
    /// All edge directions in clockwise order starting from NorthEast.
    ///
    /// Side `i` runs from corner `i` to corner `i + 1` of [`HexCoord::corners`].
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::NorthEast,
        EdgeDirection::East,
        EdgeDirection::SouthEast,
        EdgeDirection::SouthWest,
        EdgeDirection::West,
        EdgeDirection::NorthWest,
    ];

    /// Position of this side in [`EdgeDirection::ALL`]
    pub fn index(self) -> usize {
        match self {
            EdgeDirection::NorthEast => 0,
            EdgeDirection::East => 1,
            EdgeDirection::SouthEast => 2,
            EdgeDirection::SouthWest => 3,
            EdgeDirection::West => 4,
            EdgeDirection::NorthWest => 5,
        }
    }

    /// The same side seen from the neighboring hex
    pub fn opposite(self) -> EdgeDirection {
        match self {
            EdgeDirection::NorthEast => EdgeDirection::SouthWest,
            EdgeDirection::East => EdgeDirection::West,
            EdgeDirection::SouthEast => EdgeDirection::NorthWest,
            EdgeDirection::SouthWest => EdgeDirection::NorthEast,
            EdgeDirection::West => EdgeDirection::East,
            EdgeDirection::NorthWest => EdgeDirection::SouthEast,
        }
    }
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
///
/// Ordering is lexicographic on `(q, r)`, which is also the tile iteration order
/// used by board generation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Whether this hex lies within `radius` steps of the origin
    pub fn within_radius(&self, radius: i32) -> bool {
        self.q.abs() <= radius && self.r.abs() <= radius && self.s().abs() <= radius
    }

    /// All hexes within `radius` of the origin, ordered by `(q, r)`
    pub fn spiral(radius: i32) -> Vec<HexCoord> {
        let mut coords = Vec::new();
        for q in -radius..=radius {
            for r in -radius..=radius {
                let coord = HexCoord::new(q, r);
                if coord.within_radius(radius) {
                    coords.push(coord);
                }
            }
        }
        coords
    }

    /// The six neighboring hexes in clockwise order starting from East
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),     // East
            HexCoord::new(self.q + 1, self.r - 1), // NorthEast
            HexCoord::new(self.q, self.r - 1),     // NorthWest
            HexCoord::new(self.q - 1, self.r),     // West
            HexCoord::new(self.q - 1, self.r + 1), // SouthWest
            HexCoord::new(self.q, self.r + 1),     // SouthEast
        ]
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: EdgeDirection) -> HexCoord {
        match direction {
            EdgeDirection::East => HexCoord::new(self.q + 1, self.r),
            EdgeDirection::NorthEast => HexCoord::new(self.q + 1, self.r - 1),
            EdgeDirection::NorthWest => HexCoord::new(self.q, self.r - 1),
            EdgeDirection::West => HexCoord::new(self.q - 1, self.r),
            EdgeDirection::SouthWest => HexCoord::new(self.q - 1, self.r + 1),
            EdgeDirection::SouthEast => HexCoord::new(self.q, self.r + 1),
        }
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// All six corners of this hex, clockwise from the north tip
    pub fn corners(&self) -> [VertexCoord; 6] {
        std::array::from_fn(|corner| VertexCoord::from_corner(*self, corner))
    }

    /// All six sides of this hex, clockwise from the northeast side
    pub fn sides(&self) -> [EdgeCoord; 6] {
        std::array::from_fn(|side| EdgeCoord::from_side(*self, side))
    }
}

/// Vertex coordinate - identifies a corner where up to 3 hexes meet.
///
/// Vertices are where settlements and cities are built.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VertexCoord {
    /// The hex whose north or south tip this vertex is
    pub hex: HexCoord,
    /// North or South vertex of the hex
    pub direction: VertexDirection,
}

impl VertexCoord {
    /// Create a vertex coordinate from its anchoring hex and pole
    pub const fn new(hex: HexCoord, direction: VertexDirection) -> Self {
        Self { hex, direction }
    }

    /// Canonical key of corner `corner` (taken modulo 6) of `hex`.
    ///
    /// Corners run clockwise from the north tip: north, upper-right, lower-right,
    /// south, lower-left, upper-left. The side corners belong to a neighbor's pole,
    /// so all tiles sharing a corner produce the same key.
    pub fn from_corner(hex: HexCoord, corner: usize) -> Self {
        match corner % CORNERS_PER_HEX {
            0 => Self::new(hex, VertexDirection::North),
            1 => Self::new(hex.neighbor(EdgeDirection::NorthEast), VertexDirection::South),
            2 => Self::new(hex.neighbor(EdgeDirection::SouthEast), VertexDirection::North),
            3 => Self::new(hex, VertexDirection::South),
            4 => Self::new(hex.neighbor(EdgeDirection::SouthWest), VertexDirection::North),
            _ => Self::new(hex.neighbor(EdgeDirection::NorthWest), VertexDirection::South),
        }
    }

    /// Get the 3 hexes that touch this vertex (some may lie off the board)
    pub fn touching_hexes(&self) -> [HexCoord; 3] {
        match self.direction {
            VertexDirection::North => [
                self.hex,
                self.hex.neighbor(EdgeDirection::NorthWest),
                self.hex.neighbor(EdgeDirection::NorthEast),
            ],
            VertexDirection::South => [
                self.hex,
                self.hex.neighbor(EdgeDirection::SouthWest),
                self.hex.neighbor(EdgeDirection::SouthEast),
            ],
        }
    }

    /// Get the 3 adjacent vertices (for distance rule checking)
    ///
    /// Adjacent vertices are those connected by exactly one edge.
    pub fn adjacent_vertices(&self) -> [VertexCoord; 3] {
        self.touching_edges().map(|edge| {
            let [a, b] = edge.endpoints();
            if a == *self {
                b
            } else {
                a
            }
        })
    }

    /// Get the 3 edges that connect to this vertex
    pub fn touching_edges(&self) -> [EdgeCoord; 3] {
        match self.direction {
            VertexDirection::North => [
                EdgeCoord::new(self.hex, EdgeDirection::NorthWest),
                EdgeCoord::new(self.hex, EdgeDirection::NorthEast),
                EdgeCoord::new(self.hex.neighbor(EdgeDirection::NorthWest), EdgeDirection::East),
            ],
            VertexDirection::South => [
                EdgeCoord::new(self.hex, EdgeDirection::SouthWest),
                EdgeCoord::new(self.hex, EdgeDirection::SouthEast),
                EdgeCoord::new(self.hex.neighbor(EdgeDirection::SouthWest), EdgeDirection::East),
            ],
        }
    }
}

/// Edge coordinate - identifies a side of a hex where roads are built.
///
/// Each edge is shared by at most 2 hexes. We use a canonical form to ensure
/// the same edge is always represented the same way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeCoord {
    /// The hex this edge is associated with (in canonical form)
    pub hex: HexCoord,
    /// Which edge of the hex
    pub direction: EdgeDirection,
}

impl EdgeCoord {
    /// Create a new edge coordinate (automatically canonicalized)
    pub fn new(hex: HexCoord, direction: EdgeDirection) -> Self {
        Self { hex, direction }.canonical()
    }

    /// Canonical key of side `side` (taken modulo 6) of `hex`
    pub fn from_side(hex: HexCoord, side: usize) -> Self {
        Self::new(hex, EdgeDirection::ALL[side % CORNERS_PER_HEX])
    }

    /// Get the canonical form of this edge coordinate.
    ///
    /// Each edge can be described from 2 different hexes. We pick the hex
    /// with smaller (q, r) to be canonical.
    pub fn canonical(self) -> Self {
        let other = Self {
            hex: self.hex.neighbor(self.direction),
            direction: self.direction.opposite(),
        };

        if self.hex <= other.hex {
            self
        } else {
            other
        }
    }

    /// Get the 2 hexes that share this edge
    pub fn touching_hexes(&self) -> [HexCoord; 2] {
        [self.hex, self.hex.neighbor(self.direction)]
    }

    /// Get the 2 vertices at the endpoints of this edge
    pub fn endpoints(&self) -> [VertexCoord; 2] {
        let side = self.direction.index();
        [
            VertexCoord::from_corner(self.hex, side),
            VertexCoord::from_corner(self.hex, side + 1),
        ]
    }

    /// Get edges that share a vertex with this edge (for road connectivity)
    pub fn adjacent_edges(&self) -> Vec<EdgeCoord> {
        let mut adjacent = HashSet::new();
        for vertex in self.endpoints() {
            for edge in vertex.touching_edges() {
                if edge != *self {
                    adjacent.insert(edge);
                }
            }
        }
        adjacent.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_neighbors() {
        let center = HexCoord::new(0, 0);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_hex_distance() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.distance_to(&b), 2);

        let c = HexCoord::new(-3, 3);
        assert_eq!(a.distance_to(&c), 3);
    }

    #[test]
    fn test_spiral_radius_two() {
        let coords = HexCoord::spiral(2);
        assert_eq!(coords.len(), 19);
        assert!(coords.windows(2).all(|w| w[0] < w[1]), "ordered by (q, r)");
        assert!(coords.iter().all(|c| c.distance_to(&HexCoord::default()) <= 2));
    }

    #[test]
    fn test_shared_corner_same_key_from_every_tile() {
        // The north tip of (0,0) is also a corner of (0,-1) and (1,-1)
        let center = HexCoord::new(0, 0);
        let key = VertexCoord::from_corner(center, 0);

        for hex in key.touching_hexes() {
            assert!(
                hex.corners().contains(&key),
                "{hex:?} should list the shared corner"
            );
        }
    }

    #[test]
    fn test_corner_keys_agree_across_neighbors() {
        // Every corner of every hex near the origin is seen identically by all 3 tiles
        for hex in HexCoord::spiral(3) {
            for key in hex.corners() {
                let seen = key
                    .touching_hexes()
                    .iter()
                    .filter(|h| h.corners().contains(&key))
                    .count();
                assert_eq!(seen, 3);
            }
        }
    }

    #[test]
    fn test_vertex_adjacent_vertices() {
        let v = VertexCoord::from_corner(HexCoord::new(0, 0), 0);
        let adjacent = v.adjacent_vertices();

        let unique: HashSet<_> = adjacent.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(!unique.contains(&v));
    }

    #[test]
    fn test_edge_canonical_equality() {
        let e1 = EdgeCoord::new(HexCoord::new(0, 0), EdgeDirection::East);
        let e2 = EdgeCoord::new(HexCoord::new(1, 0), EdgeDirection::West);

        assert_eq!(e1, e2, "Same edge from different hexes should be equal");
    }

    #[test]
    fn test_edge_endpoints_are_consecutive_corners() {
        let hex = HexCoord::new(1, -1);
        for side in 0..CORNERS_PER_HEX {
            let edge = EdgeCoord::from_side(hex, side);
            let endpoints: HashSet<_> = edge.endpoints().into_iter().collect();
            let expected: HashSet<_> = [
                VertexCoord::from_corner(hex, side),
                VertexCoord::from_corner(hex, side + 1),
            ]
            .into_iter()
            .collect();
            assert_eq!(endpoints, expected);
        }
    }

    #[test]
    fn test_edge_adjacent_edges() {
        let e = EdgeCoord::new(HexCoord::new(0, 0), EdgeDirection::East);
        let adjacent = e.adjacent_edges();

        // Each edge connects to 4 other edges (2 at each endpoint)
        assert_eq!(adjacent.len(), 4);
        assert!(!adjacent.contains(&e));
    }

    #[test]
    fn test_hex_corners_and_sides_unique() {
        let hex = HexCoord::new(0, 0);

        let corners: HashSet<_> = hex.corners().into_iter().collect();
        assert_eq!(corners.len(), 6);

        let sides: HashSet<_> = hex.sides().into_iter().collect();
        assert_eq!(sides.len(), 6);
    }

    #[test]
    fn test_vertex_edges_connection() {
        for corner in 0..CORNERS_PER_HEX {
            let v = VertexCoord::from_corner(HexCoord::new(0, 0), corner);
            for edge in v.touching_edges() {
                assert!(
                    edge.endpoints().contains(&v),
                    "Edge should have vertex as endpoint"
                );
            }
        }
    }
}
