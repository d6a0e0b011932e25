//! Tile grid: resources, tiles, harbors and board generation.
//!
//! This module contains:
//! - Resource types
//! - Tile types and the fixed radius-2 tile grid
//! - Harbor trading bonuses and their fixed perimeter positions
//! - Randomized (or seeded) generation of the grid

use crate::hex::{EdgeCoord, EdgeDirection, HexCoord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Player identifier (0-based seat index)
pub type PlayerId = u8;

/// Radius of the land grid around the center tile
pub const BOARD_RADIUS: i32 = 2;

/// Production numbers placed on the 18 non-desert tiles
pub const NUMBER_TOKENS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// Perimeter sides that carry a harbor, one per port, clockwise from the top
pub const HARBOR_SIDES: [(HexCoord, EdgeDirection); 9] = [
    (HexCoord::new(0, -2), EdgeDirection::NorthWest),
    (HexCoord::new(1, -2), EdgeDirection::NorthEast),
    (HexCoord::new(2, -1), EdgeDirection::NorthEast),
    (HexCoord::new(2, 0), EdgeDirection::SouthEast),
    (HexCoord::new(1, 1), EdgeDirection::SouthEast),
    (HexCoord::new(-1, 2), EdgeDirection::SouthEast),
    (HexCoord::new(-2, 2), EdgeDirection::West),
    (HexCoord::new(-2, 0), EdgeDirection::West),
    (HexCoord::new(-1, -1), EdgeDirection::NorthWest),
];

/// Resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    /// Produced by hills
    Brick,
    /// Wood, produced by forest
    Lumber,
    /// Produced by mountains
    Ore,
    /// Wheat, produced by fields
    Grain,
    /// Sheep, produced by pasture
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

/// Type of hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileType {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// Desert - no production, holds the robber at game start
    Desert,
}

/// Harbor types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// The standard set of nine harbor tokens
    pub fn standard_set() -> Vec<Harbor> {
        let mut harbors = vec![Harbor::Generic; 4];
        harbors.extend(Resource::ALL.map(Harbor::Specific));
        harbors
    }

    /// The exchange rate for this harbor
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position on the hex grid
    pub coord: HexCoord,
    /// What type of tile (resource or desert)
    pub tile_type: TileType,
    /// Dice number that triggers production (2-12, None for desert)
    pub dice_number: Option<u8>,
}

impl Tile {
    /// Create a new resource tile
    pub fn new_resource(coord: HexCoord, resource: Resource, dice_number: u8) -> Self {
        Self {
            coord,
            tile_type: TileType::Resource(resource),
            dice_number: Some(dice_number),
        }
    }

    /// Create a desert tile
    pub fn desert(coord: HexCoord) -> Self {
        Self {
            coord,
            tile_type: TileType::Desert,
            dice_number: None,
        }
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.tile_type {
            TileType::Resource(r) => Some(r),
            TileType::Desert => None,
        }
    }

    pub fn is_desert(&self) -> bool {
        matches!(self.tile_type, TileType::Desert)
    }
}

/// Harbor placement on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarborPlacement {
    /// The perimeter edge where ships dock; both endpoints get the harbor
    pub edge: EdgeCoord,
    /// Type of harbor (generic or specific resource)
    pub harbor_type: Harbor,
}

/// The generated tile layout, fixed for the whole game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Land tiles ordered by `(q, r)`
    tiles: Vec<Tile>,
    /// Harbors on coastal edges
    harbors: Vec<HarborPlacement>,
    /// Current robber location
    robber_location: HexCoord,
}

impl TileGrid {
    /// Generate the standard layout using the process-wide RNG
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::generate_with_rng(&mut rng)
    }

    /// Generate the standard layout with a provided RNG.
    /// A seeded RNG gives the same grid every time.
    pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let land_coords = HexCoord::spiral(BOARD_RADIUS);

        // 4 Grain, 4 Lumber, 4 Wool, 3 Ore, 3 Brick, 1 Desert (None)
        let mut tile_types: Vec<Option<Resource>> = Vec::with_capacity(land_coords.len());
        for (resource, count) in [
            (Resource::Grain, 4),
            (Resource::Lumber, 4),
            (Resource::Wool, 4),
            (Resource::Ore, 3),
            (Resource::Brick, 3),
        ] {
            tile_types.extend(std::iter::repeat(Some(resource)).take(count));
        }
        tile_types.push(None);
        tile_types.shuffle(rng);

        let mut numbers = NUMBER_TOKENS.to_vec();
        numbers.shuffle(rng);

        let mut harbor_types = Harbor::standard_set();
        harbor_types.shuffle(rng);

        // Numbers go to non-desert tiles in (q, r) order
        let mut numbers = numbers.into_iter();
        let mut tiles = Vec::with_capacity(land_coords.len());
        let mut robber_location = HexCoord::default();
        for (coord, tile_type) in land_coords.into_iter().zip(tile_types) {
            let number = tile_type.and_then(|_| numbers.next());
            match (tile_type, number) {
                (Some(resource), Some(number)) => {
                    tiles.push(Tile::new_resource(coord, resource, number));
                }
                _ => {
                    robber_location = coord;
                    tiles.push(Tile::desert(coord));
                }
            }
        }

        let harbors = HARBOR_SIDES
            .iter()
            .zip(harbor_types)
            .map(|(&(hex, direction), harbor_type)| HarborPlacement {
                edge: EdgeCoord::new(hex, direction),
                harbor_type,
            })
            .collect();

        debug!(desert = ?robber_location, "generated tile grid");

        Self {
            tiles,
            harbors,
            robber_location,
        }
    }

    // ==================== Query Methods ====================

    /// All land tiles, ordered by `(q, r)`
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Get a tile by coordinate
    pub fn get_tile(&self, coord: &HexCoord) -> Option<&Tile> {
        self.tiles
            .binary_search_by_key(coord, |t| t.coord)
            .ok()
            .map(|idx| &self.tiles[idx])
    }

    pub fn harbors(&self) -> &[HarborPlacement] {
        &self.harbors
    }

    /// Get the robber's current location
    pub fn robber_location(&self) -> HexCoord {
        self.robber_location
    }

    /// Whether an edge lies on the coast (exactly one of its hexes is land)
    pub fn is_coastal_edge(&self, edge: &EdgeCoord) -> bool {
        edge.touching_hexes()
            .iter()
            .filter(|h| self.get_tile(h).is_some())
            .count()
            == 1
    }
}
