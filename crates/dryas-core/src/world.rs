//! The game world: hex geometry plus the terrain laid over it.

use crate::config::WorldConfig;
use crate::hex::{HexCoord, HexGrid};
use crate::terrain::{Rgb, Terrain, TerrainType};

/// Geometry and terrain for one game, built once from a [`WorldConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    grid: HexGrid,
    terrain: Terrain,
}

impl World {
    /// Generate terrain and set up the grid
    pub fn generate(config: &WorldConfig) -> Self {
        Self {
            grid: config.grid(),
            terrain: Terrain::generate(config.width, config.height, &config.noise),
        }
    }

    /// Assemble a world from existing parts
    pub fn from_parts(grid: HexGrid, terrain: Terrain) -> Self {
        Self { grid, terrain }
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Hex under a world-space pixel. The coordinate is raw (not wrapped).
    pub fn hex_at(&self, px: f64, py: f64) -> HexCoord {
        self.grid.pixel_to_hex(px, py)
    }

    /// Biome under a hex, after wrapping onto the terrain grid
    pub fn terrain_at(&self, coord: HexCoord) -> Option<TerrainType> {
        self.terrain.terrain_at_hex(coord)
    }

    /// Fill colour for a hex, after wrapping onto the terrain grid
    pub fn color_at(&self, coord: HexCoord) -> Rgb {
        self.terrain.color_at_hex(coord)
    }
}
