//! World terrain: a fixed grid of normalised noise values and the biomes they map to.
//!
//! Terrain is generated once when the world is created and is read-only after
//! that. The rules engine never looks at it; it only feeds rendering and the
//! selected-hex info panel.

use crate::hex::HexCoord;
use noise::{Fbm, MultiFractal, NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

/// An RGB colour triple for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed 0xRRGGBB form
    pub fn hex_code(&self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// `#rrggbb` form for CSS and terminal output
    pub fn css(&self) -> String {
        format!("#{:06x}", self.hex_code())
    }
}

/// Biome category of a terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Water,
    Plains,
    Forest,
    Mountain,
    Tundra,
}

impl TerrainType {
    /// All terrain types, from lowest to highest noise band
    pub const ALL: [TerrainType; 5] = [
        TerrainType::Water,
        TerrainType::Plains,
        TerrainType::Forest,
        TerrainType::Mountain,
        TerrainType::Tundra,
    ];

    /// Classify a normalised noise value
    pub fn classify(value: f64) -> Self {
        if value < 0.2 {
            TerrainType::Water
        } else if value < 0.4 {
            TerrainType::Plains
        } else if value < 0.6 {
            TerrainType::Forest
        } else if value < 0.8 {
            TerrainType::Mountain
        } else {
            TerrainType::Tundra
        }
    }

    /// Display colour
    pub fn color(&self) -> Rgb {
        match self {
            TerrainType::Water => Rgb::new(0, 0, 255),
            TerrainType::Plains => Rgb::new(34, 139, 34),
            TerrainType::Forest => Rgb::new(0, 100, 0),
            TerrainType::Mountain => Rgb::new(139, 137, 137),
            TerrainType::Tundra => Rgb::new(238, 233, 233),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerrainType::Water => "Water",
            TerrainType::Plains => "Plains",
            TerrainType::Forest => "Forest",
            TerrainType::Mountain => "Mountain",
            TerrainType::Tundra => "Tundra",
        }
    }
}

/// Parameters for the fractal noise field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Feature scale; cell coordinates are divided by this before sampling
    pub scale: f64,
    /// Number of noise layers
    pub octaves: usize,
    /// Amplitude falloff per octave
    pub persistence: f64,
    /// Frequency growth per octave
    pub lacunarity: f64,
    /// Noise seed. `None` picks a random one, so every world differs.
    pub seed: Option<u32>,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 50.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: None,
        }
    }
}

/// Width x height grid of normalised noise values in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    width: usize,
    height: usize,
    /// Row-major values, `height` rows of `width` cells
    values: Vec<f64>,
}

impl Terrain {
    /// Generate a terrain grid from fractal simplex noise.
    ///
    /// The raw field is min-max normalised across the whole grid. A perfectly
    /// flat field normalises to zero everywhere.
    pub fn generate(width: usize, height: usize, params: &NoiseParams) -> Self {
        let seed = params.seed.unwrap_or_else(rand::random);
        let fbm = Fbm::<Simplex>::new(seed)
            .set_octaves(params.octaves)
            .set_frequency(1.0)
            .set_persistence(params.persistence)
            .set_lacunarity(params.lacunarity);

        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(fbm.get([x as f64 / params.scale, y as f64 / params.scale]));
            }
        }

        normalize(&mut values);

        Self {
            width,
            height,
            values,
        }
    }

    /// Build a terrain grid from existing row-major values (not renormalised).
    ///
    /// Returns `None` if `values` does not hold exactly `width * height` cells.
    pub fn from_values(width: usize, height: usize, values: Vec<f64>) -> Option<Self> {
        if values.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Normalised noise value of an in-bounds cell
    pub fn value_at(&self, x: usize, y: usize) -> Option<f64> {
        self.in_bounds(x, y).then(|| self.values[y * self.width + x])
    }

    /// Biome of an in-bounds cell
    pub fn terrain_at(&self, x: usize, y: usize) -> Option<TerrainType> {
        self.value_at(x, y).map(TerrainType::classify)
    }

    /// Colour of a cell; black when out of bounds
    pub fn color_at(&self, x: usize, y: usize) -> Rgb {
        self.terrain_at(x, y)
            .map_or(Rgb::BLACK, |terrain| terrain.color())
    }

    /// Cell a raw hex coordinate wraps onto
    pub fn wrap(&self, coord: HexCoord) -> (usize, usize) {
        coord.wrapped(self.width, self.height)
    }

    /// Biome under a hex, wrapping the coordinate onto the world first
    pub fn terrain_at_hex(&self, coord: HexCoord) -> Option<TerrainType> {
        if self.values.is_empty() {
            return None;
        }
        let (x, y) = self.wrap(coord);
        self.terrain_at(x, y)
    }

    /// Colour under a hex, wrapping the coordinate onto the world first
    pub fn color_at_hex(&self, coord: HexCoord) -> Rgb {
        self.terrain_at_hex(coord)
            .map_or(Rgb::BLACK, |terrain| terrain.color())
    }
}

fn normalize(values: &mut [f64]) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= f64::EPSILON {
        values.iter_mut().for_each(|v| *v = 0.0);
        return;
    }

    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
}
