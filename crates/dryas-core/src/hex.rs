//! Hex coordinate system and flat-topped hex geometry.
//!
//! This module provides:
//! - `HexCoord`: Identifies individual hex tiles in offset (col, row) coordinates
//! - `HexGrid`: Pixel geometry for a flat-topped tiling (hex <-> pixel, vertices, hit testing)
//!
//! Odd columns are shoved up by half a row, which gives the tight "brick" layout.
//! The plane is unbounded; wrapping onto a finite world only happens for terrain lookup.

use serde::{Deserialize, Serialize};

/// Offset coordinate for a hex on the flat-topped grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column (increases going east)
    pub col: i32,
    /// Row (increases going south)
    pub row: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Whether this hex sits in an odd (half-row shifted) column
    pub const fn is_odd_column(&self) -> bool {
        self.col & 1 == 1
    }

    /// Manhattan distance in offset space (`|dc| + |dr|`), saturating at `u32::MAX`.
    ///
    /// This is the metric the rules use for claim range and settlement spacing.
    /// It is not the true hex-step distance.
    pub fn manhattan_distance(&self, other: &HexCoord) -> u32 {
        self.col
            .abs_diff(other.col)
            .saturating_add(self.row.abs_diff(other.row))
    }

    /// All coordinates within the given Manhattan radius (inclusive), scanned
    /// column-major over the bounding square.
    ///
    /// Cells that would fall outside the `i32` plane are skipped.
    pub fn within_manhattan(&self, radius: u32) -> impl Iterator<Item = HexCoord> {
        let centre = *self;
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        (-r..=r).flat_map(move |dc| {
            (-r..=r)
                .filter(move |dr| dc.unsigned_abs().saturating_add(dr.unsigned_abs()) <= radius)
                .filter_map(move |dr| centre.offset(dc, dr))
        })
    }

    /// This coordinate shifted by (`dc`, `dr`), or `None` past the edge of the plane
    pub fn offset(&self, dc: i32, dr: i32) -> Option<HexCoord> {
        Some(HexCoord::new(
            self.col.checked_add(dc)?,
            self.row.checked_add(dr)?,
        ))
    }

    /// Wrap onto a `width` x `height` world, yielding in-bounds cell indices.
    pub fn wrapped(&self, width: usize, height: usize) -> (usize, usize) {
        let x = self.col.rem_euclid(width as i32) as usize;
        let y = self.row.rem_euclid(height as i32) as usize;
        (x, y)
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Neighbour offsets probed when the rounded hex fails the hit test.
const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (0, 1)];

/// Geometry of a flat-topped hex tiling with a fixed hex size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexGrid {
    /// Distance from centre to corner
    size: f64,
    /// Corner offsets relative to the hex centre
    vertices: [(f64, f64); 6],
}

impl HexGrid {
    /// Default hex size in pixels
    pub const DEFAULT_SIZE: f64 = 40.0;

    /// Create a grid for hexes of the given size (centre to corner)
    pub fn new(size: f64) -> Self {
        let vertices = std::array::from_fn(|i| {
            let angle = (60.0 * i as f64).to_radians();
            (size * angle.cos(), size * angle.sin())
        });
        Self { size, vertices }
    }

    /// Centre-to-corner distance
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Corner-to-corner width
    pub fn hex_width(&self) -> f64 {
        self.size * 2.0
    }

    /// Flat-edge to flat-edge height
    pub fn hex_height(&self) -> f64 {
        self.size * 3.0_f64.sqrt()
    }

    /// Horizontal distance between neighbouring column centres
    pub fn horiz_spacing(&self) -> f64 {
        self.hex_width() * 3.0 / 4.0
    }

    /// Vertical distance between neighbouring row centres
    pub fn vert_spacing(&self) -> f64 {
        self.hex_height()
    }

    /// The six corner offsets, starting at angle 0 and going clockwise in screen space
    pub fn vertices(&self) -> &[(f64, f64); 6] {
        &self.vertices
    }

    /// Corners of a specific hex in pixel space
    pub fn corners(&self, coord: HexCoord) -> [(f64, f64); 6] {
        let (cx, cy) = self.hex_to_pixel(coord);
        self.vertices.map(|(vx, vy)| (cx + vx, cy + vy))
    }

    /// Pixel position of a hex centre
    pub fn hex_to_pixel(&self, coord: HexCoord) -> (f64, f64) {
        let x = coord.col as f64 * self.horiz_spacing();
        let y = (coord.row as f64 - (coord.col & 1) as f64 * 0.5) * self.vert_spacing();
        (x, y)
    }

    /// Hex containing the given pixel.
    ///
    /// Cube rounding picks a candidate; near edges it can pick the wrong
    /// neighbour, so the candidate is hit-tested and, on a miss, the closest
    /// containing neighbour wins. If nothing contains the point the rounded
    /// candidate is returned.
    pub fn pixel_to_hex(&self, px: f64, py: f64) -> HexCoord {
        let q = (2.0 / 3.0 * px) / self.size;
        let r = (-1.0 / 3.0 * px + 3.0_f64.sqrt() / 3.0 * py) / self.size;

        let candidate = Self::cube_round(q, r);

        let (cx, cy) = self.hex_to_pixel(candidate);
        if self.point_in_hex(px, py, cx, cy) {
            return candidate;
        }

        let mut best: Option<(f64, HexCoord)> = None;
        for (dc, dr) in NEIGHBOR_OFFSETS {
            let shift = i32::from(candidate.col.wrapping_add(dc) & 1 == 1 && dr == 0);
            let Some(test) = candidate.offset(dc, dr + shift) else {
                continue;
            };
            let (tx, ty) = self.hex_to_pixel(test);
            if !self.point_in_hex(px, py, tx, ty) {
                continue;
            }
            let dist = (px - tx).powi(2) + (py - ty).powi(2);
            if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                best = Some((dist, test));
            }
        }

        best.map_or(candidate, |(_, hex)| hex)
    }

    /// Round fractional axial coordinates through cube space and convert back to offset
    fn cube_round(q: f64, r: f64) -> HexCoord {
        let x = q;
        let z = r;
        let y = -x - z;

        let mut rx = x.round_ties_even();
        let ry = y.round_ties_even();
        let mut rz = z.round_ties_even();

        let x_diff = (rx - x).abs();
        let y_diff = (ry - y).abs();
        let z_diff = (rz - z).abs();

        // Rebuild the worst-rounded component from the other two; y is never read back
        if x_diff > y_diff && x_diff > z_diff {
            rx = -ry - rz;
        } else if y_diff <= z_diff {
            rz = -rx - ry;
        }

        // Far-off pixels saturate onto the edge of the i32 plane
        let col = i64::from(clamp_to_i32(rx as i64));
        let row = (rz as i64).saturating_add((col + (col & 1)).div_euclid(2));
        HexCoord::new(clamp_to_i32(col), clamp_to_i32(row))
    }

    /// Approximate hit test of a point against a hex centred at (`cx`, `cy`).
    ///
    /// Only used to disambiguate rounding near edges; it is effectively a
    /// bounding-box test.
    pub fn point_in_hex(&self, px: f64, py: f64, cx: f64, cy: f64) -> bool {
        let dx = (px - cx).abs();
        let dy = (py - cy).abs();

        let x_threshold = self.size * 3.0_f64.sqrt() / 2.0;

        if dx > self.size || dy > self.hex_height() / 2.0 {
            return false;
        }

        if dx <= x_threshold {
            dy <= self.size
        } else {
            let slope = (self.size - dy) / x_threshold;
            slope * (self.size - dx) >= 0.0
        }
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}
