//! Ground tile layers and walkable-cell snapshots.
//!
//! A [`TileLayer`] is the terrain collaborator's view of the level: a
//! rectangle of [`Tile`]s, usually parsed from ASCII art. The navigation
//! graph never reads it directly; it consumes a snapshot of walkable cells
//! through [`WalkableSource`].

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use thiserror::Error;

use crate::geom::{Point, Range};

/// A single terrain tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Empty,
    Ground,
}

impl Tile {
    /// Character used in ASCII levels.
    pub const fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Ground => '#',
        }
    }

    pub const fn from_glyph(ch: char) -> Option<Tile> {
        match ch {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Ground),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        matches!(self, Tile::Ground)
    }
}

/// Errors that can occur when parsing an ASCII level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level is empty")]
    Empty,
    #[error("level row {row} is {found} tiles wide, expected {expected}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("level contains invalid tile \u{201c}{ch}\u{201d} at {pos}")]
    InvalidTile { ch: char, pos: Point },
    #[error("level of {width}x{height} tiles exceeds {max} tiles", max = MAX_LAYER_TILES)]
    TooLarge { width: usize, height: usize },
}

/// Largest number of tiles a [`TileLayer`] may hold.
pub const MAX_LAYER_TILES: usize = 1 << 24;

/// Checked `(width, height)` of a layer, as a [`Point`].
fn layer_size(width: usize, height: usize) -> Result<Point, LevelError> {
    match width.checked_mul(height) {
        Some(n) if n <= MAX_LAYER_TILES => Ok(Point::new(width as i32, height as i32)),
        _ => Err(LevelError::TooLarge { width, height }),
    }
}

/// Which cells of a [`TileLayer`] become navigation nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkableRule {
    /// Every ground tile (the layer's used cells).
    Solid,
    /// Empty cells with ground at most `clearance` cells directly below:
    /// the air an agent stands in or jumps through.
    Surface { clearance: i32 },
}

/// Supplies the set of traversable grid cells.
///
/// Unlisted cells are non-traversable; no other validation is expected.
pub trait WalkableSource {
    fn walkable_cells(&self) -> Vec<Point>;
}

impl WalkableSource for [Point] {
    fn walkable_cells(&self) -> Vec<Point> {
        self.to_vec()
    }
}

impl WalkableSource for Vec<Point> {
    fn walkable_cells(&self) -> Vec<Point> {
        self.clone()
    }
}

impl WalkableSource for BTreeSet<Point> {
    fn walkable_cells(&self) -> Vec<Point> {
        self.iter().copied().collect()
    }
}

impl WalkableSource for HashSet<Point> {
    fn walkable_cells(&self) -> Vec<Point> {
        self.iter().copied().collect()
    }
}

/// A rectangular layer of terrain tiles with its top-left cell at (0, 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    tiles: Vec<Tile>,
    size: Point,
}

impl TileLayer {
    /// Create an empty layer. Negative dimensions count as zero.
    ///
    /// Fails with [`LevelError::TooLarge`] past [`MAX_LAYER_TILES`] tiles.
    pub fn new(width: i32, height: i32) -> Result<Self, LevelError> {
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;
        let size = layer_size(width, height)?;
        Ok(Self {
            tiles: vec![Tile::Empty; width * height],
            size,
        })
    }

    /// Parse an ASCII level: `#` is ground, `.` is empty.
    ///
    /// Leading/trailing whitespace of the whole string is trimmed, but not
    /// of individual rows; every row must have the same width.
    pub fn parse(s: &str) -> Result<Self, LevelError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LevelError::Empty);
        }
        let mut tiles = Vec::with_capacity(s.len());
        let mut width: Option<usize> = None;
        let mut height = 0;
        for (y, line) in s.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut x = 0;
            for ch in line.chars() {
                let tile = Tile::from_glyph(ch).ok_or(LevelError::InvalidTile {
                    ch,
                    pos: Point::new(x as i32, y as i32),
                })?;
                tiles.push(tile);
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(LevelError::InconsistentWidth {
                        row: y,
                        expected: w,
                        found: x,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }
        let size = layer_size(width.unwrap_or(0), height)?;
        Ok(Self { tiles, size })
    }

    /// (width, height) in cells.
    pub fn size(&self) -> Point {
        self.size
    }

    pub fn bounds(&self) -> Range {
        Range::from_size(self.size)
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds().contains(p) {
            return None;
        }
        // In bounds, so both coordinates are non-negative.
        Some(p.y as usize * self.size.x as usize + p.x as usize)
    }

    /// Tile at `p`, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Set the tile at `p`. Does nothing if out of bounds.
    pub fn set(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.index(p) {
            self.tiles[i] = tile;
        }
    }

    /// Whether `p` holds ground. Out-of-bounds cells are not solid.
    #[inline]
    pub fn is_solid(&self, p: Point) -> bool {
        self.at(p).is_some_and(Tile::is_solid)
    }

    /// Every ground tile, row-major.
    pub fn used_cells(&self) -> Vec<Point> {
        self.bounds().points().filter(|&p| self.is_solid(p)).collect()
    }

    /// Snapshot of walkable cells under `rule`, row-major.
    pub fn walkable_cells(&self, rule: WalkableRule) -> Vec<Point> {
        match rule {
            WalkableRule::Solid => self.used_cells(),
            WalkableRule::Surface { clearance } => self
                .bounds()
                .points()
                .filter(|&p| !self.is_solid(p) && self.ground_below(p, clearance))
                .collect(),
        }
    }

    /// A [`WalkableSource`] view of this layer under `rule`.
    pub fn walkable(&self, rule: WalkableRule) -> Walkable<'_> {
        Walkable { layer: self, rule }
    }

    fn ground_below(&self, p: Point, clearance: i32) -> bool {
        (1..=clearance).any(|k| self.is_solid(p.shift(0, k)))
    }
}

impl WalkableSource for TileLayer {
    /// The layer's used cells, like a tilemap's ground layer.
    fn walkable_cells(&self) -> Vec<Point> {
        self.used_cells()
    }
}

impl fmt::Display for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.y {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.size.x {
                let tile = self.at(Point::new(x, y)).unwrap_or_default();
                write!(f, "{}", tile.glyph())?;
            }
        }
        Ok(())
    }
}

/// A [`TileLayer`] paired with the [`WalkableRule`] to snapshot it with.
#[derive(Debug, Clone, Copy)]
pub struct Walkable<'a> {
    layer: &'a TileLayer,
    rule: WalkableRule,
}

impl WalkableSource for Walkable<'_> {
    fn walkable_cells(&self) -> Vec<Point> {
        self.layer.walkable_cells(self.rule)
    }
}
