//! **platnav-core**: core types for side-scroller grid navigation.
//!
//! This crate provides the foundational types used across the *platnav*
//! crates: integer grid geometry, world-space vectors, the mapping between
//! the two, and tile layers that produce walkable-cell snapshots.

pub mod geom;
pub mod layout;
pub mod tiles;

pub use geom::{Point, Range, Vec2};
pub use layout::{DEFAULT_CELL_SIZE, GridLayout};
pub use tiles::{
    LevelError, MAX_LAYER_TILES, Tile, TileLayer, Walkable, WalkableRule, WalkableSource,
};
