#![forbid(unsafe_code)]

//! Render layer: the surface effects write into.
//!
//! # Role in Glint
//! `glint-render` defines what an effect may do to the screen: create,
//! attach and detach nodes, read and write their text, and read and write
//! numeric style properties. Effects only ever touch the nodes they own.
//!
//! # Primary responsibilities
//! - **Surface**: the object-safe [`Surface`] contract.
//! - **MemorySurface**: a generational node arena implementing it.
//! - **Grid**: a character rasterizer for snapshots and terminal demos.
//! - **Bounds**: the rectangle type used for emission areas.

pub mod geometry;
pub mod memory;
pub mod raster;
pub mod surface;

pub use geometry::Bounds;
pub use memory::MemorySurface;
pub use raster::Grid;
pub use surface::{NodeId, NodeKind, Property, Rgb, Style, Surface};
