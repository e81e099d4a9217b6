//! Nacelle Core Library - articulated ship scene and its animation
//!
//! Loads text meshes, links rigid parts into a small transform hierarchy,
//! animates the ship's nacelles over time and hands resolved world
//! transforms to a rendering back end.

pub mod animation;
pub mod error;
pub mod geometry;
pub mod node;
pub mod obj;
pub mod projection;
pub mod render;
pub mod ship;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use animation::Status;
pub use error::{AssetError, MeshError, Result, TextureError};
pub use geometry::{MeshData, Triangle};
pub use node::{NodeArena, NodeId, TransformNode};
pub use obj::{load_mesh, parse_mesh, parse_mesh_bytes};
pub use projection::{Camera, ProjectionMode};
pub use render::{render_ship, DrawCall, Renderer};
pub use ship::{Ship, ShipAssets, ShipParts};
pub use texture::{load_texture, Texture};
pub use transform::{Orientation, Transform};
