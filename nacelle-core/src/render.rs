//! Draw contract between the scene and a rendering back end
use nalgebra::Matrix4;

use crate::geometry::MeshData;
use crate::node::NodeArena;
use crate::ship::Ship;
use crate::texture::Texture;

/// Everything a back end needs to draw one node
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub name: &'a str,
    pub mesh: &'a MeshData,
    pub texture: Option<&'a Texture>,
    /// Node geometry to root frame, scale included
    pub model: Matrix4<f32>,
}

/// A rendering back end
pub trait Renderer {
    fn draw(&mut self, call: DrawCall<'_>);
}

/// Draw every node of an arena in insertion order
pub fn render_nodes<R: Renderer + ?Sized>(nodes: &NodeArena, renderer: &mut R) {
    for (id, node) in nodes.iter() {
        renderer.draw(DrawCall {
            name: node.name(),
            mesh: node.mesh(),
            texture: node.texture(),
            model: nodes.model_matrix(id),
        });
    }
}

/// Draw all five ship parts, body first
pub fn render_ship<R: Renderer + ?Sized>(ship: &Ship, renderer: &mut R) {
    render_nodes(ship.arena(), renderer);
}
