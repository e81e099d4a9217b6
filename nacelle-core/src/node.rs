//! Rigid scene parts and the arena that links them into a hierarchy.
//!
//! A [`TransformNode`] keeps its rotation, translation and composite
//! (`translation * rotation`) matrices in step with its fields: every setter
//! rebuilds them before returning. Parent links live in the owning
//! [`NodeArena`] as [`NodeId`] indices, so a node never owns its parent.
use nalgebra::{Matrix4, Vector3};
use std::fmt;
use std::sync::Arc;

use crate::geometry::MeshData;
use crate::texture::Texture;
use crate::transform::{Orientation, Transform};

/// Index of a node inside its [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Link from a child to its parent, with the child's anchor in the parent frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentLink {
    pub parent: NodeId,
    pub offset: Vector3<f32>,
}

/// One rigid part: orientation, placement, scale and the geometry it draws
#[derive(Debug, Clone)]
pub struct TransformNode {
    name: String,
    orientation: Orientation,
    position: Vector3<f32>,
    scale: f32,

    mesh: Arc<MeshData>,
    texture: Option<Texture>,

    parent: Option<ParentLink>,

    rotation: Matrix4<f32>,
    translation: Matrix4<f32>,
    to_space: Matrix4<f32>,
}

impl TransformNode {
    /// Where a freshly created node sits before anything moves it
    pub const DEFAULT_POSITION: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);

    pub fn new(name: impl Into<String>, mesh: Arc<MeshData>) -> Self {
        let mut node = Self {
            name: name.into(),
            orientation: Orientation::zero(),
            position: Self::DEFAULT_POSITION,
            scale: 1.0,
            mesh,
            texture: None,
            parent: None,
            rotation: Matrix4::identity(),
            translation: Matrix4::identity(),
            to_space: Matrix4::identity(),
        };
        node.update_matrices();
        node
    }

    pub fn with_texture(mut self, texture: Option<Texture>) -> Self {
        self.texture = texture;
        self
    }

    fn update_matrices(&mut self) {
        self.rotation = Transform::rotation_matrix(&self.orientation);
        self.translation = Transform::translation_matrix(&self.position);
        self.to_space = self.translation * self.rotation;
    }

    // Setters

    pub fn set_bank(&mut self, bank: f32) {
        self.orientation.bank = bank;
        self.update_matrices();
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.orientation.heading = heading;
        self.update_matrices();
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.orientation.pitch = pitch;
        self.update_matrices();
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.update_matrices();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.update_matrices();
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bank(&self) -> f32 {
        self.orientation.bank
    }

    pub fn heading(&self) -> f32 {
        self.orientation.heading
    }

    pub fn pitch(&self) -> f32 {
        self.orientation.pitch
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn mesh(&self) -> &Arc<MeshData> {
        &self.mesh
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent.map(|link| link.parent)
    }

    /// Anchor of this node inside its parent's frame (zero when unparented)
    pub fn offset(&self) -> Vector3<f32> {
        self.parent.map_or_else(Vector3::zeros, |link| link.offset)
    }

    pub fn rotation(&self) -> &Matrix4<f32> {
        &self.rotation
    }

    pub fn translation(&self) -> &Matrix4<f32> {
        &self.translation
    }

    /// Translation times rotation for this node alone
    pub fn to_space(&self) -> &Matrix4<f32> {
        &self.to_space
    }

    /// Translation by the parent offset, identity for a root node
    pub fn hierarchy_translation(&self) -> Matrix4<f32> {
        Transform::translation_matrix(&self.offset())
    }
}

/// Owner of a small forest of [`TransformNode`]s
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<TransformNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: TransformNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Panics if `id` does not belong to this arena
    pub fn get(&self, id: NodeId) -> &TransformNode {
        &self.nodes[id.0]
    }

    /// Panics if `id` does not belong to this arena
    pub fn get_mut(&mut self, id: NodeId) -> &mut TransformNode {
        &mut self.nodes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Attach `child` to `parent`, anchored at `offset` in the parent's frame.
    ///
    /// Only the link is recorded; the child's own angles and position are
    /// untouched. Linking a node under one of its own descendants is a
    /// programming error and panics.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId, offset: Vector3<f32>) {
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "linking {} under {} would create a cycle",
            child,
            parent
        );
        self.nodes[child.0].parent = Some(ParentLink { parent, offset });
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.0].parent() {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Number of links between `id` and its root
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let limit = self.nodes.len();
        let mut current = self.nodes[id.0].parent();
        let mut steps = 0;
        std::iter::from_fn(move || {
            let node = current?;
            steps += 1;
            assert!(steps <= limit, "parent chain of {} does not terminate", id);
            current = self.nodes[node.0].parent();
            Some(node)
        })
    }

    /// Resolve a node's transform into the root frame.
    ///
    /// `world(n) = world(parent) * T(offset_n) * to_space(n)`, and a root's
    /// world transform is its own `to_space`.
    pub fn world_transform(&self, id: NodeId) -> Matrix4<f32> {
        let limit = self.nodes.len();
        let mut node = &self.nodes[id.0];
        let mut world = *node.to_space();
        let mut steps = 0;

        while let Some(link) = node.parent {
            steps += 1;
            assert!(steps <= limit, "parent chain of {} does not terminate", id);
            world = Transform::translation_matrix(&link.offset) * world;
            node = &self.nodes[link.parent.0];
            world = node.to_space() * world;
        }

        world
    }

    /// World transform with the node's own scale applied to its geometry.
    ///
    /// Scale is local to the node and never inherited by children.
    pub fn model_matrix(&self, id: NodeId) -> Matrix4<f32> {
        self.world_transform(id) * Transform::scale_matrix(self.nodes[id.0].scale())
    }
}
