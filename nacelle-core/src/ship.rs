//! The articulated ship: a main body carrying two main nacelles, each of
//! which carries a spinning front nacelle.
//!
//! ```text
//! body
//! ├── nacelle_right ── front_right
//! └── nacelle_left ─── front_left
//! ```
use log::{debug, info};
use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::animation::{front_nacelle_bank, step_status, vibration_offset, Status};
use crate::error::Result;
use crate::geometry::MeshData;
use crate::node::{NodeArena, NodeId, TransformNode};
use crate::obj::load_mesh;
use crate::texture::{load_texture, Texture};

const NACELLE_RIGHT_OFFSET: Vector3<f32> = Vector3::new(-1.0, 0.2, 0.1);
const NACELLE_LEFT_OFFSET: Vector3<f32> = Vector3::new(-1.0, 0.2, -0.1);
const FRONT_NACELLE_OFFSET: Vector3<f32> = Vector3::new(1.67493, 1.80568, 0.0);

/// File locations of everything the ship draws
#[derive(Debug, Clone, PartialEq)]
pub struct ShipAssets {
    pub body_mesh: PathBuf,
    pub nacelle_mesh: PathBuf,
    pub front_mesh: PathBuf,
    /// Texture for the body and main nacelles
    pub hull_texture: Option<PathBuf>,
    /// Texture for the front nacelles
    pub front_texture: Option<PathBuf>,
}

impl ShipAssets {
    /// Standard asset names inside `dir`; textures are used only if present
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let existing = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };

        Self {
            body_mesh: dir.join("mainBody.obj"),
            nacelle_mesh: dir.join("nacelle_body.obj"),
            front_mesh: dir.join("nacelle_front.obj"),
            hull_texture: existing("ship_texture.bmp"),
            front_texture: existing("front_texture.bmp"),
        }
    }
}

/// Loaded geometry for the three part families.
///
/// Left and right parts share one mesh each, so only three meshes are held.
#[derive(Debug, Clone)]
pub struct ShipParts {
    pub body: Arc<MeshData>,
    pub nacelle: Arc<MeshData>,
    pub front: Arc<MeshData>,
    pub hull_texture: Option<Texture>,
    pub front_texture: Option<Texture>,
}

impl ShipParts {
    pub fn new(body: MeshData, nacelle: MeshData, front: MeshData) -> Self {
        Self {
            body: Arc::new(body),
            nacelle: Arc::new(nacelle),
            front: Arc::new(front),
            hull_texture: None,
            front_texture: None,
        }
    }

    pub fn load(assets: &ShipAssets) -> Result<Self> {
        let mut parts = Self::new(
            load_mesh(&assets.body_mesh)?,
            load_mesh(&assets.nacelle_mesh)?,
            load_mesh(&assets.front_mesh)?,
        );
        parts.hull_texture = assets.hull_texture.as_ref().map(load_texture).transpose()?;
        parts.front_texture = assets.front_texture.as_ref().map(load_texture).transpose()?;
        Ok(parts)
    }
}

/// Five-part ship with engine status
#[derive(Debug, Clone)]
pub struct Ship {
    nodes: NodeArena,
    body: NodeId,
    nacelle_left: NodeId,
    nacelle_right: NodeId,
    front_left: NodeId,
    front_right: NodeId,
    status: Status,
}

impl Ship {
    /// Assemble the hierarchy. `initial` picks the starting nacelle pose:
    /// folded for `Off`, raised for `On`.
    pub fn new(parts: ShipParts, initial: Status) -> Self {
        let mut nodes = NodeArena::new();

        let hull = |name: &str, mesh: &Arc<MeshData>| {
            TransformNode::new(name, Arc::clone(mesh)).with_texture(parts.hull_texture.clone())
        };
        let front = |name: &str| {
            TransformNode::new(name, Arc::clone(&parts.front))
                .with_texture(parts.front_texture.clone())
        };

        let body = nodes.insert(hull("main body", &parts.body));
        let nacelle_left = nodes.insert(hull("left nacelle", &parts.nacelle));
        let nacelle_right = nodes.insert(hull("right nacelle", &parts.nacelle));
        let front_left = nodes.insert(front("front left nacelle"));
        let front_right = nodes.insert(front("front right nacelle"));

        nodes.set_parent(nacelle_right, body, NACELLE_RIGHT_OFFSET);
        nodes.set_parent(nacelle_left, body, NACELLE_LEFT_OFFSET);
        nodes.set_parent(front_right, nacelle_right, FRONT_NACELLE_OFFSET);
        nodes.set_parent(front_left, nacelle_left, FRONT_NACELLE_OFFSET);

        let mut ship = Self {
            nodes,
            body,
            nacelle_left,
            nacelle_right,
            front_left,
            front_right,
            status: initial,
        };
        ship.set_main_bank(initial.resting_bank());
        ship
    }

    /// Load all meshes and textures, then assemble
    pub fn load(assets: &ShipAssets, initial: Status) -> Result<Self> {
        let parts = ShipParts::load(assets)?;
        info!(
            "ship loaded: body {} / nacelle {} / front {} triangles",
            parts.body.triangle_count(),
            parts.nacelle.triangle_count(),
            parts.front.triangle_count()
        );
        Ok(Self::new(parts, initial))
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Flip the engines toward the opposite state
    pub fn request_status_change(&mut self) {
        let next = self.status.toggled();
        debug!("status change requested: {} -> {}", self.status, next);
        self.status = next;
    }

    /// Move the whole ship
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.nodes.get_mut(self.body).set_position(position);
    }

    /// Turn the whole ship
    pub fn set_heading(&mut self, heading: f32) {
        self.nodes.get_mut(self.body).set_heading(heading);
    }

    pub fn position(&self) -> Vector3<f32> {
        self.nodes.get(self.body).position()
    }

    pub fn heading(&self) -> f32 {
        self.nodes.get(self.body).heading()
    }

    /// Advance the animation.
    ///
    /// Front nacelle spin and the nacelle vibration are functions of
    /// `absolute_time`; the status transition integrates `delta_time`.
    pub fn tick(&mut self, absolute_time: f64, delta_time: f64) {
        let spin = front_nacelle_bank(absolute_time);
        self.nodes.get_mut(self.front_left).set_bank(spin);
        self.nodes.get_mut(self.front_right).set_bank(-spin);

        let bank = self.nodes.get(self.nacelle_right).bank();
        let (status, bank) = step_status(self.status, bank, delta_time as f32);
        if status != self.status {
            info!("engines {}", status);
        }
        self.status = status;
        self.set_main_bank(bank);

        let offset = vibration_offset(absolute_time);
        self.nodes.get_mut(self.nacelle_left).set_position(offset);
        self.nodes.get_mut(self.nacelle_right).set_position(offset);
    }

    fn set_main_bank(&mut self, bank: f32) {
        self.nodes.get_mut(self.nacelle_right).set_bank(bank);
        self.nodes.get_mut(self.nacelle_left).set_bank(-bank);
    }

    pub fn arena(&self) -> &NodeArena {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &TransformNode {
        self.nodes.get(id)
    }

    /// Parts in draw order, body first
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes.iter()
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn nacelle_left(&self) -> NodeId {
        self.nacelle_left
    }

    pub fn nacelle_right(&self) -> NodeId {
        self.nacelle_right
    }

    pub fn front_left(&self) -> NodeId {
        self.front_left
    }

    pub fn front_right(&self) -> NodeId {
        self.front_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{BANK_OFF, BANK_ON};
    use crate::error::{AssetError, MeshError, TextureError};
    use crate::obj::parse_mesh;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;
    use std::fs;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";

    fn parts() -> ShipParts {
        let mesh = parse_mesh(TRIANGLE).unwrap();
        ShipParts::new(mesh.clone(), mesh.clone(), mesh)
    }

    fn write_assets(dir: &Path) {
        for name in ["mainBody.obj", "nacelle_body.obj", "nacelle_front.obj"] {
            fs::write(dir.join(name), TRIANGLE).unwrap();
        }
    }

    fn assert_mirrored(ship: &Ship) {
        let left = ship.node(ship.nacelle_left()).bank();
        let right = ship.node(ship.nacelle_right()).bank();
        assert_eq!(left, -right);
    }

    #[test]
    fn test_hierarchy_wiring() {
        let ship = Ship::new(parts(), Status::Off);
        let arena = ship.arena();
        assert_eq!(arena.len(), 5);

        assert_eq!(ship.node(ship.body()).parent(), None);
        assert_eq!(ship.node(ship.nacelle_left()).parent(), Some(ship.body()));
        assert_eq!(ship.node(ship.nacelle_right()).parent(), Some(ship.body()));
        assert_eq!(ship.node(ship.front_left()).parent(), Some(ship.nacelle_left()));
        assert_eq!(ship.node(ship.front_right()).parent(), Some(ship.nacelle_right()));
        assert_eq!(ship.node(ship.nacelle_right()).offset(), NACELLE_RIGHT_OFFSET);
        assert_eq!(arena.depth(ship.front_left()), 2);

        let names: Vec<&str> = ship.nodes().map(|(_, node)| node.name()).collect();
        assert_eq!(names[0], "main body");
    }

    #[test]
    fn test_nacelle_meshes_shared() {
        let ship = Ship::new(parts(), Status::Off);
        let left = ship.node(ship.nacelle_left()).mesh();
        let right = ship.node(ship.nacelle_right()).mesh();
        assert!(Arc::ptr_eq(left, right));
        assert!(!Arc::ptr_eq(left, ship.node(ship.body()).mesh()));
    }

    #[test]
    fn test_initial_pose() {
        let off = Ship::new(parts(), Status::Off);
        assert_eq!(off.status(), Status::Off);
        assert_eq!(off.node(off.nacelle_right()).bank(), FRAC_PI_2);
        assert_mirrored(&off);

        let on = Ship::new(parts(), Status::On);
        assert_eq!(on.node(on.nacelle_right()).bank(), BANK_ON);
        assert_mirrored(&on);
    }

    #[test]
    fn test_power_cycle_through_ticks() {
        let mut ship = Ship::new(parts(), Status::Off);
        let dt = 1.0 / 30.0;
        let mut t = 0.0;

        ship.request_status_change();
        assert_eq!(ship.status(), Status::TransitionOn);
        for _ in 0..30 {
            t += dt;
            ship.tick(t, dt);
            assert_mirrored(&ship);
        }
        assert_eq!(ship.status(), Status::On);
        assert_eq!(ship.node(ship.nacelle_right()).bank(), BANK_ON);

        // Stable until asked again
        for _ in 0..30 {
            t += dt;
            ship.tick(t, dt);
        }
        assert_eq!(ship.status(), Status::On);

        ship.request_status_change();
        for _ in 0..30 {
            t += dt;
            ship.tick(t, dt);
            assert_mirrored(&ship);
            assert!(ship.node(ship.nacelle_right()).bank() <= BANK_OFF);
        }
        assert_eq!(ship.status(), Status::Off);
        assert_eq!(ship.node(ship.nacelle_right()).bank(), BANK_OFF);
    }

    #[test]
    fn test_power_down_from_zero_bank() {
        let mut ship = Ship::new(parts(), Status::Off);
        ship.status = Status::TransitionOff;
        ship.set_main_bank(0.0);

        let limit = (FRAC_PI_2 / 0.1).ceil() as usize;
        let mut t = 0.0;
        let mut ticks = 0;
        while ship.status() != Status::Off {
            t += 0.1;
            ship.tick(t, 0.1);
            ticks += 1;
            assert_mirrored(&ship);
            assert!(ship.node(ship.nacelle_right()).bank() <= FRAC_PI_2);
            assert!(ticks <= limit);
        }
        assert_eq!(ship.node(ship.nacelle_right()).bank(), FRAC_PI_2);
    }

    #[test]
    fn test_reverse_mid_transition() {
        let mut ship = Ship::new(parts(), Status::Off);
        ship.request_status_change();
        ship.tick(0.1, 0.1);
        let raised = ship.node(ship.nacelle_right()).bank();
        assert!(raised < BANK_OFF);

        ship.request_status_change();
        assert_eq!(ship.status(), Status::TransitionOff);
        ship.tick(0.2, 0.05);
        assert!(ship.node(ship.nacelle_right()).bank() > raised);
    }

    #[test]
    fn test_tick_drives_front_and_vibration() {
        let mut ship = Ship::new(parts(), Status::Off);
        ship.tick(0.1, 0.1);

        let left = ship.node(ship.front_left()).bank();
        let right = ship.node(ship.front_right()).bank();
        assert!((left - 2.5).abs() < 1e-6);
        assert_eq!(right, -left);

        let expected = vibration_offset(0.1);
        assert_eq!(ship.node(ship.nacelle_left()).position(), expected);
        assert_eq!(ship.node(ship.nacelle_right()).position(), expected);
    }

    #[test]
    fn test_body_moves_whole_ship() {
        let mut ship = Ship::new(parts(), Status::Off);
        ship.tick(0.0, 0.0);
        let arena = ship.arena();
        let before = arena
            .world_transform(ship.front_right())
            .transform_point(&Point3::origin());

        ship.set_position(ship.position() + Vector3::new(0.0, 5.0, 0.0));
        let after = ship
            .arena()
            .world_transform(ship.front_right())
            .transform_point(&Point3::origin());
        assert!((after - before - Vector3::new(0.0, 5.0, 0.0)).norm() < 1e-5);

        ship.set_heading(0.5);
        assert_eq!(ship.heading(), 0.5);
    }

    #[test]
    fn test_from_dir_detects_textures() {
        let dir = tempfile::tempdir().unwrap();
        let assets = ShipAssets::from_dir(dir.path());
        assert_eq!(assets.body_mesh, dir.path().join("mainBody.obj"));
        assert!(assets.hull_texture.is_none());

        fs::write(dir.path().join("ship_texture.bmp"), b"BM").unwrap();
        let assets = ShipAssets::from_dir(dir.path());
        assert_eq!(assets.hull_texture, Some(dir.path().join("ship_texture.bmp")));
        assert!(assets.front_texture.is_none());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        fs::write(dir.path().join("front_texture.bmp"), b"BM").unwrap();

        let ship = Ship::load(&ShipAssets::from_dir(dir.path()), Status::Off).unwrap();
        assert!(!ship.node(ship.body()).is_textured());
        assert!(ship.node(ship.front_left()).is_textured());
        assert_eq!(ship.node(ship.body()).mesh().triangle_count(), 1);
    }

    #[test]
    fn test_load_missing_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ship::load(&ShipAssets::from_dir(dir.path()), Status::Off).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, AssetError::Mesh(MeshError::AssetNotFound { .. })));
    }

    #[test]
    fn test_load_missing_texture_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        let mut assets = ShipAssets::from_dir(dir.path());
        assets.hull_texture = Some(dir.path().join("missing.bmp"));

        let err = Ship::load(&assets, Status::Off).unwrap_err();
        assert!(matches!(err, AssetError::Texture(TextureError::AssetNotFound { .. })));
    }

    #[test]
    fn test_bundled_assets_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets");
        let ship = Ship::load(&ShipAssets::from_dir(dir), Status::Off).unwrap();
        for (_, node) in ship.nodes() {
            assert!(!node.mesh().is_empty(), "{} has no triangles", node.name());
        }
    }

    #[test]
    fn test_load_bad_mesh_content() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        fs::write(dir.path().join("nacelle_front.obj"), "v 0 zero 0\n").unwrap();

        let err = Ship::load(&ShipAssets::from_dir(dir.path()), Status::Off).unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, AssetError::Mesh(MeshError::Parse { line: 1, .. })));
    }
}
