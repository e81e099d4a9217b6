//! ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nacelle_core::{Camera, DrawCall, Renderer, Transform, Triangle};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    light_dir: Vector3<f32>,
    triangles_drawn: usize,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            light_dir: Vector3::new(0.0, 0.0, 1.0),
            triangles_drawn: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.triangles_drawn = 0;
    }

    /// Clear the buffers and take the camera used by following draws
    pub fn begin_frame(&mut self, camera: &Camera) {
        self.clear();
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix();
        // Headlight: lit from where the camera looks
        self.light_dir = -camera.forward();
    }

    /// Triangles that survived projection since the last clear
    pub fn triangles_drawn(&self) -> usize {
        self.triangles_drawn
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth_buffer[y * self.width + x]
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle<'_>,
        mvp: &Matrix4<f32>,
        model: &Matrix4<f32>,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0f32, 0.0f32, 0.0f32); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(triangle.vertices) {
            let point = Point3::from_homogeneous(*vertex).unwrap_or_else(Point3::origin);
            match Camera::project_with(mvp, &point, self.width as u32, self.height as u32) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Flat shading from the world-space normal
        let normal = shading_normal(triangle, model);
        let brightness = normal.dot(&self.light_dir).abs();

        // Map brightness to a visible character
        let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
        let char_index = 1 + (brightness * steps).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.triangles_drawn += 1;
        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    /// Write the frame, starting at terminal row `top`
    pub fn present<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let mut current: Option<Color> = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let c = self.char_at(x, y);

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn draw(&mut self, call: DrawCall<'_>) {
        let mvp = Transform::mvp_matrix(&call.model, &self.view, &self.projection);
        for triangle in call.mesh.triangles() {
            self.render_triangle(&triangle, &mvp, &call.model);
        }
    }
}

/// Averaged corner normals in world space, or the geometric normal when the
/// mesh carries none
fn shading_normal(triangle: &Triangle<'_>, model: &Matrix4<f32>) -> Vector3<f32> {
    let local: Vector4<f32> = triangle.normals.iter().sum();
    let local = if local.xyz().norm_squared() > 1e-12 {
        local.xyz()
    } else {
        triangle.face_normal()
    };
    let world = model * local.push(0.0);
    world.xyz().try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
