//! Growable vertex/index buffers for the terrain and river meshes.
//!
//! Buffers are cleared and refilled on every chunk rebuild. A
//! [`MeshBufferPool`] keeps them between rebuilds so their allocations are
//! reused.

use bevy::asset::RenderAssetUsages;
use bevy::color::LinearRgba;
use bevy::mesh::Indices;
use bevy::platform::collections::HashMap;
use bevy::prelude::{Mesh, Reflect, Resource, Vec2, Vec3};
use bevy::render::render_resource::PrimitiveTopology;

use crate::math;

/// Which of the two chunk meshes a buffer feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MeshKind {
    /// Land surface with per-vertex colors.
    Terrain,
    /// Water surface with flow UVs.
    River,
}

/// Positions, colors, UVs and triangle indices for one mesh.
///
/// Vertices are never shared between triangles, so adjacent faces can carry
/// different colors at the same position.
#[derive(Debug, Clone)]
pub struct HexMeshBuffer {
    kind: MeshKind,
    positions: Vec<Vec3>,
    colors: Vec<LinearRgba>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl HexMeshBuffer {
    pub fn new(kind: MeshKind) -> Self {
        Self {
            kind,
            positions: Vec::new(),
            colors: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn kind(&self) -> MeshKind {
        self.kind
    }

    /// Empties all lists, keeping their capacity.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[LinearRgba] {
        &self.colors
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    // ── Triangles ──────────────────────────────────────────────────

    pub fn add_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let index = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3]);
        self.indices.extend([index, index + 1, index + 2]);
    }

    pub fn add_triangle_color(&mut self, color: LinearRgba) {
        self.colors.extend([color; 3]);
    }

    pub fn add_triangle_colors(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba) {
        self.colors.extend([c1, c2, c3]);
    }

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uvs.extend([uv1, uv2, uv3]);
    }

    // ── Quads ──────────────────────────────────────────────────────

    /// Adds a quad whose `v1`-`v2` edge faces its `v3`-`v4` edge.
    pub fn add_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let index = self.positions.len() as u32;
        self.positions.extend([v1, v2, v3, v4]);
        self.indices
            .extend([index, index + 2, index + 1, index + 1, index + 2, index + 3]);
    }

    /// Colors the first edge with `c1` and the opposite edge with `c2`.
    pub fn add_quad_color(&mut self, c1: LinearRgba, c2: LinearRgba) {
        self.colors.extend([c1, c1, c2, c2]);
    }

    pub fn add_quad_colors(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba, c4: LinearRgba) {
        self.colors.extend([c1, c2, c3, c4]);
    }

    pub fn add_quad_uv(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.uvs.extend([
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        ]);
    }

    // ── Publishing ─────────────────────────────────────────────────

    /// Per-vertex normals: the sum of the face normals of every triangle
    /// using the vertex, normalized.
    pub fn normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let normal = math::compute_normal(self.positions[a], self.positions[b], self.positions[c]);
            normals[a] += normal;
            normals[b] += normal;
            normals[c] += normal;
        }
        normals.into_iter().map(Vec3::normalize_or_zero).collect()
    }

    /// Copies the buffer into a renderable triangle-list [`Mesh`].
    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals().iter().map(|n| n.to_array()).collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals);

        if !self.colors.is_empty() {
            let colors: Vec<[f32; 4]> = self
                .colors
                .iter()
                .map(|c| [c.red, c.green, c.blue, c.alpha])
                .collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
        }
        if !self.uvs.is_empty() {
            let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|uv| uv.to_array()).collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        }

        mesh.with_inserted_indices(Indices::U32(self.indices.clone()))
    }
}

/// Free buffers kept between chunk rebuilds, per mesh kind.
#[derive(Resource, Default)]
pub struct MeshBufferPool {
    free: HashMap<MeshKind, Vec<HexMeshBuffer>>,
}

impl MeshBufferPool {
    /// Hands out an empty buffer, reusing a returned one when available.
    pub fn checkout(&mut self, kind: MeshKind) -> HexMeshBuffer {
        match self.free.get_mut(&kind).and_then(Vec::pop) {
            Some(mut buffer) => {
                buffer.clear();
                buffer
            }
            None => HexMeshBuffer::new(kind),
        }
    }

    pub fn give_back(&mut self, buffer: HexMeshBuffer) {
        self.free.entry(buffer.kind).or_default().push(buffer);
    }

    pub fn available(&self, kind: MeshKind) -> usize {
        self.free.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Index arithmetic ───────────────────────────────────────────

    #[test]
    fn triangle_indices_follow_vertex_count() {
        let mut b = HexMeshBuffer::new(MeshKind::Terrain);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        assert_eq!(b.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(b.vertex_count(), 6);
        assert_eq!(b.triangle_count(), 2);
    }

    #[test]
    fn quad_splits_into_two_triangles() {
        let mut b = HexMeshBuffer::new(MeshKind::Terrain);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_quad(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE);
        assert_eq!(&b.indices()[3..], &[3, 5, 4, 4, 5, 6]);
        assert_eq!(b.triangle_count(), 3);
    }

    #[test]
    fn identical_positions_are_not_merged() {
        let mut b = HexMeshBuffer::new(MeshKind::Terrain);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_triangle_color(LinearRgba::RED);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_triangle_color(LinearRgba::BLUE);
        assert_eq!(b.vertex_count(), 6);
        assert_eq!(b.colors()[0], LinearRgba::RED);
        assert_eq!(b.colors()[3], LinearRgba::BLUE);
    }

    // ── Attributes ─────────────────────────────────────────────────

    #[test]
    fn quad_color_pairs_follow_edges() {
        let mut b = HexMeshBuffer::new(MeshKind::Terrain);
        b.add_quad_color(LinearRgba::RED, LinearRgba::BLUE);
        assert_eq!(
            b.colors(),
            &[LinearRgba::RED, LinearRgba::RED, LinearRgba::BLUE, LinearRgba::BLUE]
        );
    }

    #[test]
    fn quad_uv_layout() {
        let mut b = HexMeshBuffer::new(MeshKind::River);
        b.add_quad_uv(0.0, 1.0, 0.2, 0.4);
        assert_eq!(
            b.uvs(),
            &[
                Vec2::new(0.0, 0.2),
                Vec2::new(1.0, 0.2),
                Vec2::new(0.0, 0.4),
                Vec2::new(1.0, 0.4)
            ]
        );
    }

    #[test]
    fn counter_clockwise_from_above_faces_up() {
        // Center, north corner, east corner: the order the interior fan uses.
        let mut b = HexMeshBuffer::new(MeshKind::Terrain);
        b.add_triangle(Vec3::ZERO, Vec3::new(0.0, 0.0, 8.0), Vec3::new(6.9, 0.0, 4.0));
        b.add_quad(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        );
        for n in b.normals() {
            assert!((n - Vec3::Y).length() < 1e-5, "normal {n:?} should point up");
        }
    }

    #[test]
    fn clear_keeps_kind_and_empties_lists() {
        let mut b = HexMeshBuffer::new(MeshKind::River);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_triangle_uv(Vec2::ZERO, Vec2::X, Vec2::Y);
        b.clear();
        assert!(b.is_empty());
        assert!(b.uvs().is_empty() && b.indices().is_empty());
        assert_eq!(b.kind(), MeshKind::River);
    }

    #[test]
    fn mesh_carries_buffer_contents() {
        let mut b = HexMeshBuffer::new(MeshKind::Terrain);
        b.add_quad(Vec3::ZERO, Vec3::X, Vec3::NEG_Z, Vec3::new(1.0, 0.0, -1.0));
        b.add_quad_color(LinearRgba::RED, LinearRgba::GREEN);
        let mesh = b.to_mesh();
        assert_eq!(mesh.count_vertices(), 4);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).is_none());
        assert_eq!(mesh.indices().map(|i| i.len()), Some(6));
    }

    // ── Pool ───────────────────────────────────────────────────────

    #[test]
    fn pool_reuses_returned_buffers_cleared() {
        let mut pool = MeshBufferPool::default();
        let mut b = pool.checkout(MeshKind::Terrain);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        pool.give_back(b);
        assert_eq!(pool.available(MeshKind::Terrain), 1);
        assert_eq!(pool.available(MeshKind::River), 0);

        let again = pool.checkout(MeshKind::Terrain);
        assert!(again.is_empty());
        assert!(again.positions.capacity() >= 3);
        assert_eq!(pool.available(MeshKind::Terrain), 0);
    }

    #[test]
    fn pool_keeps_kinds_apart() {
        let mut pool = MeshBufferPool::default();
        pool.give_back(HexMeshBuffer::new(MeshKind::River));
        assert_eq!(pool.checkout(MeshKind::Terrain).kind(), MeshKind::Terrain);
        assert_eq!(pool.checkout(MeshKind::River).kind(), MeshKind::River);
    }
}
