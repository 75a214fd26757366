//! Navigation mesh storage and geometric queries.

use boreal_foundation::{Error, Result};
use glam::Vec3;

use crate::bvh::AabbTree;
use crate::material::SurfaceMaterial;

/// A hit this close to the line-of-sight target still counts as clear.
/// Creature position probes sit at waist height, slightly inside geometry.
const LOS_TOLERANCE: f32 = 0.5;

/// Rejection threshold for near-parallel rays and degenerate triangles.
const GEOM_EPSILON: f32 = 1e-7;

/// Result of a [`NavMesh::raycast`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit, in world units.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Index of the face that was hit.
    pub face: usize,
    /// Material of the hit face.
    pub material: SurfaceMaterial,
}

/// Result of a [`NavMesh::project_to_surface`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// The input point snapped to the face surface.
    pub position: Vec3,
    /// Index of the face the point landed on.
    pub face: usize,
    /// Material of that face.
    pub material: SurfaceMaterial,
}

/// A validated triangle navigation mesh.
///
/// Vertices, per-face materials, and precomputed face adjacency come straight
/// from the walkmesh data. The mesh is immutable after construction; areas
/// share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct NavMesh {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    adjacency: Vec<[i32; 3]>,
    materials: Vec<SurfaceMaterial>,
    tree: Option<AabbTree>,
}

impl NavMesh {
    /// Creates a mesh from raw walkmesh arrays.
    ///
    /// `adjacency[f][e]` names the face sharing edge `e` of face `f`, or `-1`
    /// on a boundary edge.
    ///
    /// # Errors
    ///
    /// Returns `CorruptData` when the arrays disagree in length, a face
    /// references a missing vertex, or an adjacency entry names a missing
    /// face.
    pub fn new(
        vertices: Vec<Vec3>,
        faces: Vec<[u32; 3]>,
        adjacency: Vec<[i32; 3]>,
        materials: Vec<SurfaceMaterial>,
    ) -> Result<Self> {
        if faces.len() != adjacency.len() || faces.len() != materials.len() {
            return Err(Error::corrupt_data(format!(
                "navmesh arrays disagree: {} faces, {} adjacency rows, {} materials",
                faces.len(),
                adjacency.len(),
                materials.len()
            )));
        }
        let vertex_count = vertices.len() as u64;
        for (index, face) in faces.iter().enumerate() {
            for &vertex in face {
                if u64::from(vertex) >= vertex_count {
                    return Err(Error::corrupt_data(format!(
                        "face {index} references missing vertex {vertex}"
                    )));
                }
            }
        }
        let face_count = i64::try_from(faces.len())
            .map_err(|_| Error::corrupt_data("face count exceeds adjacency range"))?;
        for (index, row) in adjacency.iter().enumerate() {
            for &neighbor in row {
                if neighbor != -1 && (neighbor < 0 || i64::from(neighbor) >= face_count) {
                    return Err(Error::corrupt_data(format!(
                        "face {index} adjacency references missing face {neighbor}"
                    )));
                }
            }
        }
        Ok(Self {
            vertices,
            faces,
            adjacency,
            materials,
            tree: None,
        })
    }

    /// Builds the AABB acceleration tree. Without it, queries fall back to
    /// scanning every face.
    #[must_use]
    pub fn with_aabb_tree(mut self) -> Self {
        self.tree = Some(AabbTree::build(&self.vertices, &self.faces));
        self
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the mesh has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The three corners of a face.
    ///
    /// # Panics
    ///
    /// Panics when `face` is out of range.
    #[must_use]
    pub fn face_vertices(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Centroid of a face.
    ///
    /// # Panics
    ///
    /// Panics when `face` is out of range.
    #[must_use]
    pub fn face_center(&self, face: usize) -> Vec3 {
        let [a, b, c] = self.face_vertices(face);
        (a + b + c) / 3.0
    }

    /// Material stamped on a face.
    ///
    /// # Panics
    ///
    /// Panics when `face` is out of range.
    #[must_use]
    pub fn face_material(&self, face: usize) -> SurfaceMaterial {
        self.materials[face]
    }

    /// Whether a face is walkable.
    ///
    /// # Panics
    ///
    /// Panics when `face` is out of range.
    #[must_use]
    pub fn is_face_walkable(&self, face: usize) -> bool {
        self.materials[face].is_walkable()
    }

    /// Neighbor faces of `face`, `-1` marking a boundary edge.
    pub(crate) fn face_adjacency(&self, face: usize) -> [i32; 3] {
        self.adjacency[face]
    }

    /// Casts a ray and returns the nearest intersected face.
    ///
    /// `direction` need not be normalized. Returns `None` for zero-length
    /// directions, non-positive distances, and meshes with no faces.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        if self.faces.is_empty() || !max_distance.is_finite() || max_distance <= 0.0 {
            return None;
        }
        let dir = direction.try_normalize()?;

        let mut candidates = Vec::new();
        if let Some(tree) = &self.tree {
            tree.ray_candidates(origin, dir, max_distance, &mut candidates);
            // Candidate order varies with the split; sort for determinism.
            candidates.sort_unstable();
        } else {
            candidates.extend(0..self.faces.len() as u32);
        }

        let mut best: Option<RayHit> = None;
        for face in candidates {
            let face = face as usize;
            let [a, b, c] = self.face_vertices(face);
            let Some(t) = intersect_triangle(origin, dir, a, b, c) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            if best.as_ref().is_none_or(|hit| t < hit.distance) {
                best = Some(RayHit {
                    distance: t,
                    point: origin + dir * t,
                    face,
                    material: self.materials[face],
                });
            }
        }
        best
    }

    /// Whether `from` can see `to`.
    ///
    /// Clear when nothing is hit, when the hit lands within half a unit of
    /// the target (probes sit at waist height, slightly inside geometry), or
    /// when the hit face is walkable ground rather than blocking geometry.
    /// A point always sees itself.
    #[must_use]
    pub fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= GEOM_EPSILON {
            return true;
        }
        match self.raycast(from, delta, distance) {
            None => true,
            Some(hit) => hit.distance >= distance - LOS_TOLERANCE || hit.material.is_walkable(),
        }
    }

    /// Snaps a point to the nearest walkable face directly above or below it.
    ///
    /// Among walkable faces whose XY footprint contains the point, picks the
    /// one minimizing the height difference. Returns `None` when the point is
    /// over no walkable face; callers treat that as "destination rejected".
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn project_to_surface(&self, point: Vec3) -> Option<SurfacePoint> {
        let mut candidates = Vec::new();
        if let Some(tree) = &self.tree {
            tree.column_candidates(point.x, point.y, &mut candidates);
            candidates.sort_unstable();
        } else {
            candidates.extend(0..self.faces.len() as u32);
        }

        let mut best: Option<SurfacePoint> = None;
        let mut best_delta = f32::INFINITY;
        for face in candidates {
            let face = face as usize;
            if !self.materials[face].is_walkable() {
                continue;
            }
            let [a, b, c] = self.face_vertices(face);
            let Some(height) = height_at_xy(point, a, b, c) else {
                continue;
            };
            let delta = (point.z - height).abs();
            if delta < best_delta {
                best_delta = delta;
                best = Some(SurfacePoint {
                    position: Vec3::new(point.x, point.y, height),
                    face,
                    material: self.materials[face],
                });
            }
        }
        best
    }
}

/// Möller–Trumbore ray/triangle intersection. Returns the ray parameter of
/// the hit, without backface culling.
fn intersect_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = dir.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < GEOM_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = inv_det * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv_det * edge2.dot(q);
    (t > GEOM_EPSILON).then_some(t)
}

/// Face height under an XY point, via barycentric interpolation. `None` when
/// the point lies outside the face's XY footprint or the face is vertical.
fn height_at_xy(point: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let v0 = (b - a).truncate();
    let v1 = (c - a).truncate();
    let v2 = (point - a).truncate();
    let den = v0.x * v1.y - v1.x * v0.y;
    if den.abs() < GEOM_EPSILON {
        return None;
    }
    let v = (v2.x * v1.y - v1.x * v2.y) / den;
    let w = (v0.x * v2.y - v2.x * v0.y) / den;
    let u = 1.0 - v - w;
    let inside = v >= -GEOM_EPSILON && w >= -GEOM_EPSILON && u >= -GEOM_EPSILON;
    inside.then(|| u * a.z + v * b.z + w * c.z)
}
