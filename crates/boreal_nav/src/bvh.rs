//! Flat-arena AABB tree over navigation mesh faces.
//!
//! Built once per mesh by median-splitting face centroids along the widest
//! axis. Nodes live in a single `Vec` and reference children by index, so the
//! tree is cheap to build and to walk without pointer chasing.

use glam::Vec3;

/// Faces per leaf before splitting stops.
const LEAF_SIZE: usize = 4;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    fn from_triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            min: a.min(b).min(c),
            max: a.max(b).max(c),
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab test. `inv_dir` components may be infinite for axis-parallel
    /// rays; the min/max fold discards the NaNs that produces.
    fn intersects_ray(self, origin: Vec3, inv_dir: Vec3, max_t: f32) -> bool {
        let t1 = (self.min - origin) * inv_dir;
        let t2 = (self.max - origin) * inv_dir;
        let mut t_min = 0.0f32;
        let mut t_max = max_t;
        for axis in 0..3 {
            t_min = t_min.max(t1[axis].min(t2[axis]));
            t_max = t_max.min(t1[axis].max(t2[axis]));
        }
        t_min <= t_max
    }

    fn contains_xy(self, x: f32, y: f32) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    bounds: Aabb,
    /// Left child index; unused for leaves.
    left: u32,
    /// Right child index; unused for leaves.
    right: u32,
    /// Start of this node's slice of `face_order`.
    start: u32,
    /// Face count; zero marks an internal node.
    count: u32,
}

/// Acceleration structure for raycasts and point-column queries.
#[derive(Debug, Clone)]
pub(crate) struct AabbTree {
    nodes: Vec<Node>,
    face_order: Vec<u32>,
}

impl AabbTree {
    /// Builds a tree over the given faces. Empty meshes yield an empty tree
    /// that reports no candidates.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn build(vertices: &[Vec3], faces: &[[u32; 3]]) -> Self {
        let bounds: Vec<Aabb> = faces
            .iter()
            .map(|face| {
                Aabb::from_triangle(
                    vertices[face[0] as usize],
                    vertices[face[1] as usize],
                    vertices[face[2] as usize],
                )
            })
            .collect();
        let centroids: Vec<Vec3> = bounds.iter().map(|b| b.center()).collect();

        let mut tree = Self {
            nodes: Vec::new(),
            face_order: (0..faces.len() as u32).collect(),
        };
        if !faces.is_empty() {
            let count = faces.len();
            tree.split(0, count, &bounds, &centroids);
        }
        tree
    }

    /// Recursively partitions `face_order[start..start + count]`, appending
    /// the subtree's root node and returning its index.
    #[allow(clippy::cast_possible_truncation)]
    fn split(&mut self, start: usize, count: usize, bounds: &[Aabb], centroids: &[Vec3]) -> u32 {
        let slice = &self.face_order[start..start + count];
        let node_bounds = slice
            .iter()
            .fold(Aabb::empty(), |acc, &face| acc.union(bounds[face as usize]));

        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            bounds: node_bounds,
            left: 0,
            right: 0,
            start: start as u32,
            count: count as u32,
        });

        if count <= LEAF_SIZE {
            return index;
        }

        // Median split along the widest centroid axis.
        let centroid_bounds = slice
            .iter()
            .fold(Aabb::empty(), |acc, &face| {
                let c = centroids[face as usize];
                acc.union(Aabb { min: c, max: c })
            });
        let extent = centroid_bounds.max - centroid_bounds.min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        let mid = count / 2;
        self.face_order[start..start + count].select_nth_unstable_by(mid, |&a, &b| {
            centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
        });

        let left = self.split(start, mid, bounds, centroids);
        let right = self.split(start + mid, count - mid, bounds, centroids);
        let node = &mut self.nodes[index as usize];
        node.left = left;
        node.right = right;
        node.count = 0;
        index
    }

    /// Collects faces whose bounds the ray may cross within `max_t`.
    pub(crate) fn ray_candidates(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_t: f32,
        out: &mut Vec<u32>,
    ) {
        if self.nodes.is_empty() {
            return;
        }
        let inv_dir = direction.recip();
        let mut stack = vec![0u32];
        while let Some(index) = stack.pop() {
            let node = self.nodes[index as usize];
            if !node.bounds.intersects_ray(origin, inv_dir, max_t) {
                continue;
            }
            if node.count > 0 {
                let start = node.start as usize;
                out.extend_from_slice(&self.face_order[start..start + node.count as usize]);
            } else {
                stack.push(node.left);
                stack.push(node.right);
            }
        }
    }

    /// Collects faces whose bounds contain the XY point, for surface
    /// projection.
    pub(crate) fn column_candidates(&self, x: f32, y: f32, out: &mut Vec<u32>) {
        if self.nodes.is_empty() {
            return;
        }
        let mut stack = vec![0u32];
        while let Some(index) = stack.pop() {
            let node = self.nodes[index as usize];
            if !node.bounds.contains_xy(x, y) {
                continue;
            }
            if node.count > 0 {
                let start = node.start as usize;
                out.extend_from_slice(&self.face_order[start..start + node.count as usize]);
            } else {
                stack.push(node.left);
                stack.push(node.right);
            }
        }
    }
}
