//! A* pathfinding over navigation mesh face adjacency.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;

use crate::mesh::NavMesh;

/// Frontier entry ordered for a min-heap: lowest cost estimate first, face
/// index breaking ties so equal-cost expansions replay identically.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    estimate: f32,
    face: u32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the maximum; reverse both keys for min-first.
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.face.cmp(&self.face))
    }
}

impl NavMesh {
    /// Finds a path from `start` to `goal` across walkable faces.
    ///
    /// Both endpoints are projected onto the mesh; returns `None` when either
    /// projection fails or no chain of adjacent walkable faces connects them.
    /// The returned route begins at `start`, walks intermediate face centers,
    /// and ends at `goal`. No smoothing is applied.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn find_path(&self, start: Vec3, goal: Vec3) -> Option<Vec<Vec3>> {
        let start_face = self.project_to_surface(start)?.face;
        let goal_face = self.project_to_surface(goal)?.face;
        if start_face == goal_face {
            return Some(vec![start, goal]);
        }

        let face_count = self.face_count();
        let mut g_score = vec![f32::INFINITY; face_count];
        let mut came_from = vec![u32::MAX; face_count];
        let mut closed = vec![false; face_count];
        let mut open = BinaryHeap::new();

        g_score[start_face] = 0.0;
        open.push(OpenNode {
            estimate: self.face_center(start_face).distance(goal),
            face: start_face as u32,
        });

        while let Some(OpenNode { face, .. }) = open.pop() {
            let face = face as usize;
            if closed[face] {
                continue;
            }
            closed[face] = true;
            if face == goal_face {
                return Some(self.rebuild_route(&came_from, start, goal, face));
            }

            let center = self.face_center(face);
            for neighbor in self.face_adjacency(face) {
                if neighbor < 0 {
                    continue;
                }
                let neighbor = neighbor as usize;
                if closed[neighbor] || !self.is_face_walkable(neighbor) {
                    continue;
                }
                let neighbor_center = self.face_center(neighbor);
                let tentative = g_score[face] + center.distance(neighbor_center);
                if tentative < g_score[neighbor] {
                    g_score[neighbor] = tentative;
                    came_from[neighbor] = face as u32;
                    open.push(OpenNode {
                        estimate: tentative + neighbor_center.distance(goal),
                        face: neighbor as u32,
                    });
                }
            }
        }
        None
    }

    /// Walks `came_from` back from the goal face and emits the route points.
    fn rebuild_route(&self, came_from: &[u32], start: Vec3, goal: Vec3, goal_face: usize) -> Vec<Vec3> {
        let mut chain = vec![goal_face];
        let mut cursor = goal_face;
        while came_from[cursor] != u32::MAX {
            cursor = came_from[cursor] as usize;
            chain.push(cursor);
        }
        chain.reverse();

        let mut route = Vec::with_capacity(chain.len());
        route.push(start);
        // Interior faces only; entering the endpoint centers would backtrack.
        for &face in &chain[1..chain.len() - 1] {
            route.push(self.face_center(face));
        }
        route.push(goal);
        route
    }
}
