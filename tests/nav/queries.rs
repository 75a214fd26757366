//! Scene-level navigation queries
//!
//! Builds small multi-part scenes and checks raycasts, sight lines,
//! projection, and routing against the geometry by hand.

use boreal_foundation::ErrorKind;
use boreal_nav::{NavMesh, SurfaceMaterial};
use glam::Vec3;

/// Two 40x40 floors stacked at z = 0 (stone) and z = 3 (wood).
fn two_story() -> NavMesh {
    NavMesh::new(
        vec![
            Vec3::new(-20.0, -20.0, 0.0),
            Vec3::new(20.0, -20.0, 0.0),
            Vec3::new(20.0, 20.0, 0.0),
            Vec3::new(-20.0, 20.0, 0.0),
            Vec3::new(-20.0, -20.0, 3.0),
            Vec3::new(20.0, -20.0, 3.0),
            Vec3::new(20.0, 20.0, 3.0),
            Vec3::new(-20.0, 20.0, 3.0),
        ],
        vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]],
        vec![[-1, -1, 1], [0, -1, -1], [-1, -1, 3], [2, -1, -1]],
        vec![
            SurfaceMaterial::Stone,
            SurfaceMaterial::Stone,
            SurfaceMaterial::Wood,
            SurfaceMaterial::Wood,
        ],
    )
    .unwrap()
}

/// A 100x100 stone courtyard with an unwalkable screen wall at x = 0,
/// spanning y -10..10 and z -1..5.
fn walled_courtyard() -> NavMesh {
    NavMesh::new(
        vec![
            Vec3::new(-50.0, -50.0, 0.0),
            Vec3::new(50.0, -50.0, 0.0),
            Vec3::new(50.0, 50.0, 0.0),
            Vec3::new(-50.0, 50.0, 0.0),
            Vec3::new(0.0, -10.0, -1.0),
            Vec3::new(0.0, 10.0, -1.0),
            Vec3::new(0.0, 10.0, 5.0),
            Vec3::new(0.0, -10.0, 5.0),
        ],
        vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]],
        vec![[-1, -1, 1], [0, -1, -1], [-1, -1, 3], [2, -1, -1]],
        vec![
            SurfaceMaterial::Stone,
            SurfaceMaterial::Stone,
            SurfaceMaterial::NonWalk,
            SurfaceMaterial::NonWalk,
        ],
    )
    .unwrap()
}

/// A 3x3 grid of unit quads on the ground plane. Cell (row, column) spans
/// x column..column+1 and y row..row+1; its faces are 2 * (row * 3 + column)
/// and that plus one.
fn grid(materials: [[SurfaceMaterial; 3]; 3]) -> NavMesh {
    let lower = |r: i32, c: i32| 2 * (r * 3 + c);
    let upper = |r: i32, c: i32| 2 * (r * 3 + c) + 1;
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut adjacency = Vec::new();
    let mut face_materials = Vec::new();
    for row in 0..3i32 {
        for column in 0..3i32 {
            let base = u32::try_from(vertices.len()).unwrap();
            let (x, y) = (column as f32, row as f32);
            vertices.push(Vec3::new(x, y, 0.0));
            vertices.push(Vec3::new(x + 1.0, y, 0.0));
            vertices.push(Vec3::new(x + 1.0, y + 1.0, 0.0));
            vertices.push(Vec3::new(x, y + 1.0, 0.0));
            faces.push([base, base + 1, base + 2]);
            faces.push([base, base + 2, base + 3]);
            let south = if row > 0 { upper(row - 1, column) } else { -1 };
            let east = if column < 2 { upper(row, column + 1) } else { -1 };
            let north = if row < 2 { lower(row + 1, column) } else { -1 };
            let west = if column > 0 { lower(row, column - 1) } else { -1 };
            adjacency.push([south, east, upper(row, column)]);
            adjacency.push([lower(row, column), north, west]);
            let material = materials[row as usize][column as usize];
            face_materials.push(material);
            face_materials.push(material);
        }
    }
    NavMesh::new(vertices, faces, adjacency, face_materials).unwrap()
}

/// A landing, a ramp rising two units, and an upper landing, strung along X.
fn ramp() -> NavMesh {
    NavMesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(3.0, 0.0, 2.0),
            Vec3::new(3.0, 2.0, 2.0),
            Vec3::new(2.0, 2.0, 2.0),
        ],
        vec![
            [0, 1, 2],
            [0, 2, 3],
            [4, 5, 6],
            [4, 6, 7],
            [8, 9, 10],
            [8, 10, 11],
        ],
        vec![
            [-1, 3, 1],
            [0, -1, -1],
            [-1, 5, 3],
            [2, -1, 0],
            [-1, -1, 5],
            [4, -1, 2],
        ],
        vec![SurfaceMaterial::Stone; 6],
    )
    .unwrap()
}

// =============================================================================
// Raycasts
// =============================================================================

#[test]
fn nearest_story_wins_a_downward_cast() {
    let mesh = two_story();

    let hit = mesh
        .raycast(Vec3::new(3.0, 2.0, 10.0), Vec3::NEG_Z, 100.0)
        .unwrap();
    assert!((hit.distance - 7.0).abs() < 1e-4);
    assert!((hit.point.z - 3.0).abs() < 1e-4);
    assert_eq!(hit.material, SurfaceMaterial::Wood);

    // From between the floors only the ground remains.
    let hit = mesh
        .raycast(Vec3::new(3.0, 2.0, 1.5), Vec3::NEG_Z, 100.0)
        .unwrap();
    assert!((hit.distance - 1.5).abs() < 1e-4);
    assert_eq!(hit.material, SurfaceMaterial::Stone);
}

#[test]
fn aabb_tree_and_linear_scan_return_identical_hits() {
    let scan = walled_courtyard();
    let tree = walled_courtyard().with_aabb_tree();

    let mut hits = 0;
    for x in -4..=4 {
        for y in -4..=4 {
            let origin = Vec3::new(x as f32 * 10.0, y as f32 * 10.0, 8.0);
            for direction in [
                Vec3::NEG_Z,
                Vec3::new(1.0, 0.3, -0.6),
                Vec3::new(-0.4, 1.0, -0.2),
            ] {
                let expected = scan.raycast(origin, direction, 200.0);
                assert_eq!(tree.raycast(origin, direction, 200.0), expected);
                if expected.is_some() {
                    hits += 1;
                }
            }
        }
    }
    assert!(hits > 0, "the ray grid should intersect the scene");
}

#[test]
fn rays_that_clear_the_scene_miss() {
    let mesh = walled_courtyard().with_aabb_tree();
    // Past the courtyard edge, straight up, and stopped short of the wall.
    assert!(
        mesh.raycast(Vec3::new(60.0, 60.0, 5.0), Vec3::NEG_Z, 100.0)
            .is_none()
    );
    assert!(
        mesh.raycast(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, 100.0)
            .is_none()
    );
    assert!(
        mesh.raycast(Vec3::new(-5.0, 0.0, 1.0), Vec3::X, 2.0)
            .is_none()
    );
}

// =============================================================================
// Line of sight
// =============================================================================

#[test]
fn a_screen_wall_blocks_sight_both_ways() {
    let mesh = walled_courtyard();
    let west = Vec3::new(-5.0, 0.0, 1.0);
    let east = Vec3::new(5.0, 0.0, 1.0);
    assert!(!mesh.has_line_of_sight(west, east));
    assert!(!mesh.has_line_of_sight(east, west));

    // Past the end of the wall the same gaze is clear.
    assert!(mesh.has_line_of_sight(Vec3::new(-5.0, 20.0, 1.0), Vec3::new(5.0, 20.0, 1.0)));
}

#[test]
fn near_misses_within_the_probe_tolerance_stay_visible() {
    let mesh = walled_courtyard();
    let west = Vec3::new(-5.0, 0.0, 1.0);
    // A target just past the wall plane reads as visible; a full unit past
    // it is genuinely occluded.
    assert!(mesh.has_line_of_sight(west, Vec3::new(0.4, 0.0, 1.0)));
    assert!(!mesh.has_line_of_sight(west, Vec3::new(1.0, 0.0, 1.0)));
}

#[test]
fn walkable_ground_never_occludes() {
    let mesh = walled_courtyard();
    // The segment dips through the floor plane well away from the wall.
    assert!(mesh.has_line_of_sight(Vec3::new(-5.0, 20.0, 2.0), Vec3::new(5.0, 20.0, -2.0)));
}

#[test]
fn sight_is_reflexive_even_off_mesh() {
    let mesh = walled_courtyard();
    for point in [Vec3::ZERO, Vec3::new(500.0, -300.0, 12.0)] {
        assert!(mesh.has_line_of_sight(point, point));
    }
}

// =============================================================================
// Surface projection
// =============================================================================

#[test]
fn projection_snaps_to_the_nearest_story() {
    let mesh = two_story();

    let upper = mesh.project_to_surface(Vec3::new(3.0, 2.0, 2.2)).unwrap();
    assert!((upper.position.z - 3.0).abs() < 1e-5);
    assert_eq!(upper.material, SurfaceMaterial::Wood);

    let lower = mesh.project_to_surface(Vec3::new(3.0, 2.0, 1.2)).unwrap();
    assert!(lower.position.z.abs() < 1e-5);
    assert_eq!(lower.material, SurfaceMaterial::Stone);
}

#[test]
fn projection_rejects_hazards_and_the_void() {
    let stone = SurfaceMaterial::Stone;
    let mesh = grid([
        [stone, stone, stone],
        [stone, SurfaceMaterial::Lava, stone],
        [stone, stone, stone],
    ]);
    assert!(mesh.project_to_surface(Vec3::new(1.5, 1.5, 0.5)).is_none());
    assert!(mesh.project_to_surface(Vec3::new(0.5, 1.5, 0.5)).is_some());
    assert!(mesh.project_to_surface(Vec3::new(9.0, 9.0, 0.0)).is_none());
}

// =============================================================================
// Pathfinding
// =============================================================================

#[test]
fn routes_detour_around_a_lava_pool() {
    let stone = SurfaceMaterial::Stone;
    let mesh = grid([
        [stone, stone, stone],
        [stone, SurfaceMaterial::Lava, stone],
        [stone, stone, stone],
    ]);
    let start = Vec3::new(0.5, 1.5, 0.0);
    let goal = Vec3::new(2.5, 1.5, 0.0);

    let route = mesh.find_path(start, goal).unwrap();
    assert_eq!(route.first(), Some(&start));
    assert_eq!(route.last(), Some(&goal));
    assert!(route.len() > 2);
    for point in &route[1..route.len() - 1] {
        let over_lava = point.x > 1.0 && point.x < 2.0 && point.y > 1.0 && point.y < 2.0;
        assert!(!over_lava, "route enters the pool at {point}");
    }
}

#[test]
fn a_lava_moat_severs_the_area() {
    let stone = SurfaceMaterial::Stone;
    let lava = SurfaceMaterial::Lava;
    let mesh = grid([[stone, lava, stone]; 3]);
    assert!(
        mesh.find_path(Vec3::new(0.5, 1.5, 0.0), Vec3::new(2.5, 1.5, 0.0))
            .is_none()
    );
}

#[test]
fn ramps_climb_between_landings() {
    let mesh = ramp();
    let start = Vec3::new(0.5, 0.5, 0.0);
    let goal = Vec3::new(2.5, 0.5, 2.0);

    let route = mesh.find_path(start, goal).unwrap();
    assert_eq!(route.first(), Some(&start));
    assert_eq!(route.last(), Some(&goal));
    assert!(route.len() >= 4);
    for point in &route {
        assert!(point.z >= -0.01 && point.z <= 2.01);
        assert!(point.x >= 0.0 && point.x <= 3.0);
    }
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn torn_walkmesh_data_is_rejected() {
    let error = NavMesh::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![[0, 1, 5]],
        vec![[-1, -1, -1]],
        vec![SurfaceMaterial::Stone],
    )
    .unwrap_err();
    assert!(matches!(error.kind, ErrorKind::CorruptData { .. }));
}
