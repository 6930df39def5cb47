use crate::game_logic::{ROAD_WIDTH, TrackCurve};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROAD_SEGMENTS: usize = 600;
const BARRIER_COUNT: usize = 240;
const CURB_COUNT: usize = 400;
const TREE_COUNT: usize = 100;
const SCENERY_SEED: u64 = 0x5eed;

/// Lighting preset picked on the menu.
#[derive(Resource, Clone, Default)]
pub struct SceneryMode {
    pub night: bool,
}

impl SceneryMode {
    pub fn toggle(&mut self) -> bool {
        self.night = !self.night;
        self.night
    }

    pub fn label(&self) -> &str {
        if self.night { "Night" } else { "Day" }
    }
}

/// Everything spawned for the race scene, torn down when the race ends.
#[derive(Component)]
pub struct TrackScenery;

/// Builds the road ribbon as a flat triangle strip just above the ground.
pub fn road_mesh(track: &TrackCurve, segments: usize) -> Mesh {
    let ribbon = track.road_ribbon(segments);
    let mut positions = Vec::with_capacity(ribbon.len() * 2);
    let mut uvs = Vec::with_capacity(ribbon.len() * 2);
    let mut indices = Vec::with_capacity(segments * 6);

    for (i, slice) in ribbon.iter().enumerate() {
        positions.push([slice.left.x, 0.01, slice.left.y]);
        positions.push([slice.right.x, 0.01, slice.right.y]);
        uvs.push([0.0, slice.t * 60.0]);
        uvs.push([1.0, slice.t * 60.0]);

        if i < segments {
            let base = (i * 2) as u32;
            indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
        }
    }
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

pub fn spawn_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    track: Res<TrackCurve>,
    scenery: Res<SceneryMode>,
) {
    spawn_lighting(&mut commands, scenery.night);

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(700.0, 700.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.16, 0.42, 0.1))),
        Transform::from_xyz(0.0, -0.02, 0.0),
        TrackScenery,
    ));

    commands.spawn((
        Mesh3d(meshes.add(road_mesh(&track, ROAD_SEGMENTS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.2, 0.22),
            perceptual_roughness: 0.9,
            ..default()
        })),
        TrackScenery,
    ));

    // start/finish line
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(ROAD_WIDTH, 0.02, 1.5))),
        MeshMaterial3d(materials.add(Color::WHITE)),
        Transform::from_xyz(track.point_at(0.0).x, 0.02, track.point_at(0.0).y)
            .with_rotation(Quat::from_rotation_y(track.heading_at(0.0))),
        TrackScenery,
    ));

    let red = materials.add(Color::srgb(0.8, 0.1, 0.1));
    let white = materials.add(Color::srgb(0.92, 0.92, 0.92));

    let barrier = meshes.add(Cuboid::new(0.6, 1.0, 4.0));
    for (i, slice) in track
        .offset_slices(BARRIER_COUNT, ROAD_WIDTH / 2.0 + 1.0)
        .iter()
        .take(BARRIER_COUNT)
        .enumerate()
    {
        let material = if i % 4 < 2 { red.clone() } else { white.clone() };
        let rotation = Quat::from_rotation_y(track.heading_at(slice.t));
        for edge in [slice.left, slice.right] {
            commands.spawn((
                Mesh3d(barrier.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(edge.x, 0.5, edge.y).with_rotation(rotation),
                TrackScenery,
            ));
        }
    }

    let curb = meshes.add(Cuboid::new(0.6, 0.08, 2.4));
    for (i, slice) in track
        .offset_slices(CURB_COUNT, ROAD_WIDTH / 2.0 - 0.3)
        .iter()
        .take(CURB_COUNT)
        .enumerate()
    {
        let material = if i % 2 == 0 { red.clone() } else { white.clone() };
        let rotation = Quat::from_rotation_y(track.heading_at(slice.t));
        for edge in [slice.left, slice.right] {
            commands.spawn((
                Mesh3d(curb.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(edge.x, 0.04, edge.y).with_rotation(rotation),
                TrackScenery,
            ));
        }
    }

    spawn_trees(&mut commands, &mut meshes, &mut materials, &track);
}

// trees on both sides of the road, same layout every race
fn spawn_trees(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    track: &TrackCurve,
) {
    let mut rng = StdRng::seed_from_u64(SCENERY_SEED);
    let trunk = meshes.add(Cylinder::new(0.4, 3.0));
    let crown = meshes.add(Cone::new(2.2, 5.0));
    let bark = materials.add(Color::srgb(0.36, 0.25, 0.13));
    let leaves = materials.add(Color::srgb(0.1, 0.35, 0.12));

    for i in 0..TREE_COUNT {
        let t = i as f32 / TREE_COUNT as f32;
        let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let offset = ROAD_WIDTH / 2.0 + rng.random_range(8.0..30.0);
        let spot = track.point_at(t) + track.normal_at(t) * offset * side;
        let scale = rng.random_range(0.7..1.4);

        commands
            .spawn((
                Transform::from_xyz(spot.x, 0.0, spot.y).with_scale(Vec3::splat(scale)),
                Visibility::default(),
                TrackScenery,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(trunk.clone()),
                    MeshMaterial3d(bark.clone()),
                    Transform::from_xyz(0.0, 1.5, 0.0),
                ));
                parent.spawn((
                    Mesh3d(crown.clone()),
                    MeshMaterial3d(leaves.clone()),
                    Transform::from_xyz(0.0, 5.0, 0.0),
                ));
            });
    }
}

fn spawn_lighting(commands: &mut Commands, night: bool) {
    let (ambient, sun, sky) = if night {
        (80.0, 1_500.0, Color::srgb(0.02, 0.02, 0.06))
    } else {
        (400.0, 12_000.0, Color::srgb(0.53, 0.81, 0.92))
    };

    commands.insert_resource(ClearColor(sky));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: ambient,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: sun,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(80.0, 80.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
        TrackScenery,
    ));
}
