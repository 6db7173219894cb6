use avian3d::prelude::*;
use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};
use bevy_ledge_guard::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ledge Guard Playground".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(BevyLedgeGuardPlugin)
        .add_systems(Startup, (setup, spawn_hud, setup_cursor_grab))
        .add_systems(Update, (toggle_cursor_grab, update_hud))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = PlayerConfig::default();

    // Spawn on top of the plateau; the body gets a visible capsule since
    // the camera watches it from behind.
    let player = spawn_player(&mut commands, config, Vec3::new(0.0, 4.0, 0.0));
    let capsule_height = config.stand_height - config.radius * 2.0;
    commands.entity(player).insert((
        Mesh3d(meshes.add(Capsule3d::new(config.radius, capsule_height))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.8, 0.45, 0.2),
            ..default()
        })),
    ));

    let ground_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.55, 0.35),
        perceptual_roughness: 0.9,
        ..default()
    });
    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.38, 0.36, 0.40),
        perceptual_roughness: 0.85,
        ..default()
    });

    // Lower floor
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(120.0, 120.0))),
        MeshMaterial3d(ground_mat),
        Transform::default(),
        RigidBody::Static,
        Collider::half_space(Vec3::Y),
        CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
    ));

    // Plateau: 3 m tall, so its rim reads as a ledge (default threshold
    // 1.7 m) and the gate stops the player at the edge.
    spawn_box(
        &mut commands,
        &mut meshes,
        stone.clone(),
        Vec3::new(16.0, 3.0, 16.0),
        Vec3::new(0.0, 1.5, 0.0),
    );

    // Low step off the plateau's +X side: only a 1 m drop, walkable.
    spawn_box(
        &mut commands,
        &mut meshes,
        stone,
        Vec3::new(6.0, 2.0, 6.0),
        Vec3::new(11.0, 1.0, 0.0),
    );

    commands.spawn((
        DirectionalLight {
            illuminance: 14000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.7, 0.5, 0.0)),
    ));

    commands.spawn(AmbientLight {
        color: Color::srgb(0.6, 0.7, 0.9),
        brightness: 350.0,
        affects_lightmapped_meshes: true,
    });
}

fn spawn_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
    ));
}

// ── HUD ─────────────────────────────────────────────────────────────

#[derive(Component)]
struct HudText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        HudText,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
    ));
}

fn update_hud(
    player_query: Query<(&PlayerVelocity, &LedgeGate, Has<Grounded>), With<Player>>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok((velocity, gate, grounded)) = player_query.single() else {
        return;
    };

    let horizontal_speed = Vec2::new(velocity.x, velocity.z).length();
    let state = match gate.decision {
        GateDecision::Clear => "clear",
        GateDecision::Blocked => "BLOCKED",
        GateDecision::Airborne => "airborne",
    };

    for mut text in &mut hud_query {
        **text = format!(
            "Speed: {:.1} m/s\nGate:  {} (scale {:.0e})\nGround: {}",
            horizontal_speed,
            state,
            gate.input_scale,
            if grounded { "yes" } else { "no" },
        );
    }
}

// ── Cursor grab ─────────────────────────────────────────────────────

fn setup_cursor_grab(mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    if let Ok(mut cursor) = cursor_query.single_mut() {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}

fn toggle_cursor_grab(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut cursor) = cursor_query.single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    } else if mouse.just_pressed(MouseButton::Left) && cursor.grab_mode == CursorGrabMode::None {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}
