//! Аватар игрока: spawn рига, загрузка glTF модели, передача клипов
//!
//! Asset pipeline — внешний коллаборатор контроллера: клиент загружает
//! scene и named clips, подвешивает модель под риг и отдаёт handles
//! через AvatarClips. Дальше контроллер сам.

use bevy::gltf::Gltf;
use bevy::prelude::*;

use wayfarer_controller::{
    attach_camera, log_warning, spawn_avatar, AvatarClips, AvatarConfig,
};

/// Handle на glTF + ссылка на корень рига до момента bind'а
#[derive(Resource)]
struct AvatarAssets {
    gltf: Handle<Gltf>,
    root: Entity,
    bound: bool,
}

pub struct PlayerAvatarPlugin;

impl Plugin for PlayerAvatarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player)
            .add_systems(Update, bind_model);
    }
}

fn spawn_player(mut commands: Commands, asset_server: Res<AssetServer>) {
    // Physics mode + head tracking + поза правой руки (дефолтный профиль)
    let config = AvatarConfig::default();
    let nodes = spawn_avatar(&mut commands, &config, Vec3::new(0.0, 1.0, 0.0));

    // Камера хоста отдаётся ригу: re-parent под pitch pivot
    let camera = commands.spawn(Camera3d::default()).id();
    attach_camera(&mut commands, &nodes, camera, config.camera_offset);

    commands.insert_resource(AvatarAssets {
        gltf: asset_server.load("adventurer/Adventurer.gltf"),
        root: nodes.root,
        bound: false,
    });
}

/// Когда glTF загрузился: скелетная модель под риг + клипы контроллеру
fn bind_model(
    mut commands: Commands,
    mut assets: ResMut<AvatarAssets>,
    gltfs: Res<Assets<Gltf>>,
) {
    if assets.bound {
        return;
    }
    let Some(gltf) = gltfs.get(&assets.gltf) else {
        return;
    };
    assets.bound = true;

    let Some(scene) = gltf.scenes.first().cloned() else {
        log_warning("⚠️ В glTF нет ни одной сцены — аватар останется без модели");
        return;
    };

    // Ноги на нижней точке капсулы (центр минус half_height+radius),
    // разворот на 180°: модель смотрит туда же, куда камера
    let model = commands
        .spawn((
            SceneRoot(scene),
            Transform::from_xyz(0.0, -0.9, 0.0)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
        ))
        .id();
    commands.entity(assets.root).add_child(model);

    commands.entity(assets.root).insert(AvatarClips {
        idle: gltf.named_animations.get("Idle").cloned(),
        run: gltf.named_animations.get("Run").cloned(),
    });
}
