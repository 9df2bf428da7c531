//! Chicken Factory: a walking chicken and a row of eggs cut from one atlas description.

use bevy::prelude::*;
use espresso_atlas::{TextureAtlas, TextureAtlasPlugin};

const WALK: &str = "chicken:right:walk";
const EGG: &str = "chicken:item:egg:0";

#[derive(Resource)]
struct ChickenAtlas(Handle<TextureAtlas>);

#[derive(Component)]
struct Walker {
    speed: f32,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(ImagePlugin::default_nearest())) // prevents blurry sprites
        .add_plugins(TextureAtlasPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (spawn_factory, walk))
        .run();
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ChickenAtlas(asset_server.load("chicken.atlas.xml")));
    commands.spawn(Camera2dBundle::default());
}

fn spawn_factory(
    mut commands: Commands,
    mut asset_event_evr: EventReader<AssetEvent<TextureAtlas>>,
    texture_atlas_assets: Res<Assets<TextureAtlas>>,
    chicken_atlas: Res<ChickenAtlas>,
) {
    for ev in asset_event_evr.read() {
        let AssetEvent::Added { id } = ev else {
            continue;
        };
        if *id != chicken_atlas.0.id() {
            continue;
        }
        let Some(atlas) = texture_atlas_assets.get(*id) else {
            continue;
        };

        match atlas.create_animated_sprite(chicken_atlas.0.clone(), WALK) {
            Ok(mut chicken) => {
                let position = Vec3::new(-300.0, 0.0, 1.0);
                let scale = Vec3::splat(4.0);
                chicken.sprite.transform = Transform::from_translation(position).with_scale(scale);
                commands.spawn((chicken, Walker { speed: 60.0 }));
            }
            Err(err) => error!("{err}"),
        }

        for i in 0..5 {
            match atlas.create_sprite(EGG) {
                Ok(mut egg) => {
                    let position = Vec3::new(-200.0 + 100.0 * i as f32, -80.0, 0.0);
                    let scale = Vec3::splat(3.0);
                    egg.transform = Transform::from_translation(position).with_scale(scale);
                    commands.spawn(egg);
                }
                Err(err) => error!("{err}"),
            }
        }
    }
}

fn walk(time: Res<Time>, mut query: Query<(&Walker, &mut Transform)>) {
    for (walker, mut transform) in &mut query {
        transform.translation.x += walker.speed * time.delta_seconds();
        if transform.translation.x > 300.0 {
            transform.translation.x = -300.0;
        }
    }
}
