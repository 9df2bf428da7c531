use std::{
    io,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use bevy::{
    app::App,
    asset::{
        io::Reader, AssetApp, AssetLoader, AssetPlugin, AssetServer, Assets, AsyncReadExt, Handle,
        LoadContext, LoadState,
    },
    math::UVec2,
    render::{
        render_asset::RenderAssetUsages,
        render_resource::{Extent3d, TextureDimension, TextureFormat},
        texture::Image,
    },
    utils::BoxedFuture,
    MinimalPlugins,
};
use espresso_atlas::{
    asset_loader::AtlasLoaderSettings, DuplicatePolicy, TextureAtlas, TextureAtlasPlugin,
};

/// Builds a blank image with the size found in a PNG header, without decoding pixels.
struct PngHeaderLoader {
    loads: Arc<AtomicUsize>,
}

impl AssetLoader for PngHeaderLoader {
    type Asset = Image;
    type Settings = ();
    type Error = io::Error;

    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a (),
        _load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            self.loads.fetch_add(1, Ordering::SeqCst);

            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let header = bytes
                .get(16..24)
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "truncated PNG"))?;
            let width = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
            let height = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);

            Ok(Image::new_fill(
                Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                TextureDimension::D2,
                &[0, 0, 0, 0],
                TextureFormat::Rgba8UnormSrgb,
                RenderAssetUsages::default(),
            ))
        })
    }

    fn extensions(&self) -> &[&str] {
        &["png"]
    }
}

struct Harness {
    app: App,
    image_loads: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        let image_loads = Arc::new(AtomicUsize::new(0));

        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: "tests/assets".to_owned(),
                ..Default::default()
            },
            TextureAtlasPlugin,
        ))
        .init_asset::<Image>()
        .register_asset_loader(PngHeaderLoader {
            loads: image_loads.clone(),
        });
        app.finish();
        app.cleanup();

        Self { app, image_loads }
    }

    fn load(&self, path: &'static str) -> Handle<TextureAtlas> {
        self.app.world.resource::<AssetServer>().load(path)
    }

    fn load_with_policy(
        &self,
        path: &'static str,
        policy: DuplicatePolicy,
    ) -> Handle<TextureAtlas> {
        let asset_server = self.app.world.resource::<AssetServer>();
        asset_server.load_with_settings(path, move |settings: &mut AtlasLoaderSettings| {
            settings.duplicate_policy = policy;
        })
    }

    fn wait(&mut self, handle: &Handle<TextureAtlas>) -> LoadState {
        for _ in 0..500 {
            self.app.update();
            let state = self
                .app
                .world
                .resource::<AssetServer>()
                .load_state(handle.id());
            if state == LoadState::Loaded || state == LoadState::Failed {
                return state;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("atlas did not finish loading");
    }

    fn atlas(&self, handle: &Handle<TextureAtlas>) -> &TextureAtlas {
        self.app
            .world
            .resource::<Assets<TextureAtlas>>()
            .get(handle)
            .unwrap()
    }

    fn atlas_count(&self) -> usize {
        self.app.world.resource::<Assets<TextureAtlas>>().len()
    }
}

#[test]
fn loads_regions_and_animations_from_a_description_file() {
    let mut harness = Harness::new();
    let handle = harness.load("chicken.atlas.xml");

    assert_eq!(harness.wait(&handle), LoadState::Loaded);

    let atlas = harness.atlas(&handle);
    assert_eq!(atlas.texture_size(), UVec2::new(64, 32));
    assert_eq!(atlas.region_count(), 5);
    assert_eq!(atlas.get_region("chicken:item:egg:0").unwrap().y(), 16);
    let walk = atlas.get_animation("chicken:right:walk").unwrap();
    assert_eq!(walk.frame_count(), 4);
    assert_eq!(walk.frame_delay(), Duration::from_millis(120));
    assert_eq!(harness.image_loads.load(Ordering::SeqCst), 1);
}

#[test]
fn texture_becomes_a_labeled_sub_asset() {
    let mut harness = Harness::new();
    let handle = harness.load("chicken.atlas.xml");
    assert_eq!(harness.wait(&handle), LoadState::Loaded);

    let texture = harness.atlas(&handle).texture().clone();
    let path = harness
        .app
        .world
        .resource::<AssetServer>()
        .get_path(texture.id())
        .unwrap();

    assert_eq!(path.path(), Path::new("chicken.atlas.xml"));
    assert_eq!(path.label(), Some("texture"));
    assert!(harness
        .app
        .world
        .resource::<Assets<Image>>()
        .get(&texture)
        .is_some());
}

#[test]
fn duplicates_fail_the_load_by_default() {
    let mut harness = Harness::new();
    let handle = harness.load("duplicates.atlas.xml");

    assert_eq!(harness.wait(&handle), LoadState::Failed);
    assert_eq!(harness.atlas_count(), 0);
}

#[test]
fn replace_setting_keeps_the_last_duplicate() {
    let mut harness = Harness::new();
    let handle = harness.load_with_policy("duplicates.atlas.xml", DuplicatePolicy::Replace);

    assert_eq!(harness.wait(&handle), LoadState::Loaded);

    let atlas = harness.atlas(&handle);
    assert_eq!(atlas.region_count(), 1);
    assert_eq!(atlas.get_region("chicken:item:egg:0").unwrap().x(), 16);
}

#[test]
fn missing_texture_fails_before_loading_any_image() {
    let mut harness = Harness::new();
    let handle = harness.load("no_texture.atlas.xml");

    assert_eq!(harness.wait(&handle), LoadState::Failed);
    assert_eq!(harness.atlas_count(), 0);
    assert_eq!(harness.image_loads.load(Ordering::SeqCst), 0);
}

#[test]
fn regions_are_checked_against_the_loaded_texture_size() {
    let mut harness = Harness::new();
    let handle = harness.load("oversized.atlas.xml");

    assert_eq!(harness.wait(&handle), LoadState::Failed);
    assert_eq!(harness.atlas_count(), 0);
}

#[test]
fn texture_that_is_not_an_image_fails_the_load() {
    let mut harness = Harness::new();
    let handle = harness.load("atlas_as_texture.atlas.xml");

    assert_eq!(harness.wait(&handle), LoadState::Failed);
}
