//! This crate loads named sprite regions and frame animations from XML atlas descriptions.
//!
//! `espresso_atlas` introduces a definition of an atlas description file and the corresponding
//! [`AtlasLoader`](crate::asset_loader::AtlasLoader). Assets with the `atlas.xml` extension can be
//! loaded just like any other asset via the [`AssetServer`](::bevy::asset::AssetServer) and will
//! yield a [`TextureAtlas`](crate::atlas::TextureAtlas) [`Handle`](::bevy::asset::Handle).
//!
//! ### `player.atlas.xml`
//! ```xml
//! <Atlas>
//!   <Resource>player</Resource>              <!-- Namespace of every key below -->
//!   <Texture>textures/player.png</Texture>   <!-- Path to an image from AssetFolder -->
//!   <Regions>                                <!-- Mandatory, may be empty -->
//!     <!-- Registered as "player:up:idle:0"; x, y, width and height default to 0 -->
//!     <Region name="idle" group="up" frame="0" x="0" y="0" width="16" height="16" />
//!     <Region name="idle" group="up" frame="1" x="16" y="0" width="16" height="16" />
//!   </Regions>
//!   <Animations>                             <!-- Mandatory, may be empty -->
//!     <!-- Registered as "player:up:idle"; frames "0-1" resolve to "player:up:idle:0" and
//!          "player:up:idle:1"; delay is in milliseconds and defaults to 0 -->
//!     <Animation name="idle" group="up" frames="0-1" delay="100" />
//!   </Animations>
//! </Atlas>
//! ```
//!
//! ```no_run
//! # use bevy::prelude::*;
//! # use espresso_atlas::{TextureAtlas, TextureAtlasPlugin};
//! #
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TextureAtlasPlugin)
//!         .add_systems(Update, spawn_player)
//!         .run();
//! }
//!
//! fn spawn_player(
//!     mut commands: Commands,
//!     asset_server: Res<AssetServer>,
//!     atlases: Res<Assets<TextureAtlas>>,
//!     mut handle: Local<Option<Handle<TextureAtlas>>>,
//!     mut spawned: Local<bool>,
//! ) {
//!     let handle = handle.get_or_insert_with(|| asset_server.load("player.atlas.xml"));
//!     let Some(texture_atlas) = atlases.get(handle.id()) else {
//!         return;
//!     };
//!     if !*spawned {
//!         let bundle = texture_atlas.create_animated_sprite(handle.clone(), "player:up:idle");
//!         if let Ok(bundle) = bundle {
//!             commands.spawn(bundle);
//!         }
//!         *spawned = true;
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(unused_imports, missing_docs)]

use bevy::{
    app::Update,
    asset::AssetApp,
    prelude::{App, Plugin},
};

pub mod animation;
pub mod asset_loader;
pub mod atlas;
pub mod description;
pub mod error;
pub mod region;

pub use animation::{AnimatedSprite, AnimatedSpriteBundle, Animation, AnimationPlayback};
pub use atlas::{DuplicatePolicy, TextureAtlas};
pub use error::AtlasError;
pub use region::TextureRegion;

/// Adds atlas description loading and atlas sprite animation to the app.
pub struct TextureAtlasPlugin;

impl Plugin for TextureAtlasPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<atlas::TextureAtlas>()
            .init_asset_loader::<asset_loader::AtlasLoader>()
            .add_systems(Update, animation::animate_atlas_sprites);
    }
}

/// `use espresso_atlas::prelude::*;` to import common components and plugins.
pub mod prelude {
    pub use crate::{
        animation::{AnimatedSprite, AnimatedSpriteBundle},
        atlas::TextureAtlas,
        TextureAtlasPlugin,
    };
}
