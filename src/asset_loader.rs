//! This module handles loading a [`TextureAtlas`] from an XML atlas description.
//!
//! Assets with the `atlas.xml` or `atlas` extension can be loaded just like any other asset
//! via the [`AssetServer`](::bevy::asset::AssetServer) and will yield a [`TextureAtlas`]
//! [`Handle`](::bevy::asset::Handle). The texture named by the description is loaded
//! through the same asset server and stored as the `texture` labeled sub-asset.

use std::path::Path;

use bevy::{
    asset::{io::Reader, AssetLoader, AssetPath, AsyncReadExt, LoadContext, LoadDirectError},
    log::info,
    render::texture::Image,
    utils::BoxedFuture,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    atlas::{DuplicatePolicy, TextureAtlas},
    description::AtlasDescription,
    error::AtlasError,
};

/// Loader for XML atlas descriptions. Loads a [`TextureAtlas`] asset.
#[derive(Default)]
pub struct AtlasLoader;

/// Settings of [`AtlasLoader`], configurable per asset through `.meta` files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasLoaderSettings {
    /// How to treat a composite key declared twice.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Possible errors that can be produced by [`AtlasLoader`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AtlasLoaderError {
    /// An [IOError](std::io::Error).
    #[error("Could not load file: {0}")]
    IoError(#[from] std::io::Error),
    /// An invalid description or atlas.
    #[error("Invalid atlas: {0}")]
    AtlasError(#[from] AtlasError),
    /// A [`LoadDirectError`].
    #[error("Could not load: {0}")]
    LoadDirectError(#[from] LoadDirectError),
    /// A NotAnImageError.
    #[error("Loading from {0} does not provide Image")]
    NotAnImageError(String),
}

/// File extensions for XML atlas descriptions.
pub const FILE_EXTENSIONS: &[&str] = &["atlas.xml", "atlas"];

impl AssetLoader for AtlasLoader {
    type Asset = TextureAtlas;
    type Settings = AtlasLoaderSettings;
    type Error = AtlasLoaderError;

    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        settings: &'a AtlasLoaderSettings,
        load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let description = AtlasDescription::from_bytes(&bytes)?;

            /* Load the texture */
            let texture_path = AssetPath::from_path(Path::new(&description.texture));
            let image = load_context.load_direct(texture_path).await?;
            let image = image
                .take::<Image>()
                .ok_or_else(|| AtlasLoaderError::NotAnImageError(description.texture.clone()))?;
            let texture_size = image.size();
            let texture = load_context.add_loaded_labeled_asset("texture", image.into());

            let atlas = TextureAtlas::from_description(
                &description,
                texture,
                texture_size,
                settings.duplicate_policy,
            )?;

            info!(
                "Loaded atlas {} with {} regions and {} animations",
                load_context.path().display(),
                atlas.region_count(),
                atlas.animation_count()
            );

            Ok(atlas)
        })
    }

    fn extensions(&self) -> &[&str] {
        FILE_EXTENSIONS
    }
}
