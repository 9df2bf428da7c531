//! The [`TextureAtlas`] asset: named regions and animations over a single texture.

use bevy::{
    asset::{Asset, Handle},
    log::{debug, warn},
    math::UVec2,
    reflect::TypePath,
    render::texture::Image,
    sprite::{Sprite, SpriteBundle},
    utils::HashMap,
};
use serde::{Deserialize, Serialize};

use crate::{
    animation::{AnimatedSprite, AnimatedSpriteBundle, Animation},
    description::AtlasDescription,
    error::AtlasError,
    region::TextureRegion,
};

/// What to do when a description registers a key that is already taken.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Abort with [`AtlasError::DuplicateKey`].
    #[default]
    Reject,
    /// Keep the entry registered last.
    Replace,
}

/// TextureAtlas Asset
///
/// Regions and animations are stored under their composite keys, `resource:group:name:frame`
/// and `resource:group:name` respectively.
#[derive(Debug, Clone, Asset, TypePath)]
pub struct TextureAtlas {
    /// Atlas Texture Image
    #[dependency]
    texture: Handle<Image>,
    texture_size: UVec2,
    regions: HashMap<String, TextureRegion>,
    animations: HashMap<String, Animation>,
}

impl TextureAtlas {
    /// Creates an empty atlas over `texture`, whose pixel size is `texture_size`.
    pub fn new(texture: Handle<Image>, texture_size: UVec2) -> Self {
        Self {
            texture,
            texture_size,
            regions: HashMap::default(),
            animations: HashMap::default(),
        }
    }

    /// Builds an atlas over `texture` holding everything `description` declares.
    pub fn from_description(
        description: &AtlasDescription,
        texture: Handle<Image>,
        texture_size: UVec2,
        policy: DuplicatePolicy,
    ) -> Result<Self, AtlasError> {
        let mut atlas = Self::new(texture, texture_size);
        atlas.extend_from_description(description, policy)?;
        Ok(atlas)
    }

    /// Registers the regions and animations of `description` on this atlas.
    ///
    /// Either every entry is registered or, on error, the atlas is left untouched. Frame
    /// tokens resolve against regions of the same description first, then against regions
    /// already in the atlas.
    pub fn extend_from_description(
        &mut self,
        description: &AtlasDescription,
        policy: DuplicatePolicy,
    ) -> Result<(), AtlasError> {
        let resource = description.resource.as_str();

        let mut regions: HashMap<String, TextureRegion> = HashMap::default();
        for descriptor in &description.regions {
            let key = descriptor.key(resource).to_string();
            let region = TextureRegion::new(
                self.texture.clone(),
                self.texture_size,
                descriptor.x,
                descriptor.y,
                descriptor.width,
                descriptor.height,
            )?;
            if self.regions.contains_key(&key) || regions.contains_key(&key) {
                check_duplicate(policy, "region", &key)?;
            }
            regions.insert(key, region);
        }

        let mut animations: HashMap<String, Animation> = HashMap::default();
        for descriptor in &description.animations {
            let animation_key = descriptor.key(resource);
            let frames = descriptor
                .frames
                .iter()
                .map(|token| {
                    let key = animation_key.frame(token).to_string();
                    regions
                        .get(&key)
                        .or_else(|| self.regions.get(&key))
                        .cloned()
                        .ok_or(AtlasError::NotFound(key))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let animation = Animation::new(frames, descriptor.delay)?;

            let key = animation_key.to_string();
            if self.animations.contains_key(&key) || animations.contains_key(&key) {
                check_duplicate(policy, "animation", &key)?;
            }
            animations.insert(key, animation);
        }

        debug!(
            "Registered {} regions and {} animations for resource '{}'",
            regions.len(),
            animations.len(),
            resource
        );
        self.regions.extend(regions);
        self.animations.extend(animations);

        Ok(())
    }

    /// Shared texture every region is cut from.
    pub fn texture(&self) -> &Handle<Image> {
        &self.texture
    }

    /// Pixel size of the texture.
    pub fn texture_size(&self) -> UVec2 {
        self.texture_size
    }

    /// Cuts a region out of the atlas texture and registers it under `name`.
    pub fn add_region(
        &mut self,
        name: impl Into<String>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<&TextureRegion, AtlasError> {
        let name = name.into();
        if self.regions.contains_key(&name) {
            return Err(AtlasError::DuplicateKey(name));
        }
        let region =
            TextureRegion::new(self.texture.clone(), self.texture_size, x, y, width, height)?;
        Ok(self.regions.entry(name).or_insert(region))
    }

    /// Region registered under `name`.
    pub fn get_region(&self, name: &str) -> Result<&TextureRegion, AtlasError> {
        self.regions
            .get(name)
            .ok_or_else(|| AtlasError::NotFound(name.to_owned()))
    }

    /// Unregisters a region. Animations keep the frames they were built with.
    pub fn remove_region(&mut self, name: &str) -> Option<TextureRegion> {
        self.regions.remove(name)
    }

    /// Unregisters every region and animation.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.animations.clear();
    }

    /// Registers `animation` under `name`.
    pub fn add_animation(
        &mut self,
        name: impl Into<String>,
        animation: Animation,
    ) -> Result<(), AtlasError> {
        let name = name.into();
        if self.animations.contains_key(&name) {
            return Err(AtlasError::DuplicateKey(name));
        }
        self.animations.insert(name, animation);
        Ok(())
    }

    /// Animation registered under `name`.
    pub fn get_animation(&self, name: &str) -> Result<&Animation, AtlasError> {
        self.animations
            .get(name)
            .ok_or_else(|| AtlasError::NotFound(name.to_owned()))
    }

    /// Unregisters an animation.
    pub fn remove_animation(&mut self, name: &str) -> Option<Animation> {
        self.animations.remove(name)
    }

    /// Keys of all registered regions, in no particular order.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Keys of all registered animations, in no particular order.
    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    /// Number of registered regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of registered animations.
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// A sprite drawing the region registered under `region_name`.
    pub fn create_sprite(&self, region_name: &str) -> Result<SpriteBundle, AtlasError> {
        let region = self.get_region(region_name)?;
        Ok(sprite_bundle(region))
    }

    /// A sprite playing the animation registered under `animation_name` from its first frame.
    ///
    /// `atlas` must be the handle of this atlas; the playback system looks the animation up
    /// through it every frame.
    pub fn create_animated_sprite(
        &self,
        atlas: Handle<TextureAtlas>,
        animation_name: &str,
    ) -> Result<AnimatedSpriteBundle, AtlasError> {
        let animation = self.get_animation(animation_name)?;
        let animated_sprite = AnimatedSprite::new(atlas, animation_name);
        let sprite = sprite_bundle(animated_sprite.playback.current_frame(animation));

        Ok(AnimatedSpriteBundle {
            sprite,
            animated_sprite,
        })
    }
}

fn sprite_bundle(region: &TextureRegion) -> SpriteBundle {
    let mut sprite = Sprite::default();
    region.apply_to(&mut sprite);

    SpriteBundle {
        sprite,
        texture: region.texture().clone(),
        ..Default::default()
    }
}

fn check_duplicate(policy: DuplicatePolicy, kind: &str, key: &str) -> Result<(), AtlasError> {
    match policy {
        DuplicatePolicy::Reject => Err(AtlasError::DuplicateKey(key.to_owned())),
        DuplicatePolicy::Replace => {
            warn!("Replacing {kind} '{key}'");
            Ok(())
        }
    }
}
