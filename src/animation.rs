//! Frame animations and their time-driven playback.
//!
//! An [`Animation`] is immutable data owned by a [`TextureAtlas`]. Playback state lives
//! separately in an [`AnimationPlayback`], which borrows the animation on every call
//! instead of owning it, so any number of sprites can play the same animation.

use std::time::Duration;

use bevy::{
    asset::{Assets, Handle},
    ecs::{
        bundle::Bundle,
        component::Component,
        system::{Query, Res},
    },
    log::debug,
    render::texture::Image,
    sprite::{Sprite, SpriteBundle},
    time::Time,
};

use crate::{atlas::TextureAtlas, error::AtlasError, region::TextureRegion};

/// An ordered sequence of regions shown one after another, each for the same delay.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<TextureRegion>,
    frame_delay: Duration,
}

impl Animation {
    /// Creates an animation. Fails with [`AtlasError::EmptyAnimation`] if `frames` is empty.
    pub fn new(frames: Vec<TextureRegion>, frame_delay: Duration) -> Result<Self, AtlasError> {
        if frames.is_empty() {
            return Err(AtlasError::EmptyAnimation);
        }

        Ok(Self {
            frames,
            frame_delay,
        })
    }

    /// Number of frames, always at least one.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Time every frame stays on screen.
    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Result<&TextureRegion, AtlasError> {
        self.frames.get(index).ok_or(AtlasError::FrameOutOfRange {
            index,
            frame_count: self.frames.len(),
        })
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[TextureRegion] {
        &self.frames
    }

    /// Length of one full loop.
    pub fn duration(&self) -> Duration {
        self.frame_delay * self.frames.len() as u32
    }
}

/// Looping playback cursor over an [`Animation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationPlayback {
    frame_index: usize,
    elapsed: Duration,
}

impl AnimationPlayback {
    /// Playback positioned at the start of the first frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the frame currently shown.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Time spent on the current frame so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Rewinds to the start of the first frame.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Moves playback forward by `delta`, wrapping around after the last frame.
    ///
    /// A delta spanning several frame delays advances several frames at once and keeps the
    /// remainder. An animation with a zero delay stays on its current frame.
    pub fn advance(&mut self, animation: &Animation, delta: Duration) {
        let delay = animation.frame_delay().as_nanos();
        if delay == 0 {
            return;
        }

        let elapsed = (self.elapsed + delta).as_nanos();
        let frame_count = animation.frame_count() as u128;
        let steps = elapsed / delay;

        self.frame_index = ((self.frame_index as u128 + steps) % frame_count) as usize;
        self.elapsed = Duration::from_nanos((elapsed % delay) as u64);
    }

    /// Region of the frame currently shown.
    pub fn current_frame<'a>(&self, animation: &'a Animation) -> &'a TextureRegion {
        &animation.frames[self.frame_index % animation.frame_count()]
    }
}

/// Binds an entity's sprite to a named animation of a [`TextureAtlas`] asset.
#[derive(Component, Debug, Clone)]
pub struct AnimatedSprite {
    /// Atlas owning the animation.
    pub atlas: Handle<TextureAtlas>,
    /// Composite key of the animation inside the atlas.
    pub animation: String,
    /// Playback cursor.
    pub playback: AnimationPlayback,
}

impl AnimatedSprite {
    /// Starts `animation` of `atlas` from its first frame.
    pub fn new(atlas: Handle<TextureAtlas>, animation: impl Into<String>) -> Self {
        Self {
            atlas,
            animation: animation.into(),
            playback: AnimationPlayback::new(),
        }
    }

    /// Switches to another animation of the same atlas, restarting playback.
    ///
    /// Does nothing if `animation` is already playing.
    pub fn play(&mut self, animation: &str) {
        if self.animation != animation {
            self.animation = animation.to_owned();
            self.playback.reset();
        }
    }
}

/// A sprite showing the current frame of an [`AnimatedSprite`].
#[derive(Bundle, Clone, Default)]
pub struct AnimatedSpriteBundle {
    /// Sprite, texture, transform and visibility.
    pub sprite: SpriteBundle,
    /// Animation state driving `sprite`.
    pub animated_sprite: AnimatedSprite,
}

impl Default for AnimatedSprite {
    fn default() -> Self {
        Self::new(Handle::default(), String::new())
    }
}

/// Advances every [`AnimatedSprite`] by the frame time and points its sprite at the
/// current region.
///
/// Sprites whose atlas is not loaded yet are left untouched.
pub fn animate_atlas_sprites(
    time: Res<Time>,
    atlases: Res<Assets<TextureAtlas>>,
    mut query: Query<(&mut AnimatedSprite, &mut Sprite, &mut Handle<Image>)>,
) {
    let delta = time.delta();

    for (mut animated_sprite, mut sprite, mut texture) in &mut query {
        let Some(atlas) = atlases.get(&animated_sprite.atlas) else {
            continue;
        };
        let animated_sprite = &mut *animated_sprite;
        let animation = match atlas.get_animation(&animated_sprite.animation) {
            Ok(animation) => animation,
            Err(err) => {
                debug!("Skipping animated sprite: {err}");
                continue;
            }
        };

        animated_sprite.playback.advance(animation, delta);
        let region = animated_sprite.playback.current_frame(animation);

        let rect = Some(region.rect());
        if sprite.rect != rect {
            sprite.rect = rect;
        }
        if *texture != *region.texture() {
            *texture = region.texture().clone();
        }
    }
}
