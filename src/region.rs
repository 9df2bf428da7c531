//! Rectangular views into an atlas texture.

use bevy::{
    asset::Handle,
    math::{Rect, UVec2, Vec2},
    render::texture::Image,
    sprite::Sprite,
};

use crate::error::AtlasError;

/// An immutable axis-aligned rectangle inside a texture.
///
/// The texture is shared: every region of an atlas holds a clone of the same [`Handle`],
/// never a copy of the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRegion {
    texture: Handle<Image>,
    position: UVec2,
    size: UVec2,
}

impl TextureRegion {
    /// Creates a region of `texture`, validated against `texture_size`.
    ///
    /// Fails with [`AtlasError::InvalidRegion`] for a zero width or height and with
    /// [`AtlasError::RegionOutOfBounds`] if the rectangle leaves the texture.
    pub fn new(
        texture: Handle<Image>,
        texture_size: UVec2,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, AtlasError> {
        let position = UVec2::new(x, y);
        let size = UVec2::new(width, height);

        if width == 0 || height == 0 {
            return Err(AtlasError::InvalidRegion(size));
        }

        let right = u64::from(x) + u64::from(width);
        let bottom = u64::from(y) + u64::from(height);
        if right > u64::from(texture_size.x) || bottom > u64::from(texture_size.y) {
            return Err(AtlasError::RegionOutOfBounds {
                position,
                size,
                texture_size,
            });
        }

        Ok(Self {
            texture,
            position,
            size,
        })
    }

    /// Texture this region is cut from.
    pub fn texture(&self) -> &Handle<Image> {
        &self.texture
    }

    /// Left edge in pixels.
    pub fn x(&self) -> u32 {
        self.position.x
    }

    /// Top edge in pixels.
    pub fn y(&self) -> u32 {
        self.position.y
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.x
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.y
    }

    /// Top-left corner in pixels.
    pub fn position(&self) -> UVec2 {
        self.position
    }

    /// Size in pixels.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Pixel rectangle of this region, as the sprite renderer expects it.
    pub fn rect(&self) -> Rect {
        let min = Vec2::new(self.position.x as f32, self.position.y as f32);
        let max = min + Vec2::new(self.size.x as f32, self.size.y as f32);
        Rect { min, max }
    }

    /// Makes `sprite` draw this region of the texture.
    pub fn apply_to(&self, sprite: &mut Sprite) {
        sprite.rect = Some(self.rect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTURE_SIZE: UVec2 = UVec2::new(64, 32);

    fn region(x: u32, y: u32, width: u32, height: u32) -> Result<TextureRegion, AtlasError> {
        TextureRegion::new(Handle::default(), TEXTURE_SIZE, x, y, width, height)
    }

    #[test]
    fn accessors_report_constructor_values() {
        let region = region(16, 8, 24, 12).unwrap();

        assert_eq!(region.x(), 16);
        assert_eq!(region.y(), 8);
        assert_eq!(region.width(), 24);
        assert_eq!(region.height(), 12);
        assert_eq!(region.position(), UVec2::new(16, 8));
        assert_eq!(region.size(), UVec2::new(24, 12));
        assert_eq!(region.texture(), &Handle::default());
    }

    #[test]
    fn rect_spans_position_to_position_plus_size() {
        let rect = region(16, 8, 24, 12).unwrap().rect();

        assert_eq!(rect.min, Vec2::new(16.0, 8.0));
        assert_eq!(rect.max, Vec2::new(40.0, 20.0));
    }

    #[test]
    fn region_touching_the_texture_edge_is_valid() {
        assert!(region(32, 16, 32, 16).is_ok());
    }

    #[test]
    fn region_past_the_texture_edge_is_rejected() {
        assert!(matches!(
            region(40, 0, 32, 16),
            Err(AtlasError::RegionOutOfBounds { .. })
        ));
        assert!(matches!(
            region(0, u32::MAX, 1, 1),
            Err(AtlasError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn empty_region_is_rejected() {
        assert!(matches!(
            region(0, 0, 0, 16),
            Err(AtlasError::InvalidRegion(_))
        ));
        assert!(matches!(
            region(0, 0, 16, 0),
            Err(AtlasError::InvalidRegion(_))
        ));
    }

    #[test]
    fn apply_to_sets_sprite_rect() {
        let region = region(0, 16, 16, 16).unwrap();
        let mut sprite = Sprite::default();

        region.apply_to(&mut sprite);

        assert_eq!(sprite.rect, Some(region.rect()));
    }
}
