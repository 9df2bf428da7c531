//! Errors produced while describing, building and querying a
//! [`TextureAtlas`](crate::atlas::TextureAtlas).

use bevy::math::UVec2;
use thiserror::Error;

/// Possible errors of the atlas core.
///
/// Every error raised while building an atlas from a description aborts the whole build;
/// there is no partially populated atlas.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The document could not be read as XML.
    #[error("Could not parse XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),
    /// A required top-level section (`Regions` or `Animations`) is absent.
    #[error("Missing required section <{0}>")]
    MissingSection(&'static str),
    /// A required element or attribute is absent.
    #[error("Missing required field '{field}' on <{element}>")]
    MissingField {
        /// Element the field belongs to.
        element: &'static str,
        /// Name of the missing element or attribute.
        field: &'static str,
    },
    /// Numeric text that could not be parsed.
    #[error("Could not parse '{value}' as the value of '{field}'")]
    ParseError {
        /// Name of the offending attribute.
        field: &'static str,
        /// Raw text found in the document.
        value: String,
    },
    /// A region or animation with this key is already registered.
    #[error("Key '{0}' is already registered")]
    DuplicateKey(String),
    /// No region or animation is registered under this key.
    #[error("Nothing registered under '{0}'")]
    NotFound(String),
    /// A frame-range expression that does not resolve to a list of tokens.
    #[error("Malformed frame expression '{0}'")]
    MalformedExpression(String),
    /// An animation was constructed without frames.
    #[error("Animation has no frames")]
    EmptyAnimation,
    /// A frame lookup past the end of an animation.
    #[error("Frame {index} is out of range for an animation of {frame_count} frames")]
    FrameOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of frames in the animation.
        frame_count: usize,
    },
    /// A region with zero width or height.
    #[error("Region with size {0} is empty")]
    InvalidRegion(UVec2),
    /// A region reaching past the edge of its texture.
    #[error("Region at {position} with size {size} exceeds texture size {texture_size}")]
    RegionOutOfBounds {
        /// Top-left corner of the region.
        position: UVec2,
        /// Size of the region.
        size: UVec2,
        /// Size of the source texture.
        texture_size: UVec2,
    },
}
