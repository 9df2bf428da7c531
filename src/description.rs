//! This module defines the XML atlas description and its validation.
//!
//! The document is deserialized into raw, all-optional fields first. Validation then
//! turns missing fields and malformed numbers into [`AtlasError`]s, so a description that
//! made it through [`AtlasDescription::parse`] only needs its frame references resolved.

use std::{fmt, time::Duration};

use serde::Deserialize;

use crate::error::AtlasError;

#[derive(Debug, Deserialize)]
struct RawAtlas {
    #[serde(rename = "Resource", default)]
    resource: Option<String>,
    #[serde(rename = "Texture", default)]
    texture: Option<String>,
    #[serde(rename = "Regions", default)]
    regions: Option<RawRegions>,
    #[serde(rename = "Animations", default)]
    animations: Option<RawAnimations>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRegions {
    #[serde(rename = "Region", default)]
    regions: Vec<RawRegion>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAnimations {
    #[serde(rename = "Animation", default)]
    animations: Vec<RawAnimation>,
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@group", default)]
    group: Option<String>,
    #[serde(rename = "@frame", default)]
    frame: Option<String>,
    #[serde(rename = "@x", default)]
    x: Option<String>,
    #[serde(rename = "@y", default)]
    y: Option<String>,
    #[serde(rename = "@width", default)]
    width: Option<String>,
    #[serde(rename = "@height", default)]
    height: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnimation {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@group", default)]
    group: Option<String>,
    #[serde(rename = "@frames", default)]
    frames: Option<String>,
    #[serde(rename = "@delay", default)]
    delay: Option<String>,
}

/// A validated atlas description.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasDescription {
    /// Namespace prefixed onto every region and animation key.
    pub resource: String,
    /// Path of the texture, resolved by the content loader.
    pub texture: String,
    /// Regions in document order.
    pub regions: Vec<RegionDescriptor>,
    /// Animations in document order.
    pub animations: Vec<AnimationDescriptor>,
}

/// A `<Region>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// `name` attribute.
    pub name: String,
    /// `group` attribute.
    pub group: String,
    /// `frame` attribute.
    pub frame: String,
    /// `x` attribute, 0 if absent.
    pub x: u32,
    /// `y` attribute, 0 if absent.
    pub y: u32,
    /// `width` attribute, 0 if absent.
    pub width: u32,
    /// `height` attribute, 0 if absent.
    pub height: u32,
}

/// An `<Animation>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationDescriptor {
    /// `name` attribute.
    pub name: String,
    /// `group` attribute.
    pub group: String,
    /// Frame tokens of the `frames` expression, in order.
    pub frames: Vec<String>,
    /// `delay` attribute, 0 if absent.
    pub delay: Duration,
}

impl AtlasDescription {
    /// Parses and validates an XML description.
    pub fn parse(xml: &str) -> Result<Self, AtlasError> {
        Self::validate(quick_xml::de::from_str(xml)?)
    }

    /// Parses and validates an XML description from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AtlasError> {
        Self::validate(quick_xml::de::from_reader(bytes)?)
    }

    fn validate(raw: RawAtlas) -> Result<Self, AtlasError> {
        let resource = required("Atlas", "Resource", raw.resource)?;
        let texture = required("Atlas", "Texture", raw.texture)?;
        let regions = raw
            .regions
            .ok_or(AtlasError::MissingSection("Regions"))?
            .regions
            .into_iter()
            .map(RegionDescriptor::validate)
            .collect::<Result<Vec<_>, _>>()?;
        let animations = raw
            .animations
            .ok_or(AtlasError::MissingSection("Animations"))?
            .animations
            .into_iter()
            .map(AnimationDescriptor::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            resource,
            texture,
            regions,
            animations,
        })
    }
}

impl RegionDescriptor {
    fn validate(raw: RawRegion) -> Result<Self, AtlasError> {
        Ok(Self {
            name: required("Region", "name", raw.name)?,
            group: required("Region", "group", raw.group)?,
            frame: required("Region", "frame", raw.frame)?,
            x: parse_u32("x", raw.x)?,
            y: parse_u32("y", raw.y)?,
            width: parse_u32("width", raw.width)?,
            height: parse_u32("height", raw.height)?,
        })
    }

    /// Composite key of this region inside `resource`.
    pub fn key<'a>(&'a self, resource: &'a str) -> RegionKey<'a> {
        RegionKey {
            resource,
            group: &self.group,
            name: &self.name,
            frame: &self.frame,
        }
    }
}

impl AnimationDescriptor {
    fn validate(raw: RawAnimation) -> Result<Self, AtlasError> {
        let name = required("Animation", "name", raw.name)?;
        let group = required("Animation", "group", raw.group)?;
        let frames = parse_frames(&required("Animation", "frames", raw.frames)?)?;
        let delay = parse_delay(raw.delay)?;

        Ok(Self {
            name,
            group,
            frames,
            delay,
        })
    }

    /// Composite key of this animation inside `resource`.
    pub fn key<'a>(&'a self, resource: &'a str) -> AnimationKey<'a> {
        AnimationKey {
            resource,
            group: &self.group,
            name: &self.name,
        }
    }
}

/// `resource:group:name:frame` key of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionKey<'a> {
    /// Resource namespace.
    pub resource: &'a str,
    /// Group component.
    pub group: &'a str,
    /// Name component.
    pub name: &'a str,
    /// Frame component.
    pub frame: &'a str,
}

/// `resource:group:name` key of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationKey<'a> {
    /// Resource namespace.
    pub resource: &'a str,
    /// Group component.
    pub group: &'a str,
    /// Name component.
    pub name: &'a str,
}

impl<'a> AnimationKey<'a> {
    /// Key of the region a frame token of this animation refers to.
    pub fn frame(&self, frame: &'a str) -> RegionKey<'a> {
        RegionKey {
            resource: self.resource,
            group: self.group,
            name: self.name,
            frame,
        }
    }
}

impl fmt::Display for RegionKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.resource, self.group)?;
        write!(f, "{}:{}", self.name, self.frame)
    }
}

impl fmt::Display for AnimationKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.resource, self.group, self.name)
    }
}

/// Separator between frame tokens in an animation's `frames` attribute.
pub const FRAME_SEPARATOR: char = '-';

/// Splits a frame-range expression such as `0-1-2` into its tokens.
///
/// Fails with [`AtlasError::MalformedExpression`] if the expression has no tokens or
/// contains an empty one.
pub fn parse_frames(expression: &str) -> Result<Vec<String>, AtlasError> {
    let malformed = || AtlasError::MalformedExpression(expression.to_owned());

    if expression.trim().is_empty() {
        return Err(malformed());
    }

    expression
        .split(FRAME_SEPARATOR)
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                Err(malformed())
            } else {
                Ok(token.to_owned())
            }
        })
        .collect()
}

fn required(
    element: &'static str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, AtlasError> {
    value.ok_or(AtlasError::MissingField { element, field })
}

fn parse_u32(field: &'static str, value: Option<String>) -> Result<u32, AtlasError> {
    match value {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AtlasError::ParseError { field, value }),
    }
}

fn parse_delay(value: Option<String>) -> Result<Duration, AtlasError> {
    let Some(value) = value else {
        return Ok(Duration::ZERO);
    };

    value
        .trim()
        .parse::<f64>()
        .ok()
        .map(|millis| (millis * 1_000_000.0).round())
        .filter(|nanos| (0.0..=u64::MAX as f64).contains(nanos))
        .map(|nanos| Duration::from_nanos(nanos as u64))
        .ok_or(AtlasError::ParseError {
            field: "delay",
            value,
        })
}
