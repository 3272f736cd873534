//! Addressing overrides to properties deep inside an element tree.

use crate::animation::OverrideTarget;
use crate::overrides::ValueOverride;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The properties an override can be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    TransformAnchorPoint,
    TransformPosition,
    TransformPositionX,
    TransformPositionY,
    TransformScale,
    TransformRotation,
    TransformOpacity,
    TransformSkew,
    TransformSkewAngle,
    TransformStartOpacity,
    TransformEndOpacity,
    Color,
    StrokeColor,
    StrokeWidth,
    Tracking,
    Opacity,
    Gradient,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Name(String),
    /// `*`: exactly one element.
    Wildcard,
    /// `**`: any number of elements, including none.
    Globstar,
}

/// Dot-separated element names, e.g. `"Layer 1.**.Fill"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => Segment::Wildcard,
                "**" => Segment::Globstar,
                name => Segment::Name(name.to_string()),
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this pattern addresses the element at `element_path`.
    pub fn matches(&self, element_path: &[&str]) -> bool {
        matches_from(&self.segments, element_path)
    }
}

fn matches_from(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Globstar, rest)) => {
            (0..=path.len()).any(|skip| matches_from(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            None => false,
            Some((name, path_rest)) => {
                let hit = match segment {
                    Segment::Name(expected) => expected == name,
                    _ => true,
                };
                hit && matches_from(rest, path_rest)
            }
        },
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Name(name) => f.write_str(name)?,
                Segment::Wildcard => f.write_str("*")?,
                Segment::Globstar => f.write_str("**")?,
            }
        }
        Ok(())
    }
}

/// Overrides waiting to be attached to the engines they address.
///
/// Each override is moved into at most one engine.
#[derive(Debug, Default)]
pub struct OverrideRegistry {
    entries: Vec<(KeyPath, PropertyId, ValueOverride)>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an override, replacing one registered for the same path and
    /// property.
    pub fn set_override(
        &mut self,
        path: impl Into<KeyPath>,
        property: PropertyId,
        value_override: ValueOverride,
    ) {
        let path = path.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(p, prop, _)| *p == path && *prop == property)
        {
            entry.2 = value_override;
        } else {
            self.entries.push((path, property, value_override));
        }
    }

    /// Moves the first override matching `element_path` and `property` into
    /// `target`. Returns whether one was attached.
    pub fn attach<T>(&mut self, element_path: &[&str], property: PropertyId, target: &mut T) -> bool
    where
        T: OverrideTarget + ?Sized,
    {
        let Some(index) = self
            .entries
            .iter()
            .position(|(path, prop, _)| *prop == property && path.matches(element_path))
        else {
            return false;
        };
        let (path, _, value_override) = self.entries.remove(index);
        debug!(%path, ?property, "attaching override");
        target.set_override(value_override);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
