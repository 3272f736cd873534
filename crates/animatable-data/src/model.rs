use serde::de::{self, DeserializeOwned, SeqAccess};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A standalone clip: one property plus the timeline it plays on.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Clip {
    #[serde(default)]
    pub nm: Option<String>,
    pub ip: f32,
    pub op: f32,
    #[serde(default = "default_frame_rate")]
    pub fr: f32,
    /// Raw property payload; its value type depends on what is animated.
    pub property: serde_json::Value,
}

fn default_frame_rate() -> f32 {
    60.0
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Property<T> {
    #[serde(default)]
    pub a: u8,
    #[serde(default)]
    #[serde(bound(deserialize = "T: DeserializeOwned"))]
    pub k: Value<T>,
    #[serde(default)]
    pub ix: Option<u32>,
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Property {
            a: 0,
            k: Value::Default,
            ix: None,
        }
    }
}

impl<T> Property<T> {
    pub fn fixed(value: T) -> Self {
        Property {
            a: 0,
            k: Value::Static(value),
            ix: None,
        }
    }

    pub fn animated(keyframes: Vec<Keyframe<T>>) -> Self {
        Property {
            a: 1,
            k: Value::Animated(keyframes),
            ix: None,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub enum Value<T> {
    Default,
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

/// A keyframe list is an array of objects carrying a `t` field.
fn is_keyframe_list(v: &serde_json::Value) -> bool {
    v.as_array()
        .and_then(|items| items.first())
        .is_some_and(|first| first.get("t").is_some())
}

/// Reads `v` as a single `T`, unwrapping a one-element array when `T` itself
/// does not fit.
fn single_value<T: DeserializeOwned>(v: serde_json::Value) -> Option<T> {
    match serde_json::from_value::<T>(v.clone()) {
        Ok(val) => Some(val),
        Err(_) => serde_json::from_value::<Vec<T>>(v)
            .ok()
            .and_then(|items| items.into_iter().next()),
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        if v.is_null() {
            return Ok(Value::Default);
        }

        if is_keyframe_list(&v) {
            return serde_json::from_value::<Vec<Keyframe<T>>>(v)
                .map(Value::Animated)
                .map_err(|e| de::Error::custom(format!("malformed keyframe list: {e}")));
        }

        single_value(v).map(Value::Static).ok_or_else(|| {
            de::Error::custom("property value is neither a keyframe list nor a static value")
        })
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Default
    }
}

/// One raw keyframe as produced by the loader. Its segment ends where the
/// next keyframe in the list starts.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Keyframe<T> {
    pub t: f32,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    pub s: Option<T>,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    pub e: Option<T>,
    #[serde(default)]
    pub i: Option<BezierTangent>,
    #[serde(default)]
    pub o: Option<BezierTangent>,
    #[serde(default)]
    pub to: Option<Vec<f32>>,
    #[serde(default)]
    pub ti: Option<Vec<f32>>,
    #[serde(default)]
    pub h: Option<u8>,
}

impl<T> Keyframe<T> {
    /// Linear keyframe starting at `t` with value `s`.
    pub fn at(t: f32, s: T) -> Self {
        Keyframe {
            t,
            s: Some(s),
            e: None,
            i: None,
            o: None,
            to: None,
            ti: None,
            h: None,
        }
    }

    /// Value-less keyframe that only marks where the previous segment ends.
    pub fn closing(t: f32) -> Self {
        Keyframe {
            t,
            s: None,
            e: None,
            i: None,
            o: None,
            to: None,
            ti: None,
            h: None,
        }
    }

    pub fn is_hold(&self) -> bool {
        self.h == Some(1)
    }
}

fn deserialize_keyframe_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    if v.is_null() {
        return Ok(None);
    }
    Ok(single_value(v))
}

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];

/// Bezier tangent control points for keyframe easing
/// Matches the JSON format: {"x": [0.48], "y": [1]}
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BezierTangent {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl BezierTangent {
    pub fn new(x: f32, y: f32) -> Self {
        BezierTangent {
            x: vec![x],
            y: vec![y],
        }
    }
}

// Wrapper for Vec3 with Z defaulting to 0.0
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Vec3DefaultZero(pub Vec3);

impl Default for Vec3DefaultZero {
    fn default() -> Self {
        Vec3DefaultZero([0.0, 0.0, 0.0])
    }
}

impl<'de> Deserialize<'de> for Vec3DefaultZero {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_seq(PaddedSeqVisitor::<3> {
                fill: [0.0, 0.0, 0.0],
            })
            .map(Vec3DefaultZero)
    }
}

// Wrapper for Vec3 with Z defaulting to 100.0 (for Scale)
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Vec3Scale(pub Vec3);

impl Default for Vec3Scale {
    fn default() -> Self {
        Vec3Scale([100.0, 100.0, 100.0])
    }
}

impl<'de> Deserialize<'de> for Vec3Scale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_seq(PaddedSeqVisitor::<3> {
                fill: [0.0, 0.0, 100.0],
            })
            .map(Vec3Scale)
    }
}

/// RGBA color in `0..=1`; three-component colors are opaque.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ColorRgba(pub Vec4);

impl Default for ColorRgba {
    fn default() -> Self {
        ColorRgba([0.0, 0.0, 0.0, 1.0])
    }
}

impl<'de> Deserialize<'de> for ColorRgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_seq(PaddedSeqVisitor::<4> {
                fill: [0.0, 0.0, 0.0, 1.0],
            })
            .map(ColorRgba)
    }
}

/// Reads up to `N` floats, taking missing trailing components from `fill`
/// and discarding any extra ones.
struct PaddedSeqVisitor<const N: usize> {
    fill: [f32; N],
}

impl<'de, const N: usize> serde::de::Visitor<'de> for PaddedSeqVisitor<N> {
    type Value = [f32; N];

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a sequence of at most {} floats", N)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut out = self.fill;
        for slot in out.iter_mut() {
            match seq.next_element::<f32>()? {
                Some(v) => *slot = v,
                None => return Ok(out),
            }
        }
        while seq.next_element::<f32>()?.is_some() {}
        Ok(out)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    #[serde(default)]
    pub i: Vec<Vec2>,
    #[serde(default)]
    pub o: Vec<Vec2>,
    #[serde(default)]
    pub v: Vec<Vec2>,
}

/// Gradient colors in the flat layout: `p` color stops of
/// `[offset, r, g, b]`, optionally followed by `[offset, alpha]` pairs.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GradientColors {
    pub p: u32,
    pub k: Property<Vec<f32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Transform {
    #[serde(default)]
    pub a: Property<Vec3DefaultZero>, // Anchor
    #[serde(default)]
    pub p: PositionProperty,
    #[serde(default)]
    pub s: Property<Vec3Scale>, // Scale in percent
    #[serde(default, alias = "rz")]
    pub r: Property<f32>, // Rotation in degrees
    #[serde(default)]
    pub o: Property<f32>, // Opacity 0..100
    #[serde(default)]
    pub sk: Property<f32>, // Skew amount in degrees
    #[serde(default)]
    pub sa: Property<f32>, // Skew axis in degrees (0 = X axis, 90 = Y axis)
    #[serde(default)]
    pub so: Property<f32>, // Repeater start opacity
    #[serde(default)]
    pub eo: Property<f32>, // Repeater end opacity
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum PositionProperty {
    Split {
        x: Property<f32>,
        y: Property<f32>,
    },
    Unified(Property<Vec3DefaultZero>),
}

impl Default for PositionProperty {
    fn default() -> Self {
        PositionProperty::Unified(Property::default())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TextStyleData {
    #[serde(default)]
    pub fc: Option<Property<ColorRgba>>, // Fill color
    #[serde(default)]
    pub sc: Option<Property<ColorRgba>>, // Stroke color
    #[serde(default)]
    pub sw: Option<Property<f32>>, // Stroke width
    #[serde(default)]
    pub t: Option<Property<f32>>, // Tracking
}
