//! # animatable
//!
//! Samples one animated property from a clip document and prints the values.
//!
//! A clip is `{ "ip", "op", "fr", "property" }` where `property` holds the
//! loader's raw keyframe JSON for the chosen `--kind`.

use animatable_core::{
    import, Animatable, KeyframeAnimation, TextStyleAnimation, Timeline, TransformAnimation, Value,
};
use animatable_data::model::Clip;
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "animatable")]
#[command(about = "Sample animated property values from a keyframe clip")]
#[command(version)]
struct Cli {
    /// Path to the clip JSON
    #[arg(short, long)]
    input: PathBuf,

    /// How to read the clip's property
    #[arg(short, long, value_enum, default_value = "scalar")]
    kind: Kind,

    /// Number of evenly spaced samples across the timeline
    #[arg(short, long, default_value_t = 5)]
    samples: usize,

    /// Sample only this progress (0..1) instead
    #[arg(short, long)]
    progress: Option<f32>,

    /// Print samples as a JSON array
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Scalar,
    Integer,
    Color,
    Point,
    Scale,
    Path,
    Gradient,
    Transform,
    TextStyle,
}

enum Engine {
    Value(KeyframeAnimation),
    Transform(TransformAnimation),
    TextStyle(TextStyleAnimation),
}

#[derive(Serialize)]
struct SampleRow {
    progress: f32,
    frame: f32,
    value: serde_json::Value,
}

fn parse<T: serde::de::DeserializeOwned>(property: serde_json::Value, kind: Kind) -> Result<T> {
    serde_json::from_value(property).with_context(|| format!("property is not a valid {kind:?}"))
}

fn build_engine(kind: Kind, property: serde_json::Value, timeline: Timeline) -> Result<Engine> {
    let value = match kind {
        Kind::Scalar => import::scalar(&parse(property, kind)?)?,
        Kind::Integer => import::integer(&parse(property, kind)?)?,
        Kind::Color => import::color(&parse(property, kind)?)?,
        Kind::Point => import::point(&parse(property, kind)?)?,
        Kind::Scale => import::scale(&parse(property, kind)?)?,
        Kind::Path => import::path(&parse(property, kind)?)?,
        Kind::Gradient => import::gradient(&parse(property, kind)?)?,
        Kind::Transform => {
            let transform = import::transform(&parse(property, kind)?)?;
            return Ok(Engine::Transform(transform.create_animation(timeline)));
        }
        Kind::TextStyle => {
            let style = import::text_style(&parse(property, kind)?)?;
            return Ok(Engine::TextStyle(style.create_animation(timeline)));
        }
    };
    let Some(value) = value else {
        bail!("clip property has no value");
    };
    debug!(kind = ?value.kind(), is_static = value.is_static(), "property imported");
    Ok(Engine::Value(value.create_animation(timeline)))
}

impl Engine {
    fn sample(&mut self, progress: f32) -> Result<serde_json::Value> {
        Ok(match self {
            Engine::Value(anim) => value_json(&anim.evaluate(progress)?),
            Engine::Transform(anim) => {
                let s = anim.evaluate(progress)?;
                json!({
                    "anchor_point": [s.anchor_point.x, s.anchor_point.y],
                    "position": [s.position.x, s.position.y],
                    "scale": [s.scale.x, s.scale.y],
                    "rotation": s.rotation,
                    "opacity": s.opacity,
                    "skew": s.skew,
                    "skew_angle": s.skew_angle,
                    "start_opacity": s.start_opacity,
                    "end_opacity": s.end_opacity,
                })
            }
            Engine::TextStyle(anim) => {
                let s = anim.evaluate(progress)?;
                json!({
                    "color": s.color.map(|c| c.to_array()),
                    "stroke_color": s.stroke_color.map(|c| c.to_array()),
                    "stroke_width": s.stroke_width,
                    "tracking": s.tracking,
                })
            }
        })
    }
}

fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Scalar(v) => json!(v),
        Value::Integer(v) => json!(v),
        Value::Color(c) => json!(c.to_array()),
        Value::Point(p) | Value::Scale(p) => json!([p.x, p.y]),
        Value::Path(path) => json!({
            "closed": path.closed,
            "vertices": path.vertices.iter().map(|v| [v.x, v.y]).collect::<Vec<_>>(),
            "in_tangents": path.in_tangents.iter().map(|v| [v.x, v.y]).collect::<Vec<_>>(),
            "out_tangents": path.out_tangents.iter().map(|v| [v.x, v.y]).collect::<Vec<_>>(),
        }),
        Value::Gradient(gradient) => json!(gradient
            .stops
            .iter()
            .map(|s| json!({ "offset": s.offset, "color": s.color.to_array() }))
            .collect::<Vec<_>>()),
    }
}

fn sample_points(samples: usize, progress: Option<f32>) -> Result<Vec<f32>> {
    if let Some(p) = progress {
        if !(0.0..=1.0).contains(&p) {
            bail!("--progress must lie in 0..1, got {p}");
        }
        return Ok(vec![p]);
    }
    match samples {
        0 => bail!("--samples must be at least 1"),
        1 => Ok(vec![0.0]),
        n => Ok((0..n).map(|i| i as f32 / (n - 1) as f32).collect()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("animatable=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let clip: Clip = serde_json::from_str(&text)
        .with_context(|| format!("parsing clip {}", cli.input.display()))?;
    let timeline = Timeline::from(&clip);
    info!(
        name = clip.nm.as_deref().unwrap_or("<unnamed>"),
        start = timeline.start_frame,
        end = timeline.end_frame,
        "loaded clip"
    );

    let mut engine = build_engine(cli.kind, clip.property, timeline)?;
    let rows = sample_points(cli.samples, cli.progress)?
        .into_iter()
        .map(|progress| {
            Ok(SampleRow {
                progress,
                frame: timeline.frame_at(progress),
                value: engine.sample(progress)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{:>6.3}  frame {:>8.2}  {}", row.progress, row.frame, row.value);
        }
    }
    Ok(())
}
