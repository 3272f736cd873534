//! End-to-end checks: raw loader JSON in, evaluated values out.
//!
//! Run with: cargo test -p animatable-core --test property_audit

use animatable_core::{
    import, AnimError, Animatable, AnimatableValue, GradientColor, Keyframe, OverrideRegistry,
    OverrideTarget, PropertyId, ShapePath, Timeline, Value, ValueOverride,
};
use animatable_data::model::{Clip, GradientColors, Property, TextStyleData, Transform};
use glam::{Vec2, Vec4};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

const EPS: f32 = 1e-4;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("animatable_core=debug")
        .with_test_writer()
        .try_init();
}

/// Parses a clip document and splits it into its timeline and raw property.
fn clip<T: serde::de::DeserializeOwned>(json: serde_json::Value) -> (Timeline, T) {
    let clip: Clip = serde_json::from_value(json).expect("Failed to parse test clip");
    let timeline = Timeline::from(&clip);
    let property = serde_json::from_value(clip.property).expect("Failed to parse property");
    (timeline, property)
}

fn scalar_clip() -> (Timeline, Property<f32>) {
    clip(json!({
        "ip": 0, "op": 10, "fr": 30,
        "property": { "a": 1, "k": [
            { "t": 0, "s": [0], "e": [10] },
            { "t": 10 }
        ]}
    }))
}

mod progress {
    use super::*;

    #[test]
    fn test_scalar_before_inside_and_after_range() {
        let (timeline, prop) = scalar_clip();
        let value = import::scalar(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);

        assert_eq!(anim.value_at_frame(5.0).unwrap(), Value::Scalar(5.0));
        assert_eq!(anim.value_at_frame(-3.0).unwrap(), Value::Scalar(0.0));
        assert_eq!(anim.value_at_frame(20.0).unwrap(), Value::Scalar(10.0));
        assert_eq!(anim.evaluate(0.5).unwrap(), Value::Scalar(5.0));
    }

    #[test]
    fn test_color_midpoint_is_gray() {
        let (timeline, prop) = clip(json!({
            "ip": 0, "op": 10,
            "property": { "a": 1, "k": [
                { "t": 0, "s": [0, 0, 0, 1] },
                { "t": 10, "s": [1, 1, 1, 1] }
            ]}
        }));
        let value = import::color(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);
        let gray = anim.value_at_frame(5.0).unwrap().as_color().unwrap();
        assert!(gray.abs_diff_eq(Vec4::new(0.5, 0.5, 0.5, 1.0), EPS));
    }

    #[test]
    fn test_hold_steps_at_segment_end() {
        init_tracing();
        let (timeline, prop) = clip::<Property<f32>>(json!({
            "ip": 0, "op": 30,
            "property": { "a": 1, "k": [
                { "t": 0, "s": [1], "h": 1 },
                { "t": 10, "s": [7] },
                { "t": 20, "s": [9] }
            ]}
        }));
        let value = import::integer(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);

        assert_eq!(anim.value_at_frame(0.0).unwrap(), Value::Integer(1));
        assert_eq!(anim.value_at_frame(9.5).unwrap(), Value::Integer(1));
        assert_eq!(anim.value_at_frame(10.0).unwrap(), Value::Integer(7));
        assert_eq!(anim.value_at_frame(15.0).unwrap(), Value::Integer(8));
        assert_eq!(anim.value_at_frame(25.0).unwrap(), Value::Integer(9));
    }

    #[test]
    fn test_eased_segment_keeps_its_endpoints() {
        let (timeline, prop) = clip::<Property<f32>>(json!({
            "ip": 0, "op": 10,
            "property": { "a": 1, "k": [
                { "t": 0, "s": [0], "o": { "x": [0.9], "y": [0] }, "i": { "x": [1], "y": [1] } },
                { "t": 10, "s": [100] }
            ]}
        }));
        let value = import::scalar(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);

        let mid = anim.value_at_frame(5.0).unwrap().as_scalar().unwrap();
        assert!(mid < 25.0, "strong ease-in should lag, got {mid}");
        assert_eq!(anim.value_at_frame(0.0).unwrap(), Value::Scalar(0.0));
        assert_eq!(anim.value_at_frame(10.0).unwrap(), Value::Scalar(100.0));
    }

    #[test]
    fn test_static_property_is_constant() {
        let (timeline, prop) =
            clip::<Property<f32>>(json!({ "ip": 0, "op": 60, "property": { "a": 0, "k": 42 } }));
        let value = import::scalar(&prop).unwrap().unwrap();
        assert!(value.is_static());
        let mut anim = value.create_animation(timeline);
        for progress in [0.0, 0.25, 0.9, 1.0] {
            assert_eq!(anim.evaluate(progress).unwrap(), Value::Scalar(42.0));
        }
    }

    #[test]
    fn test_spatial_position_bows_off_the_chord() {
        let (timeline, prop) = clip(json!({
            "ip": 0, "op": 10,
            "property": { "a": 1, "k": [
                { "t": 0, "s": [0, 0, 0], "to": [0, 40, 0], "ti": [0, 40, 0] },
                { "t": 10, "s": [100, 0, 0] }
            ]}
        }));
        let value = import::point(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);
        let mid = anim.evaluate(0.5).unwrap().as_point().unwrap();
        assert!(mid.y > 10.0, "expected a curved route, got {mid:?}");
        assert_eq!(anim.evaluate(1.0).unwrap(), Value::Point(Vec2::new(100.0, 0.0)));
    }
}

mod gradients {
    use super::*;

    #[test]
    fn test_differing_stop_counts_share_merged_positions() {
        let start = GradientColor::from_parts(&[0.0, 1.0], &[Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::ONE]);
        let end = GradientColor::from_parts(
            &[0.0, 0.3, 1.0],
            &[Vec4::ONE, Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::ONE],
        );
        let value = AnimatableValue::new(vec![Keyframe::new(
            0.0,
            Value::Gradient(start),
            10.0,
            Value::Gradient(end),
        )])
        .unwrap();

        let kf = &value.keyframes().unwrap()[0];
        let positions = |v: &Value| v.as_gradient().unwrap().positions();
        assert_eq!(positions(&kf.start_value), vec![0.0, 0.3, 1.0]);
        assert_eq!(positions(kf.end_value.as_ref().unwrap()), vec![0.0, 0.3, 1.0]);

        let mut anim = value.create_animation(Timeline::new(0.0, 10.0, 30.0));
        let mid = anim.evaluate(0.5).unwrap();
        assert_eq!(mid.as_gradient().unwrap().len(), 3);
    }

    #[test]
    fn test_raw_gradient_with_opacity_stops() {
        init_tracing();
        let (timeline, colors) = clip::<GradientColors>(json!({
            "ip": 0, "op": 10,
            "property": { "p": 2, "k": { "a": 1, "k": [
                { "t": 0, "s": [0, 1, 0, 0, 1, 0, 0, 1] },
                { "t": 10, "s": [0, 1, 0, 0, 1, 0, 0, 1, 0, 1, 0.5, 0.5, 1, 1] }
            ]}}
        }));
        let value = import::gradient(&colors).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);

        let start = anim.evaluate(0.0).unwrap();
        let start = start.as_gradient().unwrap();
        assert_eq!(start.positions(), vec![0.0, 0.5, 1.0]);
        assert!(start.stops.iter().all(|s| s.color.w == 1.0));

        let end = anim.evaluate(1.0).unwrap();
        assert_eq!(end.as_gradient().unwrap().stops[1].color.w, 0.5);
    }
}

mod overrides {
    use super::*;

    #[test]
    fn test_relative_integer_offset() {
        let (timeline, prop) = clip::<Property<f32>>(json!({
            "ip": 0, "op": 10,
            "property": { "a": 1, "k": [
                { "t": 0, "s": [0], "o": { "x": [0.8], "y": [0] }, "i": { "x": [0.2], "y": [1] } },
                { "t": 10, "s": [10] }
            ]}
        }));
        let value = import::integer(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);
        anim.set_override(ValueOverride::relative(Value::Integer(5)));
        assert_eq!(anim.evaluate(0.5).unwrap(), Value::Integer(10));
    }

    #[test]
    fn test_absolute_override_and_pass_through() {
        let (timeline, prop) = scalar_clip();
        let value = import::scalar(&prop).unwrap().unwrap();
        let mut anim = value.create_animation(timeline);

        let notified = Rc::new(Cell::new(false));
        let flag = Rc::clone(&notified);
        anim.set_change_listener(move || flag.set(true));

        anim.set_override(ValueOverride::dynamic(|info| {
            (info.overall_progress >= 0.5).then(|| Value::Scalar(-1.0))
        }));
        assert!(notified.get());
        assert_eq!(anim.evaluate(0.2).unwrap(), Value::Scalar(2.0));
        assert_eq!(anim.evaluate(0.8).unwrap(), Value::Scalar(-1.0));
    }

    #[test]
    fn test_registry_targets_transform_channel() {
        init_tracing();
        let (timeline, transform) = clip::<Transform>(json!({
            "ip": 0, "op": 10,
            "property": {
                "o": { "a": 0, "k": 100 },
                "r": { "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [90] } ] }
            }
        }));
        let mut anim = import::transform(&transform).unwrap().create_animation(timeline);

        let mut registry = OverrideRegistry::new();
        registry.set_override(
            "Layer.**.Transform",
            PropertyId::TransformOpacity,
            ValueOverride::fixed(Value::Integer(25)),
        );
        let channel = anim.channel_mut(PropertyId::TransformOpacity).unwrap();
        assert!(registry.attach(&["Layer", "Group", "Transform"], PropertyId::TransformOpacity, channel));

        let sample = anim.evaluate(0.5).unwrap();
        assert_eq!(sample.opacity, 25);
        assert_eq!(sample.rotation, 45.0);
    }
}

mod composites {
    use super::*;

    #[test]
    fn test_transform_with_split_position() {
        let (timeline, transform) = clip::<Transform>(json!({
            "ip": 0, "op": 10,
            "property": {
                "a": { "a": 0, "k": [5, 5, 0] },
                "p": {
                    "s": true,
                    "x": { "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [100] } ] },
                    "y": { "a": 0, "k": 20 }
                },
                "s": { "a": 0, "k": [200, 200, 100] }
            }
        }));
        let transform = import::transform(&transform).unwrap();
        assert!(!transform.is_static());
        assert!(matches!(
            transform.keyframes(),
            Err(AnimError::UnsupportedOperation(_))
        ));

        let mut anim = transform.create_animation(timeline);
        let sample = anim.evaluate(0.5).unwrap();
        assert_eq!(sample.position, Vec2::new(50.0, 20.0));
        assert_eq!(sample.scale, Vec2::splat(2.0));
        assert_eq!(sample.opacity, 100);

        let anchor_on_screen = anim.matrix(0.5).unwrap().transform_point2(Vec2::new(5.0, 5.0));
        assert!(anchor_on_screen.abs_diff_eq(Vec2::new(50.0, 20.0), EPS));
    }

    #[test]
    fn test_text_style_bundle() {
        let (timeline, style) = clip::<TextStyleData>(json!({
            "ip": 0, "op": 10,
            "property": {
                "fc": { "a": 0, "k": [1, 0, 0] },
                "sw": { "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [4] } ] }
            }
        }));
        let bundle = import::text_style(&style).unwrap();
        let mut anim = bundle.create_animation(timeline);
        let out = anim.evaluate(0.5).unwrap();
        assert_eq!(out.color, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(out.stroke_width, Some(2.0));
        assert_eq!(out.tracking, None);
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_path_vertex_mismatch() {
        let (_, prop) = clip::<Property<animatable_data::model::BezierPath>>(json!({
            "ip": 0, "op": 10,
            "property": { "a": 1, "k": [
                { "t": 0, "s": [{ "c": true, "v": [[0, 0], [10, 0], [0, 10]], "i": [], "o": [] }] },
                { "t": 10, "s": [{ "c": true, "v": [[0, 0], [10, 0]], "i": [], "o": [] }] }
            ]}
        }));
        assert_eq!(
            import::path(&prop).unwrap_err(),
            AnimError::ShapeMismatch { start: 3, end: 2 }
        );
    }

    #[test]
    fn test_unset_relative_override() {
        let value = AnimatableValue::new(vec![Keyframe::new(
            0.0,
            Value::Path(ShapePath::polygon(vec![Vec2::ZERO, Vec2::X], false)),
            10.0,
            Value::Path(ShapePath::polygon(vec![Vec2::ZERO, Vec2::Y], false)),
        )])
        .unwrap();
        let mut anim = value.create_animation(Timeline::new(0.0, 10.0, 30.0));
        anim.set_override(ValueOverride::Relative(animatable_core::RelativeOffset::Unset));
        assert_eq!(anim.evaluate(0.5).unwrap_err(), AnimError::MissingOverrideValue);
    }
}
