use crate::{
    compose::background::{GLOW_RADIUS, draw_generated_background},
    foundation::{core::Canvas, math::Rng64},
    render::record::{DrawOp, RecordingSurface},
    template::{descriptor::TemplateDescriptor, resolve::ResolvedTemplate},
};
use serde_json::json;

fn record(t: &ResolvedTemplate, seed: u64) -> Vec<DrawOp> {
    let mut s = RecordingSurface::new(Canvas::THUMBNAIL);
    draw_generated_background(&mut s, t, &mut Rng64::new(seed)).unwrap();
    s.into_ops()
}

#[test]
fn gradient_spans_the_diagonal() {
    let ops = record(&ResolvedTemplate::default(), 1);
    let DrawOp::LinearGradient { area, from, to, stops } = &ops[0] else {
        panic!("first op must be the gradient");
    };
    assert_eq!(*area, Canvas::THUMBNAIL.rect());
    assert_eq!((from.x, from.y, to.x, to.y), (0.0, 0.0, 1280.0, 720.0));
    assert_eq!(*stops, ResolvedTemplate::default().gradient);
}

#[test]
fn glow_count_follows_texture_steps() {
    for steps in [0u32, 1, 17] {
        let t = ResolvedTemplate::resolve(
            &TemplateDescriptor::from_value(json!({ "effects": { "textureSteps": steps } }))
                .unwrap(),
        );
        let glows = record(&t, 9)
            .iter()
            .filter(|op| matches!(op, DrawOp::RadialGlow { .. }))
            .count();
        assert_eq!(glows, steps as usize);
    }
}

#[test]
fn glows_stay_within_radius_alpha_and_frame_bounds() {
    let t = ResolvedTemplate::default();
    let max_alpha = (t.texture.opacity * 255.0).round() as u8;
    let min_alpha = (t.texture.opacity * 0.2 * 255.0).round() as u8;
    for op in record(&t, 42) {
        let DrawOp::RadialGlow { center, radius, color } = op else {
            continue;
        };
        assert!((GLOW_RADIUS.0..GLOW_RADIUS.1).contains(&radius));
        assert!((0.0..1280.0).contains(&center.x) && (0.0..720.0).contains(&center.y));
        assert!((min_alpha..=max_alpha).contains(&color.a), "{}", color.a);
        assert_eq!((color.r, color.g, color.b), (255, 255, 255));
    }
}

#[test]
fn same_seed_reproduces_and_other_seed_differs() {
    let t = ResolvedTemplate::default();
    assert_eq!(record(&t, 5), record(&t, 5));
    assert_ne!(record(&t, 5), record(&t, 6));
}
