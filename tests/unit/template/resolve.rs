use super::*;
use serde_json::json;

fn resolve(v: serde_json::Value) -> ResolvedTemplate {
    ResolvedTemplate::resolve(&TemplateDescriptor::from_value(v).unwrap())
}

#[test]
fn empty_document_takes_every_default() {
    let t = resolve(json!({}));
    assert_eq!(t.canvas, Canvas::THUMBNAIL);
    assert_eq!(t.gradient[0], Rgba8::new(0x11, 0x18, 0x27, 255));
    assert_eq!(t.gradient[1], Rgba8::new(0x1d, 0x4e, 0xd8, 255));
    assert_eq!(t.padding, 72.0);
    assert_eq!(t.title.family, "Arial, sans-serif");
    assert_eq!((t.title.max_size, t.title.min_size), (132.0, 64.0));
    assert_eq!(t.title.line_height_ratio, 1.06);
    assert_eq!(t.title.baseline_ratio, 0.84);
    assert_eq!(t.title.max_lines, 3);
    assert_eq!(t.title.visible_words_max, 6);
    assert_eq!(t.title.weight, 900.0);
    assert_eq!(t.title.size_step, 2.0);
    assert_eq!(t.title.outline_width, 10.0);
    assert!(t.shadow.is_none());
    assert_eq!(t.texture.steps, 280);
    assert_eq!(t.texture.opacity, 0.09);
    assert_eq!(t.badge.font_size, 42.0);
    assert_eq!(t.badge.margin, 72.0);
    assert_eq!(t.badge.radius, 999.0);
    assert_eq!(t.badge.position, BadgePosition::TopLeft);
    assert_eq!(t.badge.family, t.title.family);
    assert_eq!(t.footer.font_size, 30.0);
    assert_eq!(t.footer.margin_bottom, 30.0);
    assert_eq!(t.footer.color.a, 242);
    assert_eq!(t.default_footer, "");
}

#[test]
fn single_gradient_stop_is_used_twice() {
    let t = resolve(json!({ "colors": { "backgroundGradient": ["#000000"] } }));
    assert_eq!(t.gradient, [Rgba8::BLACK, Rgba8::BLACK]);
}

#[test]
fn empty_gradient_list_takes_default() {
    let t = resolve(json!({ "colors": { "backgroundGradient": [] } }));
    assert_eq!(t.gradient, ResolvedTemplate::default().gradient);
}

#[test]
fn nullish_fields_keep_explicit_zero() {
    let t = resolve(json!({
        "layout": { "padding": 0 },
        "effects": {
            "outlineWidth": 0,
            "textureOpacity": 0,
            "textureSteps": 0,
            "shadow": true,
            "shadowBlur": 0,
            "shadowOffsetY": 0
        }
    }));
    assert_eq!(t.padding, 0.0);
    assert_eq!(t.title.outline_width, 0.0);
    assert_eq!(t.texture.steps, 0);
    assert_eq!(t.texture.opacity, 0.0);
    let shadow = t.shadow.unwrap();
    assert_eq!(shadow.blur, 0.0);
    assert_eq!(shadow.offset, Vec2::new(0.0, 0.0));
}

#[test]
fn falsy_fields_replace_zero_and_empty() {
    let t = resolve(json!({
        "typography": { "titleMaxSize": 0, "maxLines": 0, "fontFamily": "" },
        "badge": { "margin": 0, "radius": 0 },
        "footer": { "marginBottom": 0 }
    }));
    assert_eq!(t.title.max_size, 132.0);
    assert_eq!(t.title.max_lines, 3);
    assert_eq!(t.title.family, "Arial, sans-serif");
    assert_eq!(t.badge.margin, t.padding);
    assert_eq!(t.badge.radius, 999.0);
    assert_eq!(t.footer.margin_bottom, 30.0);
}

#[test]
fn numbers_may_be_strings_and_flags_follow_truthiness() {
    let t = resolve(json!({
        "typography": { "titleMaxSize": "100", "maxLines": "2" },
        "effects": { "shadow": 1, "shadowColor": "#ff0000" }
    }));
    assert_eq!(t.title.max_size, 100.0);
    assert_eq!(t.title.max_lines, 2);
    assert_eq!(t.shadow.unwrap().color, Rgba8::new(255, 0, 0, 255));

    let t = resolve(json!({ "effects": { "shadow": "" } }));
    assert!(t.shadow.is_none());
}

#[test]
fn malformed_sections_and_values_are_ignored() {
    let t = resolve(json!({
        "colors": "red",
        "typography": { "titleMaxSize": "big", "fontFamily": 12 },
        "badge": null
    }));
    assert_eq!(t.gradient, ResolvedTemplate::default().gradient);
    assert_eq!(t.title.max_size, 132.0);
    assert_eq!(t.title.family, "12");
    assert_eq!(t.badge.fill, Rgba8::new(0xef, 0x44, 0x44, 255));
}

#[test]
fn non_positive_font_sizes_are_floored() {
    let t = resolve(json!({
        "typography": { "titleMinSize": -10, "titleMaxSize": 8 },
        "badge": { "fontSize": -4 },
        "footer": { "fontSize": "-0.5" }
    }));
    assert_eq!((t.title.max_size, t.title.min_size), (8.0, MIN_FONT_SIZE));
    assert_eq!(t.badge.font_size, MIN_FONT_SIZE);
    assert_eq!(t.footer.font_size, MIN_FONT_SIZE);
}

#[test]
fn unparsable_colors_fall_back() {
    let t = resolve(json!({ "colors": { "title": "chartreuse-ish" } }));
    assert_eq!(t.title.fill, Rgba8::WHITE);
}

#[test]
fn badge_positions_parse_and_unknown_anchors_top_left() {
    for (raw, want) in [
        ("top-right", BadgePosition::TopRight),
        ("bottom-left", BadgePosition::BottomLeft),
        ("bottom-right", BadgePosition::BottomRight),
        ("middle", BadgePosition::TopLeft),
    ] {
        let t = resolve(json!({ "badge": { "position": raw } }));
        assert_eq!(t.badge.position, want, "{raw}");
    }
}

#[test]
fn footer_color_alias_and_precedence() {
    let t = resolve(json!({ "footer": { "color": "#000" } }));
    assert_eq!(t.footer.color, Rgba8::BLACK);
    let t = resolve(json!({ "footer": { "color": "#000", "textColor": "#fff" } }));
    assert_eq!(t.footer.color, Rgba8::WHITE);
}

#[test]
fn footer_text_prefers_item_then_defaults() {
    let t = resolve(json!({ "defaults": { "footer": "@channel" } }));
    assert_eq!(t.footer_text("mine"), "mine");
    assert_eq!(t.footer_text("  "), "@channel");
    assert_eq!(ResolvedTemplate::default().footer_text(""), "");
}

#[test]
fn studio_preset_values() {
    let t = ResolvedTemplate::studio();
    assert_eq!((t.title.max_size, t.title.min_size), (118.0, 54.0));
    assert_eq!(t.title.visible_words_max, 8);
    assert_eq!(t.texture.steps, 160);
    assert_eq!(t.badge.position, BadgePosition::TopRight);
    assert_eq!(t.badge.margin, 50.0);
    assert_eq!(t.badge.font_size + 2.0 * t.badge.padding_y, 68.0);
    assert_eq!(t.footer.margin_bottom, 28.0);
    assert_eq!(t.gradient[0], Rgba8::new(0x0f, 0x17, 0x2a, 255));
}
