use super::*;

#[test]
fn defaults_match_a_freshly_added_caption() {
    let l = TextLayer::with_defaults(LayerId(7));
    assert_eq!(l.id, LayerId(7));
    assert_eq!(l.text, "New Text");
    assert_eq!((l.x, l.y), (50.0, 50.0));
    assert_eq!(l.font_size, 100);
    assert_eq!(l.font_family, FontFamily::Arial);
    assert_eq!(l.font_weight.get(), 700);
    assert_eq!(l.color, Rgb8::WHITE);
    assert_eq!(l.opacity, 1.0);
    assert_eq!(l.shadow_color, Rgb8::BLACK);
    assert_eq!(l.shadow_blur, 0);
    assert_eq!(l.rotation, 0);
    assert!(!l.has_shadow());
}

#[test]
fn label_falls_back_for_empty_text() {
    let mut l = TextLayer::default();
    l.text = "HELLO".into();
    assert_eq!(l.label(), "HELLO");
    l.text.clear();
    assert_eq!(l.label(), "Empty Text");
}

#[test]
fn font_family_names_round_trip_through_from_str() {
    for f in FontFamily::ALL {
        assert_eq!(f.name().parse::<FontFamily>().unwrap(), f);
    }
    assert_eq!(
        "times new roman".parse::<FontFamily>().unwrap(),
        FontFamily::TimesNewRoman
    );
    assert!("Wingdings".parse::<FontFamily>().is_err());
}

#[test]
fn font_family_generic_classes() {
    assert_eq!(FontFamily::Georgia.generic(), GenericFamily::Serif);
    assert_eq!(FontFamily::CourierNew.generic(), GenericFamily::Monospace);
    assert_eq!(FontFamily::ComicSansMs.generic(), GenericFamily::Cursive);
    assert_eq!(FontFamily::Impact.generic(), GenericFamily::SansSerif);
}

#[test]
fn font_weight_validation_and_snapping() {
    assert!(FontWeight::new(100).is_ok());
    assert!(FontWeight::new(900).is_ok());
    assert!(FontWeight::new(0).is_err());
    assert!(FontWeight::new(450).is_err());
    assert!(FontWeight::new(1000).is_err());

    assert_eq!(FontWeight::snapped(640.0).get(), 600);
    assert_eq!(FontWeight::snapped(650.0).get(), 700);
    assert_eq!(FontWeight::snapped(-20.0).get(), 100);
    assert_eq!(FontWeight::snapped(5000.0).get(), 900);
    assert_eq!(FontWeight::snapped(f64::NAN), FontWeight::NORMAL);
}

#[test]
fn layer_json_uses_camel_case_and_defaults_missing_fields() {
    let json = r##"{"text":"HI","x":10,"y":90,"fontFamily":"Times New Roman","shadowBlur":4}"##;
    let l: TextLayer = serde_json::from_str(json).unwrap();
    assert_eq!(l.text, "HI");
    assert_eq!((l.x, l.y), (10.0, 90.0));
    assert_eq!(l.font_family, FontFamily::TimesNewRoman);
    assert_eq!(l.shadow_blur, 4);
    assert_eq!(l.font_size, 100);
    assert_eq!(l.font_weight, FontWeight::BOLD);

    let out = serde_json::to_value(&l).unwrap();
    assert_eq!(out["fontSize"], 100);
    assert_eq!(out["color"], "#FFFFFF");
    assert_eq!(out["fontFamily"], "Times New Roman");
}

#[test]
fn layer_json_rejects_off_grid_weight() {
    assert!(serde_json::from_str::<TextLayer>(r#"{"fontWeight":750}"#).is_err());
}

#[test]
fn sanitized_forces_fields_into_range() {
    let l = TextLayer {
        x: -10.0,
        y: f64::NAN,
        font_size: 4,
        opacity: 2.0,
        shadow_blur: 99,
        rotation: 725,
        ..TextLayer::default()
    }
    .sanitized();
    assert_eq!(l.x, 0.0);
    assert_eq!(l.y, 50.0);
    assert_eq!(l.font_size, MIN_FONT_SIZE);
    assert_eq!(l.opacity, 1.0);
    assert_eq!(l.shadow_blur, MAX_SHADOW_BLUR);
    assert_eq!(l.rotation, 5);
}

#[test]
fn patch_applies_only_present_fields_with_clamping() {
    let mut l = TextLayer::default();
    LayerPatch::default()
        .position(130.0, -4.0)
        .font_size(1000)
        .opacity(-1.0)
        .rotation(360)
        .color(Rgb8::new(1, 2, 3))
        .apply_to(&mut l);
    assert_eq!((l.x, l.y), (100.0, 0.0));
    assert_eq!(l.font_size, MAX_FONT_SIZE);
    assert_eq!(l.opacity, 0.0);
    assert_eq!(l.rotation, 0);
    assert_eq!(l.color, Rgb8::new(1, 2, 3));
    assert_eq!(l.text, "New Text");
    assert_eq!(l.font_family, FontFamily::Arial);
}

#[test]
fn patch_drops_nan_positions() {
    let mut l = TextLayer::default();
    LayerPatch::default().x(f64::NAN).y(20.0).apply_to(&mut l);
    assert_eq!((l.x, l.y), (50.0, 20.0));
}

#[test]
fn empty_patch_is_detected() {
    assert!(LayerPatch::default().is_empty());
    assert!(!LayerPatch::default().text("").is_empty());
}

#[test]
fn layers_json_fills_defaults() {
    let json = r##"[{"text":"A","x":10},{"color":"#00ff00","rotation":90}]"##;
    let layers = layers_from_json(json.as_bytes()).unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!((layers[0].text.as_str(), layers[0].x, layers[0].y), ("A", 10.0, 50.0));
    assert_eq!(layers[1].color, Rgb8::new(0, 255, 0));
    assert_eq!(layers[1].text, "New Text");
}

#[test]
fn malformed_layers_json_is_a_serde_error() {
    for bad in ["{", r#"{"text":"not an array"}"#, r#"[{"fontWeight":750}]"#] {
        assert!(matches!(
            layers_from_json(bad.as_bytes()),
            Err(TextBehindError::Serde(_))
        ));
    }
}
