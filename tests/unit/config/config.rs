use super::*;

#[test]
fn empty_json_yields_defaults() {
    let c = OverlayConfig::from_json_str("{}").unwrap();
    assert_eq!(c, OverlayConfig::default());
    c.validate().unwrap();
}

#[test]
fn partial_layer_fields_fill_in_defaults() {
    let c = OverlayConfig::from_json_str(
        r#"{ "background": { "fps": 30, "size": null }, "bar": { "min_delay": 200, "height": 40, "ease": "smooth_step" } }"#,
    )
    .unwrap();
    let bg = c.background.unwrap();
    assert_eq!(bg.fps, 30.0);
    assert_eq!(bg.size, None);
    assert_eq!(bg.scale, Some(2));

    let bar = c.bar.unwrap();
    assert_eq!(bar.params.min_delay, 200.0);
    assert_eq!(bar.params.max_delay, 5000.0);
    assert_eq!(bar.params.height, 40.0);
    assert_eq!(bar.params.ease, crate::animation::ease::Ease::SmoothStep);
    assert_eq!(bar.opacity, 0.1);
}

#[test]
fn layers_can_be_disabled() {
    let c = OverlayConfig::from_json_str(r#"{ "bar": null }"#).unwrap();
    assert!(c.bar.is_none());
    assert!(c.background.is_some());
}

#[test]
fn color_modes_and_caps_parse() {
    let c = OverlayConfig::from_json_str(
        r#"{ "background": { "color_mode": { "tinted": [0, 255, 128] }, "resolution_cap": 1.0 },
             "bar": { "color_mode": "chromatic" } }"#,
    )
    .unwrap();
    let bg = c.background.unwrap();
    assert_eq!(bg.color_mode, ColorMode::Tinted([0, 255, 128]));
    assert_eq!(bg.resolution_cap.map(ResolutionCap::get), Some(1.0));
    assert_eq!(c.bar.unwrap().color_mode, ColorMode::Chromatic);
}

#[test]
fn bad_cap_is_a_serde_error() {
    let err = OverlayConfig::from_json_str(r#"{ "bar": { "resolution_cap": 0 } }"#).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn validation_catches_bad_ranges() {
    let mut c = OverlayConfig::default();
    c.background.as_mut().unwrap().opacity = 1.5;
    assert!(c.validate().is_err());

    let mut c = OverlayConfig::default();
    c.bar.as_mut().unwrap().fps = 0.0;
    assert!(c.validate().is_err());

    let mut c = OverlayConfig::default();
    c.bar.as_mut().unwrap().params.min_duration = 9000.0;
    assert!(c.validate().is_err());

    let mut c = OverlayConfig::default();
    c.background.as_mut().unwrap().scale = Some(0);
    assert!(c.validate().is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = OverlayConfig::from_path(Path::new("/nonexistent/overlay.json")).unwrap_err();
    assert!(err.to_string().contains("overlay.json"));
}
