use std::io::Write;

use slidery::Error;
use slidery::config::{Configuration, DotShape, SlideDirection, SlideMove, TransitionMode};

#[test]
fn parse_kebab_case_config() {
    let yaml = r##"
images: ["a.jpg", "b.jpg"]
container: "#hero"
image-size: contain
interval-ms: 3000
frame-ms: 16
mode: fade
z-index: 10
fade:
  opacity: 0.8
slide:
  move: out
  stack: true
  direction: up
indicator:
  hide-on-idle: false
  idle-threshold-ms: 500
  dot:
    type: square
    color: "rgba(255, 255, 255, 0.7)"
  arrow:
    appearance:
      left: "<"
      right: ">"
"##;
    let cfg = Configuration::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.images, vec!["a.jpg", "b.jpg"]);
    assert_eq!(cfg.container.as_deref(), Some("#hero"));
    assert_eq!(cfg.image_size, "contain");
    assert!((cfg.interval_ms - 3000.0).abs() < f64::EPSILON);
    assert_eq!(cfg.mode, TransitionMode::Fade);
    assert_eq!(cfg.z_index, 10);
    assert!((cfg.fade.opacity - 0.8).abs() < f64::EPSILON);
    assert_eq!(cfg.slide.movement, SlideMove::Out);
    assert!(cfg.slide.stack);
    assert_eq!(cfg.slide.direction, SlideDirection::Up);
    assert!(!cfg.indicator.hide_on_idle);
    assert_eq!(cfg.indicator.idle_threshold_ms, 500);
    assert_eq!(cfg.indicator.dot.shape, DotShape::Square);
    assert_eq!(cfg.indicator.arrow.appearance.left, "<");
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_fields_take_defaults() {
    let cfg = Configuration::from_yaml_str("images: [\"only.png\"]\n").unwrap();
    assert_eq!(cfg.mode, TransitionMode::Slide);
    assert!((cfg.speed - 1.0).abs() < f64::EPSILON);
    assert_eq!(cfg.image_repeat, "no-repeat");
    assert!(cfg.indicator.show);
    assert_eq!(cfg.indicator.arrow.appearance.right, "\u{276F}");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Configuration::from_yaml_str("draggable: true\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)), "unexpected error: {err}");

    let err = Configuration::from_yaml_str("slide:\n  gap: 10\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)), "unexpected error: {err}");
}

#[test]
fn unknown_mode_is_rejected() {
    let err = Configuration::from_yaml_str("mode: zoom\n").unwrap_err();
    assert!(err.to_string().contains("zoom"), "unexpected error: {err}");
}

#[test]
fn validation_reports_every_problem() {
    let yaml = r##"
interval-ms: 0
speed: 2
image-position: "middle nowhere"
indicator:
  dot:
    color: "#12"
"##;
    let cfg = Configuration::from_yaml_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    let Error::InvalidConfig(report) = &err else {
        panic!("expected invalid config, got {err:?}");
    };
    assert_eq!(report.errors.len(), 4, "{report}");
    let message = err.to_string();
    assert!(message.contains("interval-ms"));
    assert!(message.contains("speed"));
    assert!(message.contains("image-position"));
    assert!(message.contains("indicator.dot.color"));
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "images: [\"x.jpg\"]\nmode: fade").unwrap();
    let cfg = Configuration::from_yaml_file(file.path()).unwrap();
    assert_eq!(cfg.mode, TransitionMode::Fade);

    let missing = file.path().with_extension("missing");
    assert!(matches!(
        Configuration::from_yaml_file(&missing),
        Err(Error::Io(_))
    ));
}
