use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::css;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionMode {
    #[default]
    Slide,
    Fade,
}

impl TransitionMode {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Fade => "fade",
        }
    }
}

impl fmt::Display for TransitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction the visible content travels during a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl SlideDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Sign of the offset the outgoing layer travels towards.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left | Self::Up => -1.0,
            Self::Right | Self::Down => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideMove {
    #[default]
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotShape {
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SlideOptions {
    /// Which layer moves when `stack` is set.
    #[serde(rename = "move")]
    pub movement: SlideMove,
    /// Keep layers stacked and move only one of them.
    pub stack: bool,
    pub direction: SlideDirection,
    /// Opacity of the visible layer when not stacked.
    pub opacity: f64,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            movement: SlideMove::In,
            stack: false,
            direction: SlideDirection::Left,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FadeOptions {
    /// Opacity the incoming layer fades up to.
    pub opacity: f64,
    pub overlap: bool,
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            overlap: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DotOptions {
    pub show: bool,
    /// Dot diameter in px.
    pub size: f64,
    /// Horizontal gap between dots in px.
    pub space: f64,
    pub color: String,
    #[serde(rename = "type")]
    pub shape: DotShape,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            show: true,
            size: 10.0,
            space: 10.0,
            color: "#000".to_string(),
            shape: DotShape::Round,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ArrowAppearance {
    pub left: String,
    pub right: String,
}

impl Default for ArrowAppearance {
    fn default() -> Self {
        Self {
            left: "\u{276E}".to_string(),
            right: "\u{276F}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ArrowOptions {
    pub show: bool,
    /// Width of the clickable strip on each side, in px.
    pub area: f64,
    /// Glyph box and font size, in px.
    pub size: f64,
    pub color: String,
    pub appearance: ArrowAppearance,
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            show: true,
            area: 50.0,
            size: 30.0,
            color: "#000".to_string(),
            appearance: ArrowAppearance::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct IndicatorOptions {
    pub show: bool,
    pub hide_on_idle: bool,
    pub idle_threshold_ms: u64,
    pub opacity: f64,
    pub dot: DotOptions,
    pub arrow: ArrowOptions,
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self {
            show: true,
            hide_on_idle: true,
            idle_threshold_ms: 2000,
            opacity: 0.5,
            dot: DotOptions::default(),
            arrow: ArrowOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    pub images: Vec<String>,
    /// `#id` or tag selector of the container; the document body when unset.
    pub container: Option<String>,
    pub image_size: String,
    pub image_repeat: String,
    pub image_position: String,
    /// Dwell between transitions, in ms.
    pub interval_ms: f64,
    /// Percent of a transition completed per tick.
    pub speed: f64,
    /// Tick period while a transition runs, in ms.
    pub frame_ms: f64,
    pub mode: TransitionMode,
    pub z_index: i32,
    pub slide: SlideOptions,
    pub fade: FadeOptions,
    pub indicator: IndicatorOptions,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            container: None,
            image_size: "cover".to_string(),
            image_repeat: "no-repeat".to_string(),
            image_position: "center center".to_string(),
            interval_ms: 5000.0,
            speed: 1.0,
            frame_ms: 7.5,
            mode: TransitionMode::Slide,
            z_index: 0,
            slide: SlideOptions::default(),
            fade: FadeOptions::default(),
            indicator: IndicatorOptions::default(),
        }
    }
}

/// Every problem found while validating a [`Configuration`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.errors.join("\n"))
    }
}

/// Longest dwell, tick period or idle threshold accepted: one year.
pub const MAX_PERIOD_MS: f64 = 365.0 * 24.0 * 3600.0 * 1000.0;

/// Saturates instead of wrapping to zero; NaN and negatives map to zero.
fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(if ms > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

fn valid_period(ms: f64) -> bool {
    ms.is_finite() && ms > 0.0 && ms <= MAX_PERIOD_MS
}

impl Configuration {
    pub fn from_yaml_str(input: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&data)
    }

    pub fn interval(&self) -> Duration {
        millis(self.interval_ms)
    }

    pub fn frame_period(&self) -> Duration {
        millis(self.frame_ms)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.indicator.idle_threshold_ms)
    }

    /// Checks every field and collects all errors and warnings.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !css::is_background_size(&self.image_size) {
            report.error(r#"Property "image-size" only supports values of the CSS "background-size" property."#);
        }
        if !css::is_background_repeat(&self.image_repeat) {
            report.error(r#"Property "image-repeat" only supports values of the CSS "background-repeat" property."#);
        }
        if !css::is_background_position(&self.image_position) {
            report.error(r#"Property "image-position" only supports values of the CSS "background-position" property."#);
        }

        if !valid_period(self.interval_ms) {
            report.error(format!(
                r#"Value of property "interval-ms" must be a finite number within (0, {MAX_PERIOD_MS}], got {}."#,
                self.interval_ms
            ));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 || self.speed > 1.0 {
            report.error(format!(
                r#"Value of property "speed" must be within (0, 1], got {}."#,
                self.speed
            ));
        }
        if !valid_period(self.frame_ms) {
            report.error(format!(
                r#"Value of property "frame-ms" must be a finite number within (0, {MAX_PERIOD_MS}], got {}."#,
                self.frame_ms
            ));
        }
        if self.z_index < 0 {
            report.warning(
                r#"Negative base "z-index" might hide the images behind the page background."#,
            );
        }

        if !unit_interval(self.slide.opacity) {
            report.error(r#"Property "slide.opacity" must be within [0, 1]."#);
        }
        if self.mode == TransitionMode::Slide && self.slide.stack && self.slide.opacity != 1.0 {
            report.warning(r#"Property "slide.opacity" does not apply when "slide.stack" is true."#);
        }

        if !self.fade.opacity.is_finite() || self.fade.opacity <= 0.0 || self.fade.opacity > 1.0 {
            report.error(r#"Property "fade.opacity" must be within (0, 1]."#);
        } else if self.fade.opacity < 1.0 && self.fade.overlap {
            report.warning(
                r#"Fading might look off when "fade.opacity" is below 1 and "fade.overlap" is true."#,
            );
        }

        let indicator = &self.indicator;
        if indicator.idle_threshold_ms as f64 > MAX_PERIOD_MS {
            report.error(format!(
                r#"Value of property "indicator.idle-threshold-ms" must not exceed {MAX_PERIOD_MS}, got {}."#,
                indicator.idle_threshold_ms
            ));
        }
        if !unit_interval(indicator.opacity) {
            report.error(r#"Property "indicator.opacity" must be within [0, 1]."#);
        }
        for (name, value) in [
            ("indicator.dot.size", indicator.dot.size),
            ("indicator.dot.space", indicator.dot.space),
            ("indicator.arrow.area", indicator.arrow.area),
            ("indicator.arrow.size", indicator.arrow.size),
        ] {
            if !value.is_finite() || value < 0.0 {
                report.error(format!(
                    r#"Property "{name}" must be a finite, non-negative number of pixels."#
                ));
            }
        }
        if !css::is_color(&indicator.dot.color) {
            report.error(format!(
                r#"Property "indicator.dot.color" is not a CSS color: {:?}."#,
                indicator.dot.color
            ));
        }
        if !css::is_color(&indicator.arrow.color) {
            report.error(format!(
                r#"Property "indicator.arrow.color" is not a CSS color: {:?}."#,
                indicator.arrow.color
            ));
        }

        report
    }

    /// Validates, logs warnings and fails with every error at once.
    pub fn validated(self) -> Result<Self, Error> {
        let report = self.validate();
        for warning in &report.warnings {
            warn!("{warning}");
        }
        if report.is_ok() {
            Ok(self)
        } else {
            Err(Error::InvalidConfig(report))
        }
    }
}

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
