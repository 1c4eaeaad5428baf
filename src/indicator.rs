//! Navigation indicators: a strip of dots along the bottom edge and an
//! arrow area on each side of the container.

use tracing::debug;

use crate::config::{DotShape, IndicatorOptions};
use crate::dom::{Document, ElementId, Length, Position, Rect};
use crate::error::Error;

/// Vertical nudge applied to arrow glyphs, relative to their size, so the
/// glyph's optical centre lines up with the container's.
const GLYPH_BASELINE_FACTOR: f64 = 0.24 * 0.025;

#[derive(Debug, Clone)]
pub struct DotStrip {
    pub container: ElementId,
    pub dots: Vec<ElementId>,
}

#[derive(Debug, Clone, Copy)]
pub struct Arrows {
    pub left_area: ElementId,
    pub right_area: ElementId,
    pub left_glyph: ElementId,
    pub right_glyph: ElementId,
}

#[derive(Debug, Clone)]
pub struct Indicator {
    options: IndicatorOptions,
    dots: Option<DotStrip>,
    arrows: Option<Arrows>,
    hidden: bool,
}

impl Indicator {
    /// Builds the enabled indicator parts inside `container`.
    ///
    /// Returns `Ok(None)` when indicators are switched off entirely.
    pub fn build(
        doc: &mut Document,
        container: ElementId,
        options: &IndicatorOptions,
        base_z: i32,
        len: usize,
        rect: Rect,
    ) -> Result<Option<Self>, Error> {
        if !options.show || (!options.dot.show && !options.arrow.show) {
            return Ok(None);
        }
        let z = base_z + 1 + len as i32;

        let dots = if options.dot.show {
            Some(build_dots(doc, container, options, z, len)?)
        } else {
            None
        };
        let arrows = if options.arrow.show {
            Some(build_arrows(doc, container, options, z)?)
        } else {
            None
        };

        let indicator = Self {
            options: options.clone(),
            dots,
            arrows,
            hidden: false,
        };
        indicator.layout(doc, rect);
        indicator.highlight(doc, 0);
        debug!(
            dots = indicator.dots.is_some(),
            arrows = indicator.arrows.is_some(),
            "indicator created"
        );
        Ok(Some(indicator))
    }

    pub fn dot_strip(&self) -> Option<&DotStrip> {
        self.dots.as_ref()
    }

    pub fn arrows(&self) -> Option<&Arrows> {
        self.arrows.as_ref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Recomputes geometry for a container of size `rect`.
    pub fn layout(&self, doc: &mut Document, rect: Rect) {
        if let Some(strip) = &self.dots {
            let dot = &self.options.dot;
            let width = (dot.size + dot.space) * strip.dots.len() as f64;
            doc.style_mut(strip.container).left = Some(Length::Px((rect.width - width) * 0.5));
        }

        if let Some(arrows) = &self.arrows {
            let size = self.options.arrow.size;
            let top = (rect.height - size) * 0.5 - size * GLYPH_BASELINE_FACTOR;
            for area in [arrows.left_area, arrows.right_area] {
                doc.style_mut(area).height = Some(Length::Px(rect.height));
            }
            for glyph in [arrows.left_glyph, arrows.right_glyph] {
                doc.style_mut(glyph).top = Some(Length::Px(top));
            }
        }
    }

    /// Shows the dot of `active` at full opacity.
    pub fn highlight(&self, doc: &mut Document, active: usize) {
        let Some(strip) = &self.dots else {
            return;
        };
        for (i, dot) in strip.dots.iter().enumerate() {
            doc.style_mut(*dot).opacity = Some(if i == active {
                1.0
            } else {
                self.options.opacity
            });
        }
    }

    /// Returns true when the visibility actually changed.
    pub fn set_hidden(&mut self, doc: &mut Document, hidden: bool) -> bool {
        if self.hidden == hidden {
            return false;
        }
        self.hidden = hidden;
        let opacity = hidden.then_some(0.0);
        if let Some(strip) = &self.dots {
            doc.style_mut(strip.container).opacity = opacity;
        }
        if let Some(arrows) = &self.arrows {
            doc.style_mut(arrows.left_area).opacity = opacity;
            doc.style_mut(arrows.right_area).opacity = opacity;
        }
        true
    }
}

fn build_dots(
    doc: &mut Document,
    container: ElementId,
    options: &IndicatorOptions,
    z: i32,
    len: usize,
) -> Result<DotStrip, Error> {
    let dot = &options.dot;
    let strip = doc.create_element("div");
    let mut dots = Vec::with_capacity(len);

    for _ in 0..len {
        let id = doc.create_element("div");
        let style = doc.style_mut(id);
        style.width = Some(Length::Px(dot.size));
        style.height = Some(Length::Px(dot.size));
        style.opacity = Some(options.opacity);
        style.set("margin", format!("0 {}", Length::Px(dot.space * 0.5)));
        style.set("cursor", "pointer");
        style.set("float", "left");
        style.set("background-color", dot.color.clone());
        style.set("box-sizing", "border-box");
        style.set(
            "border-radius",
            match dot.shape {
                DotShape::Round => "50%",
                DotShape::Square => "0",
            },
        );
        doc.append_child(strip, id)?;
        dots.push(id);
    }

    let style = doc.style_mut(strip);
    style.position = Position::Absolute;
    style.bottom = Some(Length::Px(dot.size));
    style.height = Some(Length::Px(dot.size));
    style.width = Some(Length::Px((dot.size + dot.space) * len as f64));
    style.z_index = Some(z);
    doc.append_child(container, strip)?;

    Ok(DotStrip {
        container: strip,
        dots,
    })
}

fn build_arrows(
    doc: &mut Document,
    container: ElementId,
    options: &IndicatorOptions,
    z: i32,
) -> Result<Arrows, Error> {
    let arrow = &options.arrow;
    let inset = Length::Px((arrow.area - arrow.size) * 0.5);

    let make_area = |doc: &mut Document| {
        let id = doc.create_element("div");
        let style = doc.style_mut(id);
        style.position = Position::Absolute;
        style.top = Some(Length::ZERO);
        style.width = Some(Length::Px(arrow.area));
        style.z_index = Some(z);
        style.set("cursor", "pointer");
        id
    };
    let make_glyph = |doc: &mut Document, text: &str| {
        let id = doc.create_element("div");
        doc.set_text(id, text);
        let style = doc.style_mut(id);
        style.position = Position::Absolute;
        style.width = Some(Length::Px(arrow.size));
        style.height = Some(Length::Px(arrow.size));
        style.opacity = Some(options.opacity);
        style.set("font-size", Length::Px(arrow.size).to_string());
        style.set("color", arrow.color.clone());
        style.set("cursor", "pointer");
        id
    };

    let left_area = make_area(doc);
    let right_area = make_area(doc);
    doc.style_mut(left_area).left = Some(Length::ZERO);
    doc.style_mut(right_area).right = Some(Length::ZERO);

    let left_glyph = make_glyph(doc, &arrow.appearance.left);
    let right_glyph = make_glyph(doc, &arrow.appearance.right);
    doc.style_mut(left_glyph).left = Some(inset);
    doc.style_mut(right_glyph).right = Some(inset);

    doc.append_child(left_area, left_glyph)?;
    doc.append_child(right_area, right_glyph)?;
    doc.append_child(container, left_area)?;
    doc.append_child(container, right_area)?;

    Ok(Arrows {
        left_area,
        right_area,
        left_glyph,
        right_glyph,
    })
}
