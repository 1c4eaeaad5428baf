//! Minimal retained document model the carousel mutates.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`ElementId`]. Styles are typed for the properties the carousel animates
//! (offsets, size, opacity, z-index) and free-form for purely decorative
//! ones (background, color, cursor, ...).

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Size of an element's bounding box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    pub fn value(self) -> f64 {
        match self {
            Length::Px(v) | Length::Percent(v) => v,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Percent(v) => write!(f, "{v}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub position: Position,
    pub top: Option<Length>,
    pub left: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub opacity: Option<f64>,
    pub z_index: Option<i32>,
    pub overflow_hidden: bool,
    decor: BTreeMap<&'static str, String>,
}

impl Style {
    /// Sets a decorative property such as `background-image` or `color`.
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        self.decor.insert(property, value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.decor.get(property).map(String::as_str)
    }

    /// Opacity as a renderer would see it (unset means fully opaque).
    pub fn effective_opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    id: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    text: Option<String>,
    rect: Rect,
    pub style: Style,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Arena of elements; element 0 is the body.
///
/// Accessors taking an [`ElementId`] (indexing, `style`, `style_mut`,
/// `bounding_rect`, `set_rect`, `set_text`) panic on ids minted by another
/// document. Use [`Document::contains`] or [`Document::get`] to check
/// foreign ids first; `append_child` reports them as
/// [`Error::UnknownElement`].
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    body: ElementId,
}

impl Document {
    /// Creates a document whose `body` covers `viewport`.
    pub fn new(viewport: Rect) -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            body: ElementId(0),
        };
        doc.body = doc.create_element("body");
        doc.elements[0].rect = viewport;
        doc
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        id.0 < self.elements.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: tag.to_ascii_lowercase(),
            id: None,
            parent: None,
            children: Vec::new(),
            text: None,
            rect: Rect::default(),
            style: Style::default(),
        });
        id
    }

    pub fn create_element_with_id(&mut self, tag: &str, html_id: &str) -> ElementId {
        let id = self.create_element(tag);
        self.elements[id.0].id = Some(html_id.to_string());
        id
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), Error> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(Error::UnknownElement(id));
            }
        }
        if let Some(old) = self.elements[child.0].parent.take() {
            self.elements[old.0].children.retain(|c| *c != child);
        }
        self.elements[parent.0].children.push(child);
        self.elements[child.0].parent = Some(parent);
        Ok(())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self[id].text = Some(text.into());
    }

    pub fn bounding_rect(&self, id: ElementId) -> Rect {
        self[id].rect
    }

    /// Records the layout box a host computed for `id`.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        self[id].rect = rect;
    }

    /// # Panics
    ///
    /// If `id` does not belong to this document.
    pub fn style(&self, id: ElementId) -> &Style {
        &self[id].style
    }

    /// # Panics
    ///
    /// If `id` does not belong to this document.
    pub fn style_mut(&mut self, id: ElementId) -> &mut Style {
        &mut self[id].style
    }

    /// Resolves `#id` or a bare tag name to the first matching element.
    ///
    /// Returns `Ok(None)` when the selector is well formed but matches
    /// nothing.
    pub fn query(&self, selector: &str) -> Result<Option<ElementId>, Error> {
        let selector = selector.trim();
        let valid_name = |name: &str| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        if let Some(html_id) = selector.strip_prefix('#') {
            if !valid_name(html_id) {
                return Err(Error::InvalidSelector(selector.to_string()));
            }
            return Ok(self
                .elements
                .iter()
                .position(|el| el.id.as_deref() == Some(html_id))
                .map(ElementId));
        }

        if !valid_name(selector) || !selector.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidSelector(selector.to_string()));
        }
        let tag = selector.to_ascii_lowercase();
        Ok(self
            .elements
            .iter()
            .position(|el| el.tag == tag)
            .map(ElementId))
    }
}

impl Index<ElementId> for Document {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }
}

impl IndexMut<ElementId> for Document {
    fn index_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }
}
