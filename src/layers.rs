use tracing::debug;

use crate::config::Configuration;
use crate::dom::{Document, ElementId, Length, Position, Rect};
use crate::error::Error;
use crate::transition::resting_z_index;

/// One absolutely positioned element per configured image, in rotation order.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    ids: Vec<ElementId>,
}

impl LayerSet {
    pub fn build(
        doc: &mut Document,
        container: ElementId,
        cfg: &Configuration,
        rect: Rect,
    ) -> Result<Self, Error> {
        let len = cfg.images.len();
        let mut ids = Vec::with_capacity(len);
        for (i, url) in cfg.images.iter().enumerate() {
            let id = doc.create_element("div");
            let style = doc.style_mut(id);
            style.set("background-image", format!("url(\"{url}\")"));
            style.set("background-repeat", cfg.image_repeat.clone());
            style.position = Position::Absolute;
            style.top = Some(Length::ZERO);
            style.left = Some(Length::ZERO);
            style.z_index = Some(resting_z_index(cfg.z_index, len, 0, i));
            doc.append_child(container, id)?;
            ids.push(id);
        }
        let layers = Self { ids };
        layers.fit(doc, cfg, rect);
        debug!(count = len, "image layers created");
        Ok(layers)
    }

    /// Applies size-dependent styles for a container of size `rect`.
    pub fn fit(&self, doc: &mut Document, cfg: &Configuration, rect: Rect) {
        for id in &self.ids {
            let style = doc.style_mut(*id);
            style.set("background-size", cfg.image_size.clone());
            style.set("background-position", cfg.image_position.clone());
            style.width = Some(Length::Px(rect.width));
            style.height = Some(Length::Px(rect.height));
        }
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
