pub mod config;
pub mod css;
pub mod dom;
pub mod easing;
pub mod error;
pub mod events;
pub mod indicator;
pub mod layers;
pub mod slideshow;
pub mod transition;

pub use config::Configuration;
pub use dom::{Document, ElementId, Rect};
pub use error::Error;
pub use events::{SlideCommand, SlideEvent};
pub use slideshow::{CommandOutcome, ContainerRef, Slidery};
