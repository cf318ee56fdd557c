pub mod animation;
pub mod config;
pub mod geometry;
pub mod host;
pub mod input;
pub mod logging;
pub mod placement;
pub mod popup;

#[cfg(test)]
mod testing;

pub use config::{Config, PopupConfig, read_config};
pub use geometry::Rect;
pub use host::{Host, HostEvent, InputHost, SurfaceView};
pub use input::{ContentRequest, InputPopup, PopupContent};
pub use placement::{Placement, place};
pub use popup::{Action, Popup, PopupError, ShowRequest};
