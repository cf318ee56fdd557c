use std::fmt;

use crate::{config::Key, geometry::Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    KeyDown,
    Focus,
    TouchStart,
    TouchMove,
    TouchEnd,
    Resize,
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenTarget<E> {
    /// The global window/viewport.
    Window,
    /// The popup's own surface.
    Surface,
    Element(E),
}

/// Where an event was dispatched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin<E> {
    /// Inside the popup's surface.
    Surface,
    Element(E),
    /// The window itself, e.g. a resize or a press on the bare viewport.
    Window,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventData {
    None,
    Key(Key),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent<E> {
    pub kind: EventKind,
    pub origin: Origin<E>,
    pub data: EventData,
}

impl<E> HostEvent<E> {
    pub fn new(kind: EventKind, origin: Origin<E>) -> Self {
        Self {
            kind,
            origin,
            data: EventData::None,
        }
    }

    pub fn key_down(origin: Origin<E>, key: Key) -> Self {
        Self {
            kind: EventKind::KeyDown,
            origin,
            data: EventData::Key(key),
        }
    }

    pub fn key(&self) -> Option<&Key> {
        match &self.data {
            EventData::Key(key) => Some(key),
            EventData::None => None,
        }
    }
}

/// Where the popup's arrow points from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Arrow {
    /// Near the popup's left edge, under the trigger's left edge.
    #[default]
    Left,
    /// `margin` pixels from the popup's right edge, after a right-justify.
    Right { margin: f32 },
    /// Moved right by `offset` to follow a shifted popup back to its trigger.
    Shifted { offset: f32 },
}

/// Declarative description of how the surface should look.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceView {
    pub shown: bool,
    pub top: f32,
    pub left: f32,
    pub arrow: Arrow,
}

impl SurfaceView {
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// The UI layer embedding a popup. It owns the element tree; the popup only
/// asks it for measurements, tells it which listeners to wire and hands it a
/// [`SurfaceView`] to render.
pub trait Host {
    type Element: Clone + PartialEq + fmt::Debug;

    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    fn surface_rect(&self) -> Rect;

    /// The body/viewport rectangle.
    fn document_rect(&self) -> Rect;

    /// The rectangle of the element's immediate container, if it has one.
    fn parent_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn listen(&mut self, target: &ListenTarget<Self::Element>, kind: EventKind) -> ListenerId;

    fn unlisten(&mut self, id: ListenerId);

    fn render(&mut self, view: &SurfaceView);
}

/// A host whose elements carry an editable text value.
pub trait InputHost: Host {
    fn value(&self, element: &Self::Element) -> String;

    fn set_value(&mut self, element: &Self::Element, value: &str);
}
