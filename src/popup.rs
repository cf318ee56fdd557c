use std::{fmt, mem, time::{Duration, Instant}};

use log::{debug, error, info, warn};

use crate::{
    animation::{Reveal, RevealFrame},
    config::{CloseKeys, PlacementConfig, PopupConfig, ReferenceFrame},
    host::{Arrow, EventKind, Host, HostEvent, ListenTarget, ListenerId, Origin, SurfaceView},
    placement::{Adjustment, Geometry, Placement, place},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupError {
    /// `show` was called without an element to anchor to.
    InvalidTarget,
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget => write!(f, "popup show requires a target element"),
        }
    }
}

impl std::error::Error for PopupError {}

/// What to anchor the popup to.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowRequest<E> {
    Element(E),
    /// An event whose target element becomes the trigger.
    Event(HostEvent<E>),
}

impl<E> ShowRequest<E> {
    fn into_target(self) -> Option<E> {
        match self {
            ShowRequest::Element(element) => Some(element),
            ShowRequest::Event(event) => match event.origin {
                Origin::Element(element) => Some(element),
                Origin::Surface | Origin::Window => None,
            },
        }
    }
}

/// Outcome of routing a host event through the popup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    /// The event hit a prevent-close listener and must not reach the window.
    StopPropagation,
    Opened,
    Dismissed,
    Repositioned(Placement),
}

#[derive(Debug, Clone, PartialEq)]
enum State<E> {
    Hidden,
    Visible { target: E },
}

#[derive(Debug, Clone, PartialEq)]
struct Registration<E> {
    id: ListenerId,
    target: ListenTarget<E>,
    kind: EventKind,
}

/// A popup anchored beneath one trigger element at a time.
pub struct Popup<E> {
    config: PopupConfig,
    state: State<E>,
    placement: Option<Placement>,
    arrow_adjustment: Option<f32>,
    /// Prevent-close listeners on the surface, alive from mount to unmount.
    surface_listeners: Vec<Registration<E>>,
    /// Dismissal listeners, alive while visible.
    listeners: Vec<Registration<E>>,
    touch_moved: bool,
    reveal: Option<Reveal>,
    on_dismiss: Option<Box<dyn FnMut()>>,
}

impl<E> fmt::Debug for Popup<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("state", &self.state)
            .field("placement", &self.placement)
            .field("arrow_adjustment", &self.arrow_adjustment)
            .field("listeners", &self.listeners.len())
            .field("touch_moved", &self.touch_moved)
            .finish_non_exhaustive()
    }
}

impl<E> Popup<E>
where
    E: Clone + PartialEq + fmt::Debug,
{
    pub fn mount<H>(host: &mut H, mut config: PopupConfig) -> Self
    where
        H: Host<Element = E>,
    {
        if let Err(err) = config.placement.validate() {
            warn!("Invalid placement config, using defaults: {err:#}");
            config.placement = PlacementConfig::default();
        }

        let surface_listeners = [EventKind::PointerDown, EventKind::TouchEnd]
            .into_iter()
            .map(|kind| register(host, ListenTarget::Surface, kind))
            .collect();

        host.render(&SurfaceView::hidden());
        debug!("Popup mounted with {config:?}");

        Self {
            config,
            state: State::Hidden,
            placement: None,
            arrow_adjustment: None,
            surface_listeners,
            listeners: Vec::new(),
            touch_moved: false,
            reveal: None,
            on_dismiss: None,
        }
    }

    /// Hide the popup and drop the surface listeners registered by [`Popup::mount`].
    pub fn unmount<H>(mut self, host: &mut H)
    where
        H: Host<Element = E>,
    {
        self.hide(host);
        for registration in self.surface_listeners.drain(..) {
            host.unlisten(registration.id);
        }
        debug!("Popup unmounted");
    }

    /// Called on every dismissal of a visible popup, before its listeners are removed.
    pub fn on_dismiss(&mut self, callback: impl FnMut() + 'static) {
        self.on_dismiss = Some(Box::new(callback));
    }

    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, State::Visible { .. })
    }

    pub fn target(&self) -> Option<&E> {
        match &self.state {
            State::Visible { target } => Some(target),
            State::Hidden => None,
        }
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn arrow_adjustment(&self) -> Option<f32> {
        self.arrow_adjustment
    }

    pub fn reveal_at(&self, now: Instant) -> Option<RevealFrame> {
        self.reveal.map(|reveal| reveal.frame_at(now))
    }

    pub fn show<H>(
        &mut self,
        host: &mut H,
        request: Option<ShowRequest<E>>,
    ) -> Result<(), PopupError>
    where
        H: Host<Element = E>,
    {
        let Some(target) = request.and_then(ShowRequest::into_target) else {
            error!("Popup show requires a target element");
            return Err(PopupError::InvalidTarget);
        };

        if self.is_visible() {
            debug!("Popup already visible, closing it before showing again");
            self.hide(host);
        }

        info!("Showing popup for {target:?}");
        self.state = State::Visible {
            target: target.clone(),
        };

        // The surface has to be laid out before it can be measured.
        host.render(&SurfaceView {
            shown: true,
            ..SurfaceView::hidden()
        });
        self.reposition(host);

        let element = ListenTarget::Element(target);
        self.listeners = vec![
            register(host, element.clone(), EventKind::PointerDown),
            register(host, element.clone(), EventKind::TouchEnd),
            register(host, element, EventKind::KeyDown),
            register(host, ListenTarget::Window, EventKind::PointerDown),
            register(host, ListenTarget::Window, EventKind::TouchStart),
            register(host, ListenTarget::Window, EventKind::TouchMove),
            register(host, ListenTarget::Window, EventKind::TouchEnd),
            register(host, ListenTarget::Window, EventKind::Resize),
        ];
        self.touch_moved = false;
        self.reveal = Some(Reveal::new(
            Instant::now(),
            Duration::from_millis(self.config.animation_ms),
            self.config.slide_distance,
        ));

        Ok(())
    }

    pub fn hide<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E>,
    {
        if !self.is_visible() {
            return;
        }

        if let Some(callback) = self.on_dismiss.as_mut() {
            callback();
        }

        for registration in self.listeners.drain(..) {
            host.unlisten(registration.id);
        }

        self.arrow_adjustment = None;
        self.placement = None;
        self.touch_moved = false;
        self.reveal = None;
        host.render(&SurfaceView::hidden());

        if let State::Visible { target } = mem::replace(&mut self.state, State::Hidden) {
            info!("Popup hidden, released {target:?}");
        }
    }

    /// Measure and place the surface again. Does nothing while hidden.
    pub fn reposition<H>(&mut self, host: &mut H) -> Option<Placement>
    where
        H: Host<Element = E>,
    {
        let State::Visible { target } = &self.state else {
            return None;
        };

        let trigger = host.bounding_rect(target);
        let container = match self.config.placement.frame {
            ReferenceFrame::Document => host.document_rect(),
            ReferenceFrame::Parent => host.parent_rect(target).unwrap_or_else(|| {
                debug!("Trigger {target:?} has no parent, placing against the document");
                host.document_rect()
            }),
        };
        let geometry = Geometry {
            trigger,
            surface: host.surface_rect(),
            container,
        };

        let placement = place(&geometry, &self.config.placement);
        debug!("Placed popup at {placement:?} from {geometry:?}");

        let arrow = match placement.adjustment {
            Adjustment::None => Arrow::Left,
            Adjustment::RightJustified => Arrow::Right {
                margin: self.config.placement.arrow_margin,
            },
            Adjustment::Shifted(offset) => Arrow::Shifted { offset },
        };
        host.render(&SurfaceView {
            shown: true,
            top: placement.top,
            left: placement.left,
            arrow,
        });

        self.arrow_adjustment = placement.arrow_adjustment();
        self.placement = Some(placement);

        Some(placement)
    }

    /// Swap the configuration, placing a visible popup again under the new rules.
    pub fn update_config<H>(&mut self, host: &mut H, config: PopupConfig)
    where
        H: Host<Element = E>,
    {
        if let Err(err) = config.placement.validate() {
            warn!("Invalid placement config, keeping the current one: {err:#}");
            return;
        }

        self.config = config;
        self.reposition(host);
    }

    /// Route an event the host received on one of the popup's listeners.
    pub fn handle_event<H>(&mut self, host: &mut H, event: &HostEvent<E>) -> Action
    where
        H: Host<Element = E>,
    {
        if matches!(event.kind, EventKind::PointerDown | EventKind::TouchEnd)
            && self.prevents_close(host, &event.origin, event.kind)
        {
            return Action::StopPropagation;
        }

        if event.kind == EventKind::KeyDown {
            return self.handle_key_down(host, event);
        }

        if !self.listening(&ListenTarget::Window, event.kind) {
            return Action::None;
        }

        match event.kind {
            EventKind::PointerDown => {
                debug!("Pointer down outside popup, dismissing");
                self.hide(host);
                Action::Dismissed
            }
            EventKind::TouchStart => {
                self.touch_moved = false;
                Action::None
            }
            EventKind::TouchMove => {
                self.touch_moved = true;
                Action::None
            }
            EventKind::TouchEnd => {
                if mem::take(&mut self.touch_moved) {
                    debug!("Touch moved before ending, keeping popup open");
                    Action::None
                } else {
                    debug!("Tap outside popup, dismissing");
                    self.hide(host);
                    Action::Dismissed
                }
            }
            EventKind::Resize => self
                .reposition(host)
                .map_or(Action::None, Action::Repositioned),
            EventKind::KeyDown | EventKind::Focus => Action::None,
        }
    }

    fn handle_key_down<H>(&mut self, host: &mut H, event: &HostEvent<E>) -> Action
    where
        H: Host<Element = E>,
    {
        let Origin::Element(origin) = &event.origin else {
            return Action::None;
        };
        if !self.listening_on_element(host, origin, EventKind::KeyDown) {
            return Action::None;
        }

        let closes = match event.key() {
            Some(key) => self.config.close_keys.closes_on(key),
            None => matches!(self.config.close_keys, CloseKeys::Any),
        };
        if closes {
            debug!("Key {:?} on trigger, dismissing", event.key());
            self.hide(host);
            Action::Dismissed
        } else {
            Action::None
        }
    }

    fn prevents_close<H>(&self, host: &H, origin: &Origin<E>, kind: EventKind) -> bool
    where
        H: Host<Element = E>,
    {
        match origin {
            Origin::Surface => self
                .surface_listeners
                .iter()
                .any(|registration| registration.kind == kind),
            Origin::Element(element) => self.listening_on_element(host, element, kind),
            Origin::Window => false,
        }
    }

    fn listening(&self, target: &ListenTarget<E>, kind: EventKind) -> bool {
        self.listeners
            .iter()
            .any(|registration| registration.kind == kind && &registration.target == target)
    }

    fn listening_on_element<H>(&self, host: &H, element: &E, kind: EventKind) -> bool
    where
        H: Host<Element = E>,
    {
        self.listeners.iter().any(|registration| {
            registration.kind == kind
                && match &registration.target {
                    ListenTarget::Element(target) => host.contains(target, element),
                    ListenTarget::Window | ListenTarget::Surface => false,
                }
        })
    }
}

fn register<H>(
    host: &mut H,
    target: ListenTarget<H::Element>,
    kind: EventKind,
) -> Registration<H::Element>
where
    H: Host,
{
    let id = host.listen(&target, kind);
    Registration { id, target, kind }
}
