use std::fmt;

use log::{debug, warn};

use crate::{
    config::{CloseKeys, Key, PopupConfig},
    host::{EventKind, HostEvent, InputHost, ListenTarget, ListenerId, Origin},
    popup::{Action, Popup, ShowRequest},
};

/// Content shown inside an [`InputPopup`].
pub trait PopupContent {
    /// The popup opened; `value` is the input's current text.
    fn opened(&mut self, value: &str);
}

/// Requests the content sends back to its popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRequest {
    /// Replace the input's value. The popup stays open.
    Submit(String),
    Close,
}

/// A popup bound to one text input: opens on focus, closes on Tab, and lets its
/// content read and replace the input's value.
pub struct InputPopup<E, C> {
    input: E,
    popup: Popup<E>,
    content: C,
    focus_listener: ListenerId,
}

impl<E, C> fmt::Debug for InputPopup<E, C>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputPopup")
            .field("input", &self.input)
            .field("popup", &self.popup)
            .finish_non_exhaustive()
    }
}

impl<E, C> InputPopup<E, C>
where
    E: Clone + PartialEq + fmt::Debug,
    C: PopupContent,
{
    /// Bind a popup to `input`. Unless `config` names its own close keys, only Tab closes it.
    pub fn mount<H>(host: &mut H, input: E, content: C, mut config: PopupConfig) -> Self
    where
        H: InputHost<Element = E>,
    {
        if config.close_keys == CloseKeys::Any {
            config.close_keys = CloseKeys::Only(vec![Key::Tab]);
        }

        let focus_listener = host.listen(&ListenTarget::Element(input.clone()), EventKind::Focus);
        let popup = Popup::mount(host, config);

        Self {
            input,
            popup,
            content,
            focus_listener,
        }
    }

    pub fn unmount<H>(self, host: &mut H)
    where
        H: InputHost<Element = E>,
    {
        host.unlisten(self.focus_listener);
        self.popup.unmount(host);
    }

    pub fn input(&self) -> &E {
        &self.input
    }

    pub fn popup(&self) -> &Popup<E> {
        &self.popup
    }

    pub fn popup_mut(&mut self) -> &mut Popup<E> {
        &mut self.popup
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn open<H>(&mut self, host: &mut H)
    where
        H: InputHost<Element = E>,
    {
        if let Err(err) = self
            .popup
            .show(host, Some(ShowRequest::Element(self.input.clone())))
        {
            warn!("Failed to open input popup: {err}");
            return;
        }

        let value = host.value(&self.input);
        debug!("Input popup opened with value {value:?}");
        self.content.opened(&value);
    }

    pub fn close<H>(&mut self, host: &mut H)
    where
        H: InputHost<Element = E>,
    {
        self.popup.hide(host);
    }

    pub fn handle_event<H>(&mut self, host: &mut H, event: &HostEvent<E>) -> Action
    where
        H: InputHost<Element = E>,
    {
        if event.kind == EventKind::Focus {
            return match &event.origin {
                Origin::Element(element) if host.contains(&self.input, element) => {
                    self.open(host);
                    Action::Opened
                }
                _ => Action::None,
            };
        }

        self.popup.handle_event(host, event)
    }

    pub fn respond<H>(&mut self, host: &mut H, request: ContentRequest) -> Action
    where
        H: InputHost<Element = E>,
    {
        match request {
            ContentRequest::Submit(value) => {
                debug!("Content submitted {value:?}");
                host.set_value(&self.input, &value);
                Action::None
            }
            ContentRequest::Close => {
                if !self.popup.is_visible() {
                    return Action::None;
                }
                self.popup.hide(host);
                Action::Dismissed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHost, INPUT, OTHER};

    #[derive(Debug, Default)]
    struct Recorder {
        opened_with: Vec<String>,
    }

    impl PopupContent for Recorder {
        fn opened(&mut self, value: &str) {
            self.opened_with.push(value.to_owned());
        }
    }

    fn mounted(host: &mut FakeHost) -> InputPopup<u32, Recorder> {
        InputPopup::mount(host, INPUT, Recorder::default(), PopupConfig::default())
    }

    fn focus(element: u32) -> HostEvent<u32> {
        HostEvent::new(EventKind::Focus, Origin::Element(element))
    }

    #[test]
    fn mount_listens_for_focus_only() {
        let mut host = FakeHost::new();
        let popup = mounted(&mut host);

        assert_eq!(
            host.listener_count(ListenTarget::Element(INPUT), EventKind::Focus),
            1
        );
        assert_eq!(host.window_listeners(), 0);
        assert!(!popup.popup().is_visible());
    }

    #[test]
    fn focus_opens_and_hands_value_to_content() {
        let mut host = FakeHost::new();
        host.type_into(INPUT, "2024-01-31");
        let mut popup = mounted(&mut host);

        assert_eq!(popup.handle_event(&mut host, &focus(INPUT)), Action::Opened);

        assert!(popup.popup().is_visible());
        assert_eq!(popup.popup().target(), Some(&INPUT));
        assert_eq!(popup.content().opened_with, vec!["2024-01-31".to_owned()]);
    }

    #[test]
    fn focus_elsewhere_is_ignored() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);

        assert_eq!(popup.handle_event(&mut host, &focus(OTHER)), Action::None);
        assert!(!popup.popup().is_visible());
        assert!(popup.content().opened_with.is_empty());
    }

    #[test]
    fn refocus_reopens_without_leaking() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);

        popup.handle_event(&mut host, &focus(INPUT));
        popup.handle_event(&mut host, &focus(INPUT));

        assert_eq!(host.window_listener_count(EventKind::PointerDown), 1);
        assert_eq!(popup.content().opened_with.len(), 2);
    }

    #[test]
    fn tab_closes_but_other_keys_do_not() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);
        popup.handle_event(&mut host, &focus(INPUT));

        let letter = HostEvent::key_down(Origin::Element(INPUT), Key::Character("7".into()));
        assert_eq!(popup.handle_event(&mut host, &letter), Action::None);
        assert!(popup.popup().is_visible());

        let tab = HostEvent::key_down(Origin::Element(INPUT), Key::Tab);
        assert_eq!(popup.handle_event(&mut host, &tab), Action::Dismissed);
        assert!(!popup.popup().is_visible());
    }

    #[test]
    fn configured_close_keys_are_kept() {
        let mut host = FakeHost::new();
        let popup = InputPopup::mount(
            &mut host,
            INPUT,
            Recorder::default(),
            PopupConfig {
                close_keys: CloseKeys::Only(vec![Key::Escape]),
                ..PopupConfig::default()
            },
        );

        assert_eq!(
            popup.popup().config().close_keys,
            CloseKeys::Only(vec![Key::Escape])
        );
    }

    #[test]
    fn submit_writes_value_and_stays_open() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);
        popup.handle_event(&mut host, &focus(INPUT));

        let action = popup.respond(&mut host, ContentRequest::Submit("picked".into()));

        assert_eq!(action, Action::None);
        assert_eq!(host.value_of(INPUT), "picked");
        assert!(popup.popup().is_visible());
    }

    #[test]
    fn close_request_hides_once() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);
        popup.handle_event(&mut host, &focus(INPUT));

        assert_eq!(popup.respond(&mut host, ContentRequest::Close), Action::Dismissed);
        assert_eq!(popup.respond(&mut host, ContentRequest::Close), Action::None);
        assert_eq!(host.window_listeners(), 0);
    }

    #[test]
    fn clicks_inside_content_keep_popup_open() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);
        popup.handle_event(&mut host, &focus(INPUT));

        let press = HostEvent::new(EventKind::PointerDown, Origin::Surface);
        assert_eq!(popup.handle_event(&mut host, &press), Action::StopPropagation);

        let outside = HostEvent::new(EventKind::PointerDown, Origin::Element(OTHER));
        assert_eq!(popup.handle_event(&mut host, &outside), Action::Dismissed);
    }

    #[test]
    fn unmount_releases_focus_listener() {
        let mut host = FakeHost::new();
        let mut popup = mounted(&mut host);
        popup.open(&mut host);

        popup.unmount(&mut host);

        assert!(host.listeners.is_empty());
    }
}
