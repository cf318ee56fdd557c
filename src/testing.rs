use std::{
    cell::Cell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use crate::{
    geometry::Rect,
    host::{EventKind, Host, InputHost, ListenTarget, ListenerId, SurfaceView},
};

pub const TRIGGER: u32 = 1;
pub const INPUT: u32 = 2;
pub const OTHER: u32 = 3;

pub struct FakeHost {
    rects: HashMap<u32, Rect>,
    parents: HashMap<u32, u32>,
    values: HashMap<u32, String>,
    surface: Rect,
    document: Rect,
    next_id: u64,
    pub listeners: BTreeMap<ListenerId, (ListenTarget<u32>, EventKind)>,
    pub renders: Vec<SurfaceView>,
    pub unlisten_calls: usize,
    live: Rc<Cell<usize>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            rects: HashMap::from([
                (TRIGGER, Rect::new(50.0, 100.0, 80.0, 30.0)),
                (INPUT, Rect::new(20.0, 40.0, 160.0, 24.0)),
                (OTHER, Rect::new(10.0, 300.0, 60.0, 20.0)),
            ]),
            parents: HashMap::new(),
            values: HashMap::new(),
            surface: Rect::new(0.0, 0.0, 120.0, 40.0),
            document: Rect::new(0.0, 0.0, 300.0, 600.0),
            next_id: 0,
            listeners: BTreeMap::new(),
            renders: Vec::new(),
            unlisten_calls: 0,
            live: Rc::new(Cell::new(0)),
        }
    }

    pub fn add_child(&mut self, parent: u32, child: u32) {
        let rect = self.rect(parent);
        self.rects.insert(child, Rect::new(rect.left + 2.0, rect.top + 2.0, 10.0, 10.0));
        self.parents.insert(child, parent);
    }

    pub fn set_parent(&mut self, child: u32, parent: u32, rect: Rect) {
        self.rects.insert(parent, rect);
        self.parents.insert(child, parent);
    }

    pub fn set_rect(&mut self, element: u32, rect: Rect) {
        self.rects.insert(element, rect);
    }

    pub fn type_into(&mut self, element: u32, value: &str) {
        self.values.insert(element, value.to_owned());
    }

    pub fn rect(&self, element: u32) -> Rect {
        self.rects.get(&element).copied().unwrap_or_default()
    }

    pub fn value_of(&self, element: u32) -> &str {
        self.values.get(&element).map_or("", String::as_str)
    }

    pub fn last_render(&self) -> &SurfaceView {
        self.renders.last().expect("nothing rendered yet")
    }

    pub fn window_listeners(&self) -> usize {
        self.listeners
            .values()
            .filter(|(target, _)| *target == ListenTarget::Window)
            .count()
    }

    pub fn window_listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .values()
            .filter(|(target, k)| *target == ListenTarget::Window && *k == kind)
            .count()
    }

    pub fn element_listeners(&self, element: u32) -> usize {
        self.listeners
            .values()
            .filter(|(target, _)| *target == ListenTarget::Element(element))
            .count()
    }

    pub fn listener_count(&self, target: ListenTarget<u32>, kind: EventKind) -> usize {
        self.listeners
            .values()
            .filter(|(t, k)| *t == target && *k == kind)
            .count()
    }

    /// Live view of the registered listener count, readable from callbacks.
    pub fn live_listener_counter(&self) -> Rc<Cell<usize>> {
        self.live.clone()
    }
}

impl Host for FakeHost {
    type Element = u32;

    fn bounding_rect(&self, element: &u32) -> Rect {
        self.rect(*element)
    }

    fn surface_rect(&self) -> Rect {
        self.surface
    }

    fn document_rect(&self) -> Rect {
        self.document
    }

    fn parent_rect(&self, element: &u32) -> Option<Rect> {
        self.parents.get(element).map(|parent| self.rect(*parent))
    }

    fn contains(&self, ancestor: &u32, node: &u32) -> bool {
        let mut current = Some(*node);
        while let Some(element) = current {
            if element == *ancestor {
                return true;
            }
            current = self.parents.get(&element).copied();
        }
        false
    }

    fn listen(&mut self, target: &ListenTarget<u32>, kind: EventKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, (target.clone(), kind));
        self.live.set(self.listeners.len());
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.unlisten_calls += 1;
        self.listeners.remove(&id);
        self.live.set(self.listeners.len());
    }

    fn render(&mut self, view: &SurfaceView) {
        self.renders.push(*view);
    }
}

impl InputHost for FakeHost {
    fn value(&self, element: &u32) -> String {
        self.value_of(*element).to_owned()
    }

    fn set_value(&mut self, element: &u32, value: &str) {
        self.values.insert(*element, value.to_owned());
    }
}
