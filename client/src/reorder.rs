//! Drag-to-reorder for ordered lists: insertion markers, the move itself,
//! and the gesture state machine fed by pointer and touch adapters.
//!
//! Both input styles are translated into the same [`GestureEvent`] stream, so
//! the list is only ever moved by [`reorder`]. Nothing is persisted here; the
//! owner of the list decides when to save.

/// Which side of the hovered item the dragged item lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

/// Drop target: an item index plus the side of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionMarker {
    pub index: usize,
    pub position: InsertPosition,
}

/// Vertical bounds of a rendered list item, tracked for touch hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ItemRect {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// `Before` when `pointer_y` is above the item's vertical midpoint.
#[must_use]
pub fn marker_for(hovered: usize, pointer_y: f64, item_top: f64, item_height: f64) -> InsertionMarker {
    let position = if pointer_y < item_top + item_height / 2.0 {
        InsertPosition::Before
    } else {
        InsertPosition::After
    };
    InsertionMarker { index: hovered, position }
}

/// Move the item at `from` to the slot described by `marker`; the others
/// shift and keep their relative order. Returns `false` (and leaves the list
/// alone) when `from` is out of range.
pub fn reorder<T>(list: &mut Vec<T>, from: usize, marker: InsertionMarker) -> bool {
    if from >= list.len() {
        return false;
    }
    let item = list.remove(from);
    let mut target = match marker.position {
        InsertPosition::Before => marker.index,
        InsertPosition::After => marker.index.saturating_add(1),
    };
    if target > from {
        target -= 1;
    }
    list.insert(target.min(list.len()), item);
    true
}

// =============================================================================
// GESTURE STATE
// =============================================================================

/// Device-independent gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Pick up the item at this index.
    Start(usize),
    /// The pointer is over an item; show this marker.
    Hover(InsertionMarker),
    /// Release: apply the move if a marker is showing.
    Drop,
    /// Abort without moving.
    Cancel,
}

/// Tracks one drag from pick-up to release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReorderGesture {
    dragged: Option<usize>,
    marker: Option<InsertionMarker>,
}

impl ReorderGesture {
    #[must_use]
    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.marker.map(|m| m.index)
    }

    /// Marker to render while dragging.
    #[must_use]
    pub fn marker(&self) -> Option<InsertionMarker> {
        self.marker
    }

    /// Advance the gesture. Returns `true` when `list` was reordered.
    pub fn apply<T>(&mut self, event: GestureEvent, list: &mut Vec<T>) -> bool {
        match event {
            GestureEvent::Start(index) => {
                *self = Self::default();
                if index < list.len() {
                    self.dragged = Some(index);
                }
                false
            }
            GestureEvent::Hover(marker) => {
                if self.dragged.is_some() {
                    self.marker = Some(marker);
                }
                false
            }
            GestureEvent::Drop => {
                let finished = std::mem::take(self);
                match (finished.dragged, finished.marker) {
                    (Some(from), Some(marker)) => reorder(list, from, marker),
                    _ => false,
                }
            }
            GestureEvent::Cancel => {
                *self = Self::default();
                false
            }
        }
    }

    /// Translate a raw device event through `input` and apply it.
    pub fn feed<I: GestureInput, T>(&mut self, input: &mut I, raw: I::Raw, list: &mut Vec<T>) -> bool {
        match input.translate(raw) {
            Some(event) => self.apply(event, list),
            None => false,
        }
    }
}

// =============================================================================
// ADAPTERS
// =============================================================================

/// A source of raw input that can be mapped onto gesture steps.
pub trait GestureInput {
    type Raw;

    /// `None` for raw events that do not advance the gesture.
    fn translate(&mut self, raw: Self::Raw) -> Option<GestureEvent>;
}

/// Native drag-and-drop style events; the platform reports which item is
/// under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    DragStart { index: usize },
    DragOver { index: usize, y: f64, rect: ItemRect },
    Drop,
    Cancel,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PointerAdapter;

impl PointerAdapter {
    #[must_use]
    pub fn drag_start(index: usize) -> PointerEvent {
        PointerEvent::DragStart { index }
    }

    #[must_use]
    pub fn drag_over(index: usize, y: f64, rect: ItemRect) -> PointerEvent {
        PointerEvent::DragOver { index, y, rect }
    }
}

impl GestureInput for PointerAdapter {
    type Raw = PointerEvent;

    fn translate(&mut self, raw: PointerEvent) -> Option<GestureEvent> {
        Some(match raw {
            PointerEvent::DragStart { index } => GestureEvent::Start(index),
            PointerEvent::DragOver { index, y, rect } => {
                GestureEvent::Hover(marker_for(index, y, rect.top, rect.height))
            }
            PointerEvent::Drop => GestureEvent::Drop,
            PointerEvent::Cancel => GestureEvent::Cancel,
        })
    }
}

/// Touch events carry only coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Start { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    End,
    Cancel,
}

/// Hit-tests touch coordinates against the item bounds it was given.
#[derive(Debug, Clone, Default)]
pub struct TouchAdapter {
    rects: Vec<ItemRect>,
}

impl TouchAdapter {
    #[must_use]
    pub fn new(rects: Vec<ItemRect>) -> Self {
        Self { rects }
    }

    /// Replace the tracked bounds after a re-layout.
    pub fn track(&mut self, rects: Vec<ItemRect>) {
        self.rects = rects;
    }

    fn hit(&self, x: f64, y: f64) -> Option<(usize, ItemRect)> {
        self.rects
            .iter()
            .enumerate()
            .find(|(_, r)| r.contains(x, y))
            .map(|(i, r)| (i, *r))
    }
}

impl GestureInput for TouchAdapter {
    type Raw = TouchEvent;

    fn translate(&mut self, raw: TouchEvent) -> Option<GestureEvent> {
        match raw {
            TouchEvent::Start { x, y } => self.hit(x, y).map(|(index, _)| GestureEvent::Start(index)),
            TouchEvent::Move { x, y } => self
                .hit(x, y)
                .map(|(index, rect)| GestureEvent::Hover(marker_for(index, y, rect.top, rect.height))),
            TouchEvent::End => Some(GestureEvent::Drop),
            TouchEvent::Cancel => Some(GestureEvent::Cancel),
        }
    }
}

#[cfg(test)]
#[path = "reorder_test.rs"]
mod tests;
