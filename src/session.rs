use egui::{Pos2, Rect, Vec2};

/// State of a single drag gesture. Created when the drag starts and dropped when it ends or is
/// cancelled, so nothing about a finished drag can leak into the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<T> {
    active: T,
    source_index: usize,
    origin: Pos2,
    pointer: Pos2,
    /// Pointer position relative to the origin of the dragged card when dragging began
    grab_offset: Vec2,
    active_rect: Rect,
    over: Option<T>,
}

impl<T> DragSession<T> {
    pub fn new(active: T, source_index: usize, pointer: Pos2, active_rect: Rect) -> Self {
        Self {
            active,
            source_index,
            origin: pointer,
            pointer,
            grab_offset: active_rect.min - pointer,
            active_rect,
            over: None,
        }
    }

    pub fn active(&self) -> &T {
        &self.active
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn update_pointer(&mut self, pointer: Pos2) {
        self.pointer = pointer;
    }

    /// How far the pointer travelled since the drag started.
    pub fn delta(&self) -> Vec2 {
        self.pointer - self.origin
    }

    /// Where the floating copy of the dragged card is drawn.
    pub fn overlay_rect(&self) -> Rect {
        Rect::from_min_size(self.pointer + self.grab_offset, self.active_rect.size())
    }

    pub fn over(&self) -> Option<&T> {
        self.over.as_ref()
    }

    pub fn set_over(&mut self, over: Option<T>) {
        self.over = over;
    }
}
