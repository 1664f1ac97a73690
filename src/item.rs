use egui::{Id, Response, Ui};
use std::hash::Hash;

use crate::animation::{Transform, Transition};
use crate::handle::Handle;
use crate::sensor::Press;

pub trait DragDropItem {
    fn id(&self) -> Id;
}

impl<T: Hash> DragDropItem for T {
    fn id(&self) -> Id {
        Id::new(self)
    }
}

/// Transform and transition of a card for the current frame, the same pair a browser would get as
/// `transform` and `transition` style properties.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemStyle {
    pub transform: Transform,
    /// Present while sorting so cards glide into their new slots.
    pub transition: Option<Transition>,
}

impl ItemStyle {
    pub fn to_css(&self) -> (String, Option<String>) {
        (
            self.transform.to_css_string(),
            self.transition.map(|t| t.to_css("transform")),
        )
    }
}

/// One entry of the grid as seen by the card renderer.
///
/// The same item is handed out up to twice per frame: once for its place in the grid and, while
/// it is dragged, once more for the overlay following the pointer (`is_overlay`).
pub struct SortableItem<'a, T> {
    pub(crate) item: &'a T,
    pub(crate) item_id: Id,
    pub(crate) index: usize,
    pub(crate) style: ItemStyle,
    pub(crate) is_dragging: bool,
    pub(crate) is_overlay: bool,
    pub(crate) press: Option<&'a mut Press<T>>,
}

impl<'a, T: Clone> SortableItem<'a, T> {
    pub fn item(&self) -> &T {
        self.item
    }

    pub fn id(&self) -> Id {
        self.item_id
    }

    /// Position in the store's current order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn style(&self) -> ItemStyle {
        self.style
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_overlay(&self) -> bool {
        self.is_overlay
    }

    /// Draws `contents` as the drag handle of this card. Only presses on the handle start a drag.
    pub fn handle(&mut self, ui: &mut Ui, contents: impl FnOnce(&mut Ui)) -> Response {
        Handle {
            item: self.item,
            item_id: self.item_id,
            press: self.press.as_deref_mut(),
        }
        .ui(ui, contents)
    }
}
