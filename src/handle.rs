use egui::{CursorIcon, Id, Response, Sense, Ui};

use crate::sensor::{PendingActivation, PointerKind, Press};

/// [Handle::ui] is used to draw the drag handle
pub(crate) struct Handle<'a, T> {
    pub(crate) item: &'a T,
    pub(crate) item_id: Id,
    /// `None` for placeholder and overlay copies, which must not start drags
    pub(crate) press: Option<&'a mut Press<T>>,
}

/// The part of the card thats draggable. Accessible through [`SortableItem::handle`](crate::SortableItem::handle)
impl<'a, T: Clone> Handle<'a, T> {
    pub(crate) fn ui(self, ui: &mut Ui, contents: impl FnOnce(&mut Ui)) -> Response {
        let Some(press) = self.press else {
            // if this is meant to be a placeholder ui, dont do the draggable stuff.
            return ui.scope(contents).response;
        };

        // add contents to ui
        let added_contents = ui.scope(contents);
        let handle_response = ui.interact(
            added_contents.response.rect,
            self.item_id.with("drag_handle"),
            Sense::drag(),
        );

        // if pointer hovering above this widget, update pointer icon
        if handle_response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        // a press on the handle is handed to the grid's sensors, which decide when it becomes a drag
        if handle_response.is_pointer_button_down_on() && press.is_idle() {
            if let Some(origin) = handle_response.interact_pointer_pos() {
                let (kind, now) = ui.input(|i| {
                    let kind = if i.any_touches() {
                        PointerKind::Touch
                    } else {
                        PointerKind::Mouse
                    };
                    (kind, i.time)
                });
                *press = Press::Pending(PendingActivation::new(
                    self.item.clone(),
                    kind,
                    origin,
                    now,
                ));
            }
        }

        handle_response
    }
}
