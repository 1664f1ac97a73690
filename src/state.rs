use egui::{
    self, Align, CursorIcon, Id, Key, Layout, Order, Pos2, Rect, Sense, Shape, Ui, UiBuilder, Vec2,
};
use std::{collections::HashMap, fmt::Debug};
use tracing::{debug, info, warn};

use crate::animation::{
    animate_layout_changes, LayoutAnimationArgs, LayoutTracker, Placement, Reveal, Transform,
};
use crate::collision::{ClosestCenter, CollisionDetection};
use crate::config::GridConfig;
use crate::grid::GridLayout;
use crate::item::{DragDropItem, ItemStyle, SortableItem};
use crate::sensor::{Activation, Press};
use crate::session::DragSession;
use crate::store::OrderStore;
use crate::strategy::{RectSorting, SortingStrategy};
use crate::utils::{drop_indices, moved, DragIndices};

/// What happened during a frame of [`ReorderGrid::ui`] or one of the event handlers.
///
/// `CurrentDrag` is reported every frame a drag is in progress. `Completed` is reported once when a
/// drop changed the order; by then the store already holds the new order.
#[derive(Debug, Clone, PartialEq)]
pub enum DragDropResponse<T> {
    NoDrag,
    CurrentDrag { active: T, over: Option<T> },
    Completed(DragIndices),
    /// The drag ended without changing the order.
    Unchanged,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragStartEvent<T> {
    pub active: T,
    /// Index of `active` in the current order.
    pub index: usize,
    pub pointer: Pos2,
    /// Slot of the dragged card when the drag began.
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragEndEvent<T> {
    pub active: T,
    pub over: Option<T>,
}

/// The slice of egui input the sensors look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub time: f64,
    pub pointer: Option<Pos2>,
    pub released: bool,
    pub escape: bool,
    pub focused: bool,
}

impl FrameInput {
    pub fn from_ui(ui: &Ui) -> Self {
        ui.input(|i| Self {
            time: i.time,
            pointer: i.pointer.latest_pos(),
            released: i.pointer.any_released(),
            escape: i.key_pressed(Key::Escape),
            focused: i.focused,
        })
    }
}

/// The overlay gliding from where it was dropped into the slot of its item.
#[derive(Debug, Clone, PartialEq)]
pub struct DropAnimation<T> {
    item: T,
    from: Rect,
    started_at: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase<T> {
    Idle,
    Dragging(DragSession<T>),
    Dropping(DropAnimation<T>),
}

impl<T> Default for DragPhase<T> {
    fn default() -> Self {
        Self::Idle
    }
}

/// [ReorderGrid] stores the state of the drag & drop grid.
///
/// The order itself lives in an [`OrderStore`] owned by the caller and is only ever replaced as a
/// whole after a successful drop.
///
/// # Example
/// ```rust
/// use egui_dnd_grid::{DragDropResponse, ReorderGrid};
///
/// fn sources_ui(ui: &mut egui::Ui, grid: &mut ReorderGrid<String>, sources: &mut Vec<String>) {
///     let response = grid.ui(ui, sources, |ui, mut card| {
///         ui.horizontal(|ui| {
///             card.handle(ui, |ui| {
///                 ui.label("::");
///             });
///             ui.label(card.item().as_str());
///         });
///     });
///     if let DragDropResponse::Completed(indices) = response {
///         println!("moved {} to {}", indices.source, indices.target);
///     }
/// }
/// ```
pub struct ReorderGrid<T> {
    config: GridConfig,
    collision: Box<dyn CollisionDetection>,
    strategy: Box<dyn SortingStrategy>,
    phase: DragPhase<T>,
    press: Press<T>,
    /// Measured card heights from the previous frame
    heights: HashMap<Id, f32>,
    tracker: LayoutTracker,
    mounted_at: Option<f64>,
    last_order: Vec<Id>,
    /// The card that was dropped during the previous frame
    just_dropped: Option<Id>,
}

impl<T> Default for ReorderGrid<T> {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl<T> ReorderGrid<T> {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            collision: Box::new(ClosestCenter),
            strategy: Box::new(RectSorting),
            phase: DragPhase::Idle,
            press: Press::Idle,
            heights: HashMap::new(),
            tracker: LayoutTracker::default(),
            mounted_at: None,
            last_order: Vec::new(),
            just_dropped: None,
        }
    }

    pub fn with_collision(mut self, collision: impl CollisionDetection + 'static) -> Self {
        self.collision = Box::new(collision);
        self
    }

    pub fn with_strategy(mut self, strategy: impl SortingStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn phase(&self) -> &DragPhase<T> {
        &self.phase
    }

    /// The item being dragged right now. Cleared as soon as the drag ends or is cancelled.
    pub fn active_id(&self) -> Option<&T> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session.active()),
            _ => None,
        }
    }

    pub fn is_overlay_visible(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    /// Ends the current session, if any, and starts the drop animation for it.
    fn finish_session(&mut self) -> Option<DragSession<T>>
    where
        T: Clone,
    {
        let DragPhase::Dragging(session) = std::mem::take(&mut self.phase) else {
            return None;
        };
        if self.config.drop_animation.duration_ms > 0 {
            self.phase = DragPhase::Dropping(DropAnimation {
                item: session.active().clone(),
                from: session.overlay_rect(),
                started_at: None,
            });
        }
        Some(session)
    }
}

impl<T> ReorderGrid<T>
where
    T: DragDropItem + Clone + PartialEq + Debug,
{
    pub fn on_drag_start(&mut self, event: DragStartEvent<T>) {
        if let DragPhase::Dragging(session) = &self.phase {
            debug!(
                active = ?session.active(),
                ignored = ?event.active,
                "drag already in progress"
            );
            return;
        }

        debug!(active = ?event.active, index = event.index, "drag started");
        self.press = Press::Consumed;
        self.phase = DragPhase::Dragging(DragSession::new(
            event.active,
            event.index,
            event.pointer,
            event.rect,
        ));
    }

    pub fn on_drag_over(&mut self, over: Option<T>) {
        if let DragPhase::Dragging(session) = &mut self.phase {
            if session.over() != over.as_ref() {
                debug!(active = ?session.active(), over = ?over, "drag target changed");
            }
            session.set_over(over);
        }
    }

    /// Moves `event.active` to the position of `event.over` and replaces the store's order with the
    /// result. Dropping onto nothing, onto itself or onto an item the store no longer knows leaves
    /// the order as it is.
    pub fn on_drag_end<S>(&mut self, event: DragEndEvent<T>, store: &mut S) -> DragDropResponse<T>
    where
        S: OrderStore<T> + ?Sized,
    {
        if let Some(session) = self.finish_session() {
            self.just_dropped = Some(session.active().id());
        }

        let Some(over) = event.over else {
            debug!(active = ?event.active, "dropped outside of any target");
            return DragDropResponse::Unchanged;
        };

        match drop_indices(store.current(), &event.active, &over) {
            Ok(Some(indices)) => {
                let items = moved(store.current(), indices.source, indices.target);
                store.replace(items);
                info!(
                    active = ?event.active,
                    from = indices.source,
                    to = indices.target,
                    "reordered"
                );
                DragDropResponse::Completed(indices)
            }
            Ok(None) => DragDropResponse::Unchanged,
            Err(err) => {
                warn!("{err}, keeping the current order");
                DragDropResponse::Unchanged
            }
        }
    }

    pub fn on_drag_cancel(&mut self) -> DragDropResponse<T> {
        if !matches!(self.press, Press::Idle) {
            self.press = Press::Consumed;
        }
        match self.finish_session() {
            Some(session) => {
                debug!(
                    active = ?session.active(),
                    index = session.source_index(),
                    "drag cancelled"
                );
                self.just_dropped = Some(session.active().id());
                DragDropResponse::Cancelled
            }
            None => DragDropResponse::NoDrag,
        }
    }

    /// Runs the sensors for one frame: turns a pending press into a drag, follows the pointer,
    /// resolves the drop target against `slots` (in store order) and finishes or cancels the drag.
    pub fn step<S>(&mut self, input: FrameInput, slots: &[Rect], store: &mut S) -> DragDropResponse<T>
    where
        S: OrderStore<T> + ?Sized,
    {
        if input.released {
            // any press ends with the release, whether it became a drag or not
            if let Press::Pending(pending) = &self.press {
                debug!(item = ?pending.id, "press released before the drag activated");
            }
            self.press = Press::Idle;
        }

        if let Press::Pending(pending) = std::mem::take(&mut self.press) {
            let constraint = self
                .config
                .sensors
                .for_kind(pending.kind)
                .map(|sensor| sensor.constraint());
            match (constraint, input.pointer) {
                (None, _) => self.press = Press::Consumed,
                (Some(_), None) => self.press = Press::Pending(pending),
                (Some(constraint), Some(pointer)) => {
                    match pending.evaluate(constraint, pointer, input.time) {
                        Activation::Pending => self.press = Press::Pending(pending),
                        Activation::Abort => {
                            debug!(item = ?pending.id, "press moved too far before the drag activated");
                            self.press = Press::Consumed;
                        }
                        Activation::Activate => {
                            let index = store.current().iter().position(|i| *i == pending.id);
                            match index.and_then(|index| Some((index, *slots.get(index)?))) {
                                Some((index, rect)) => self.on_drag_start(DragStartEvent {
                                    active: pending.id,
                                    index,
                                    pointer: pending.origin,
                                    rect,
                                }),
                                None => self.press = Press::Consumed,
                            }
                        }
                    }
                }
            }
        }

        let DragPhase::Dragging(session) = &mut self.phase else {
            return DragDropResponse::NoDrag;
        };
        if let Some(pointer) = input.pointer {
            session.update_pointer(pointer);
        }
        let over = self
            .collision
            .detect(session.overlay_rect(), slots)
            .and_then(|idx| store.current().get(idx).cloned());
        let active = session.active().clone();
        self.on_drag_over(over.clone());

        if (self.config.cancel_on_escape && input.escape) || !input.focused {
            return self.on_drag_cancel();
        }
        if input.released {
            return self.on_drag_end(DragEndEvent { active, over }, store);
        }
        DragDropResponse::CurrentDrag { active, over }
    }

    /// Draws the grid and one card per item using `card_ui`, then runs the sensors.
    ///
    /// `card_ui` is called with a [`SortableItem`] for every item in the store, and once more for
    /// the overlay while a card is dragged or dropped.
    pub fn ui<S>(
        &mut self,
        ui: &mut Ui,
        store: &mut S,
        mut card_ui: impl FnMut(&mut Ui, SortableItem<'_, T>),
    ) -> DragDropResponse<T>
    where
        S: OrderStore<T> + ?Sized,
    {
        let input = FrameInput::from_ui(ui);
        let now = input.time;
        let mounted_at = *self.mounted_at.get_or_insert(now);
        let items = store.current().to_vec();
        let ids: Vec<Id> = items.iter().map(|item| item.id()).collect();
        let items_changed = ids != self.last_order;
        let just_dropped = self.just_dropped.take();

        // lay out the slots from last frame's measurements
        let margin = Vec2::splat(self.config.margin);
        let outer_rect_bounds = ui.available_rect_before_wrap();
        let inner_rect = outer_rect_bounds.shrink2(margin);
        // panels thinner than the margin still lay out one column
        let grid_width = inner_rect.width().max(0.0);
        let heights: Vec<f32> = ids
            .iter()
            .map(|id| {
                self.heights
                    .get(id)
                    .copied()
                    .unwrap_or(self.config.estimated_item_height)
            })
            .collect();
        let slots = self
            .config
            .layout()
            .slots(inner_rect.min, grid_width, &heights);
        let where_to_put_background = ui.painter().add(Shape::Noop);

        let (active_index, over_index) = match &self.phase {
            DragPhase::Dragging(session) => (
                ids.iter().position(|id| *id == session.active().id()),
                session
                    .over()
                    .and_then(|over| ids.iter().position(|id| *id == over.id())),
            ),
            _ => (None, None),
        };
        let is_sorting = active_index.is_some();
        let entrance_elapsed = now - mounted_at;
        let entrance_done = self
            .config
            .entrance
            .is_finished(items.len(), entrance_elapsed);

        // draw cards
        {
            let Self {
                config,
                strategy,
                tracker,
                heights: measured,
                press,
                phase,
                ..
            } = self;
            let accepts_presses = !matches!(phase, DragPhase::Dragging(_));

            for (index, item) in items.iter().enumerate() {
                let id = ids[index];
                let is_dragging = active_index == Some(index);
                let transform = active_index
                    .and_then(|active| strategy.transform(&slots, active, over_index, index))
                    .unwrap_or(Transform::IDENTITY);
                // neighbours also glide back after a drop or cancel
                let transition =
                    (is_sorting || just_dropped.is_some()).then_some(config.transition);
                let animate_layout = animate_layout_changes(LayoutAnimationArgs {
                    is_sorting,
                    was_dragging: just_dropped == Some(id),
                    index: tracker.previous_index(id).unwrap_or(index),
                    new_index: index,
                    items_changed,
                    has_transition: config.transition.duration_ms > 0,
                });
                let rect = tracker.place(
                    id,
                    Placement {
                        index,
                        slot: slots[index],
                        transform,
                        transition,
                        animate_layout,
                        layout_transition: config.transition,
                    },
                    now,
                );

                let reveal = if entrance_done {
                    Reveal::VISIBLE
                } else {
                    config.entrance.reveal(index, entrance_elapsed)
                };

                let mut card = ui.new_child(
                    UiBuilder::new()
                        .max_rect(rect.translate(Vec2::new(0.0, reveal.offset_y)))
                        .layout(Layout::top_down(Align::Min))
                        .id_salt(id),
                );
                let opacity = if is_dragging {
                    reveal.opacity * config.placeholder_opacity
                } else {
                    reveal.opacity
                };
                card.set_opacity(opacity);

                card_ui(
                    &mut card,
                    SortableItem {
                        item,
                        item_id: id,
                        index,
                        style: ItemStyle {
                            transform,
                            transition,
                        },
                        is_dragging,
                        is_overlay: false,
                        press: (accepts_presses && !is_dragging).then_some(&mut *press),
                    },
                );

                if !is_dragging {
                    measured.insert(id, card.min_rect().height());
                }
            }

            tracker.retain(|id| ids.contains(&id));
            measured.retain(|id, _| ids.contains(id));
        }

        self.draw_overlay(ui, &items, &ids, &slots, active_index, over_index, now, &mut card_ui);

        // allocate the space taken by the grid and paint its background
        let bounds = GridLayout::bounds(inner_rect.min, grid_width, &slots);
        let outer_rect = Rect::from_min_max(outer_rect_bounds.min, bounds.max + margin);
        let grid_response = ui.allocate_rect(outer_rect, Sense::hover());

        // determine grid coloring depending on wherever a card is being dragged over it
        let style = if is_sorting && grid_response.contains_pointer() {
            ui.visuals().widgets.active
        } else {
            ui.visuals().widgets.inactive
        };
        ui.painter().set(
            where_to_put_background,
            epaint::RectShape::new(
                outer_rect,
                style.corner_radius,
                style.bg_fill,
                style.bg_stroke,
                epaint::StrokeKind::Inside,
            ),
        );

        if is_sorting {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        }

        let response = self.step(input, &slots, store);

        self.last_order = ids;
        if self.tracker.is_animating()
            || !entrance_done
            || self.is_overlay_visible()
            || !self.press.is_idle()
        {
            ui.ctx().request_repaint();
        }
        response
    }

    /// Draws the floating copy of the dragged card, or the copy settling into its slot after a
    /// drop. Returns to [`DragPhase::Idle`] once the drop animation is over.
    #[allow(clippy::too_many_arguments)]
    fn draw_overlay(
        &mut self,
        ui: &mut Ui,
        items: &[T],
        ids: &[Id],
        slots: &[Rect],
        active_index: Option<usize>,
        over_index: Option<usize>,
        now: f64,
        card_ui: &mut impl FnMut(&mut Ui, SortableItem<'_, T>),
    ) {
        let (index, rect, delta) = match &mut self.phase {
            DragPhase::Idle => return,
            DragPhase::Dragging(session) => {
                let Some(index) = active_index else {
                    return;
                };
                let mut rect = session.overlay_rect();
                if self.config.adjust_scale {
                    if let Some(scale) =
                        self.strategy
                            .transform(slots, index, over_index, index)
                    {
                        rect.set_width(rect.width() * scale.scale_x);
                        rect.set_height(rect.height() * scale.scale_y);
                    }
                }
                (index, rect, session.delta())
            }
            DragPhase::Dropping(animation) => {
                let started_at = *animation.started_at.get_or_insert(now);
                let Some(index) = ids.iter().position(|id| *id == animation.item.id()) else {
                    self.phase = DragPhase::Idle;
                    return;
                };
                let elapsed = now - started_at;
                let progress = self.config.drop_animation.progress(elapsed);
                let target = slots[index];
                let rect = Rect::from_min_max(
                    animation.from.min + (target.min - animation.from.min) * progress,
                    animation.from.max + (target.max - animation.from.max) * progress,
                );
                let delta = rect.min - target.min;
                if self.config.drop_animation.is_finished(elapsed) {
                    self.phase = DragPhase::Idle;
                }
                (index, rect, delta)
            }
        };

        let item = &items[index];
        egui::Area::new(Id::new("egui_dnd_grid_overlay").with(ui.id()))
            .order(Order::Tooltip)
            .interactable(false)
            .fixed_pos(rect.min)
            .show(ui.ctx(), |ui| {
                ui.set_width(rect.width());
                card_ui(
                    ui,
                    SortableItem {
                        item,
                        item_id: ids[index],
                        index,
                        style: ItemStyle {
                            transform: Transform::from_translation(delta),
                            transition: None,
                        },
                        is_dragging: true,
                        is_overlay: true,
                        press: None,
                    },
                );
            });
    }
}
