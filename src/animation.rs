use std::{collections::HashMap, fmt};

use egui::{Id, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// CSS style cubic bézier easing curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)` and `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Fast start with a long soft landing, used for both sorting and dropping.
    pub const SNAPPY: Self = Self::new(0.25, 1.0, 0.5, 1.0);
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        let inv = 1.0 - t;
        3.0 * inv * inv * t * a1 + 3.0 * inv * t * t * a2 + t * t * t
    }

    fn sample_derivative(a1: f32, a2: f32, t: f32) -> f32 {
        let inv = 1.0 - t;
        3.0 * inv * inv * a1 + 6.0 * inv * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Maps linear progress `x` in `0..=1` to eased progress.
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        const EPSILON: f32 = 1e-6;

        // newton first, bisection if the slope gets too flat
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < EPSILON {
                return Self::sample(self.y1, self.y2, t);
            }
            let slope = Self::sample_derivative(self.x1, self.x2, t);
            if slope.abs() < EPSILON {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if x > value {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        Self::sample(self.y1, self.y2, t)
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::SNAPPY
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: CubicBezier,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: CubicBezier::SNAPPY,
        }
    }
}

impl Transition {
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.duration_ms) / 1000.0
    }

    /// Eased progress after `elapsed` seconds, clamped to `0..=1`.
    pub fn progress(&self, elapsed: f64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let linear = (elapsed / self.duration_secs()).clamp(0.0, 1.0) as f32;
        self.easing.ease(linear)
    }

    pub fn is_finished(&self, elapsed: f64) -> bool {
        elapsed >= self.duration_secs()
    }

    /// CSS `transition` value for `property`, e.g. `transform 300ms cubic-bezier(0.25, 1, 0.5, 1)`.
    pub fn to_css(&self, property: &str) -> String {
        format!("{property} {}ms {}", self.duration_ms, self.easing)
    }
}

/// Translation and scale applied on top of an item's laid out slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn from_translation(delta: Vec2) -> Self {
        Self {
            x: delta.x,
            y: delta.y,
            ..Self::IDENTITY
        }
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Moves `rect` and scales it around its top left corner.
    pub fn apply(&self, rect: Rect) -> Rect {
        Rect::from_min_size(
            rect.min + self.translation(),
            Vec2::new(rect.width() * self.scale_x, rect.height() * self.scale_y),
        )
    }

    /// CSS `transform` value. Translations are rounded to whole pixels.
    pub fn to_css_string(&self) -> String {
        // adding zero turns a rounded -0 into 0
        let x = self.x.round() + 0.0;
        let y = self.y.round() + 0.0;
        format!(
            "translate3d({x}px, {y}px, 0) scaleX({}) scaleY({})",
            self.scale_x, self.scale_y
        )
    }
}

/// What is known about an item when its slot changes between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAnimationArgs {
    /// A drag is in progress somewhere in the grid.
    pub is_sorting: bool,
    /// This item was the one being dragged when the drag ended.
    pub was_dragging: bool,
    pub index: usize,
    pub new_index: usize,
    /// The order in the store changed since the previous frame.
    pub items_changed: bool,
    pub has_transition: bool,
}

/// Only animates the item that was just dropped, and only if it actually changed position.
pub fn default_animate_layout_changes(args: LayoutAnimationArgs) -> bool {
    if !args.has_transition || !args.was_dragging {
        return false;
    }
    if args.items_changed && args.index == args.new_index {
        return false;
    }
    if args.is_sorting {
        return true;
    }
    args.new_index != args.index
}

/// Layout changes outside of a drag (resizing, external reorders) always animate. While sorting or
/// right after a drop the sorting transforms already move items, so the default policy applies.
pub fn animate_layout_changes(args: LayoutAnimationArgs) -> bool {
    if args.is_sorting || args.was_dragging {
        return default_animate_layout_changes(args);
    }
    true
}

/// Where an item wants to be drawn this frame.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub index: usize,
    pub slot: Rect,
    pub transform: Transform,
    /// Transition for sorting transforms, `None` when transform changes should snap.
    pub transition: Option<Transition>,
    /// Whether a change of `slot` may be animated.
    pub animate_layout: bool,
    /// Transition used for slot changes.
    pub layout_transition: Transition,
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: Rect,
    start: f64,
    transition: Transition,
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    index: usize,
    slot: Rect,
    transform: Transform,
    target: Rect,
    tween: Option<Tween>,
}

fn lerp_rect(from: Rect, to: Rect, t: f32) -> Rect {
    Rect::from_min_max(from.min + (to.min - from.min) * t, from.max + (to.max - from.max) * t)
}

impl Tracked {
    fn visual(&self, now: f64) -> Rect {
        match self.tween {
            Some(tween) => lerp_rect(
                tween.from,
                self.target,
                tween.transition.progress(now - tween.start),
            ),
            None => self.target,
        }
    }
}

/// Remembers where every item was drawn and tweens it to its new position when either its slot or
/// its sorting transform changes.
#[derive(Debug, Clone, Default)]
pub struct LayoutTracker {
    entries: HashMap<Id, Tracked>,
}

impl LayoutTracker {
    pub fn previous_index(&self, id: Id) -> Option<usize> {
        self.entries.get(&id).map(|tracked| tracked.index)
    }

    /// Returns the rect to draw the item at for `now`.
    pub fn place(&mut self, id: Id, placement: Placement, now: f64) -> Rect {
        let target = placement.transform.apply(placement.slot);

        let Some(tracked) = self.entries.get_mut(&id) else {
            self.entries.insert(
                id,
                Tracked {
                    index: placement.index,
                    slot: placement.slot,
                    transform: placement.transform,
                    target,
                    tween: None,
                },
            );
            return target;
        };

        if tracked.target != target {
            let slot_changed = tracked.slot != placement.slot;
            let transform_changed = tracked.transform != placement.transform;

            let transition = if slot_changed && placement.animate_layout {
                Some(placement.layout_transition)
            } else if transform_changed && !slot_changed {
                placement.transition
            } else {
                None
            };

            let from = tracked.visual(now);
            tracked.tween = transition.map(|transition| Tween {
                from,
                start: now,
                transition,
            });
            tracked.target = target;
        }

        tracked.index = placement.index;
        tracked.slot = placement.slot;
        tracked.transform = placement.transform;

        if let Some(tween) = tracked.tween {
            if tween.transition.is_finished(now - tween.start) {
                tracked.tween = None;
            }
        }
        tracked.visual(now)
    }

    pub fn is_animating(&self) -> bool {
        self.entries.values().any(|tracked| tracked.tween.is_some())
    }

    /// Forgets items that are no longer part of the grid.
    pub fn retain(&mut self, mut keep: impl FnMut(Id) -> bool) {
        self.entries.retain(|id, _| keep(*id));
    }
}

/// Staggered fade and rise of the cards when the grid first shows up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entrance {
    /// Seconds before the first card starts to appear.
    pub delay_children: f64,
    /// Seconds between two consecutive cards.
    pub stagger_children: f64,
    /// How far below its slot a hidden card starts.
    pub offset_y: f32,
    pub transition: Transition,
}

impl Default for Entrance {
    fn default() -> Self {
        Self {
            delay_children: 0.3,
            stagger_children: 0.2,
            offset_y: 20.0,
            transition: Transition::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub opacity: f32,
    pub offset_y: f32,
}

impl Reveal {
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
    };
}

impl Entrance {
    /// Opacity and vertical offset of the card at `index`, `elapsed` seconds after mounting.
    pub fn reveal(&self, index: usize, elapsed: f64) -> Reveal {
        let start = self.delay_children + self.stagger_children * index as f64;
        let progress = self.transition.progress(elapsed - start);
        Reveal {
            opacity: progress,
            offset_y: self.offset_y * (1.0 - progress),
        }
    }

    pub fn is_finished(&self, item_count: usize, elapsed: f64) -> bool {
        let last = item_count.saturating_sub(1) as f64;
        elapsed >= self.delay_children + self.stagger_children * last + self.transition.duration_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn easing_hits_endpoints_and_is_monotonic() {
        let curve = CubicBezier::SNAPPY;
        assert_eq!(curve.ease(0.0), 0.0);
        assert_eq!(curve.ease(1.0), 1.0);

        let mut last = 0.0;
        for step in 1..=20 {
            let value = curve.ease(step as f32 / 20.0);
            assert!(value >= last, "easing went backwards at step {step}");
            last = value;
        }
        // front loaded curve is well past halfway at the midpoint
        assert!(curve.ease(0.5) > 0.8);
    }

    #[test]
    fn linear_easing_is_identity() {
        for x in [0.1, 0.25, 0.5, 0.9] {
            assert!((CubicBezier::LINEAR.ease(x) - x).abs() < 1e-3);
        }
    }

    #[test]
    fn css_strings() {
        let transition = Transition::default();
        assert_eq!(
            transition.to_css("transform"),
            "transform 300ms cubic-bezier(0.25, 1, 0.5, 1)"
        );

        let transform = Transform {
            x: 10.4,
            y: -0.2,
            scale_x: 1.0,
            scale_y: 0.5,
        };
        assert_eq!(
            transform.to_css_string(),
            "translate3d(10px, 0px, 0) scaleX(1) scaleY(0.5)"
        );
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let transition = Transition {
            duration_ms: 0,
            ..Transition::default()
        };
        assert_eq!(transition.progress(0.0), 1.0);
        assert!(transition.is_finished(0.0));
    }

    fn args() -> LayoutAnimationArgs {
        LayoutAnimationArgs {
            is_sorting: false,
            was_dragging: false,
            index: 0,
            new_index: 0,
            items_changed: false,
            has_transition: true,
        }
    }

    #[test]
    fn layout_animation_suppressed_while_sorting() {
        let sorting = LayoutAnimationArgs {
            is_sorting: true,
            new_index: 2,
            ..args()
        };
        assert!(!animate_layout_changes(sorting));
        assert!(animate_layout_changes(args()));
    }

    #[test]
    fn dropped_item_animates_only_when_it_moved() {
        let moved = LayoutAnimationArgs {
            was_dragging: true,
            new_index: 1,
            ..args()
        };
        assert!(animate_layout_changes(moved));

        let stayed = LayoutAnimationArgs {
            was_dragging: true,
            items_changed: true,
            ..args()
        };
        assert!(!animate_layout_changes(stayed));
    }

    fn placement(slot: Rect, transform: Transform) -> Placement {
        Placement {
            index: 0,
            slot,
            transform,
            transition: Some(Transition::default()),
            animate_layout: true,
            layout_transition: Transition::default(),
        }
    }

    #[test]
    fn tracker_tweens_transform_changes() {
        let id = Id::new("card");
        let slot = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 50.0));
        let mut tracker = LayoutTracker::default();

        assert_eq!(tracker.place(id, placement(slot, Transform::IDENTITY), 0.0), slot);

        let shifted = Transform::from_translation(vec2(100.0, 0.0));
        let start = tracker.place(id, placement(slot, shifted), 1.0);
        assert_eq!(start, slot);
        assert!(tracker.is_animating());

        let middle = tracker.place(id, placement(slot, shifted), 1.15);
        assert!(middle.min.x > 0.0 && middle.min.x < 100.0);

        let end = tracker.place(id, placement(slot, shifted), 2.0);
        assert_eq!(end.min.x, 100.0);
        assert!(!tracker.is_animating());
    }

    #[test]
    fn tracker_snaps_when_layout_animation_is_off() {
        let id = Id::new("card");
        let slot = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 50.0));
        let moved_slot = slot.translate(vec2(0.0, 80.0));
        let mut tracker = LayoutTracker::default();

        tracker.place(id, placement(slot, Transform::IDENTITY), 0.0);
        let snapped = tracker.place(
            id,
            Placement {
                animate_layout: false,
                ..placement(moved_slot, Transform::IDENTITY)
            },
            1.0,
        );
        assert_eq!(snapped, moved_slot);
        assert!(!tracker.is_animating());
    }

    #[test]
    fn entrance_staggers_cards() {
        let entrance = Entrance::default();
        assert_eq!(entrance.reveal(0, 0.0).opacity, 0.0);
        assert_eq!(entrance.reveal(0, 0.0).offset_y, 20.0);

        // first card is done while the third has not started yet
        let at = 0.65;
        assert_eq!(entrance.reveal(0, at), Reveal::VISIBLE);
        assert_eq!(entrance.reveal(2, at).opacity, 0.0);

        assert!(!entrance.is_finished(3, 0.9));
        assert!(entrance.is_finished(3, 1.5));
    }
}
