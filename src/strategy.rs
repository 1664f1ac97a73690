use egui::Rect;

use crate::animation::Transform;
use crate::utils::moved;

/// Computes how far each item is pushed out of its slot while another item is being sorted.
pub trait SortingStrategy {
    /// `rects` are the laid out slots in list order. Returns `None` if `index` is out of range.
    fn transform(
        &self,
        rects: &[Rect],
        active_index: usize,
        over_index: Option<usize>,
        index: usize,
    ) -> Option<Transform>;
}

/// Every item takes over the slot it would occupy if the drag ended right now. Works for grids
/// where items wrap across rows, not only for single columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectSorting;

impl SortingStrategy for RectSorting {
    fn transform(
        &self,
        rects: &[Rect],
        active_index: usize,
        over_index: Option<usize>,
        index: usize,
    ) -> Option<Transform> {
        let old_rect = *rects.get(index)?;
        let Some(over_index) = over_index else {
            return Some(Transform::IDENTITY);
        };
        if over_index >= rects.len() || active_index >= rects.len() {
            return Some(Transform::IDENTITY);
        }

        let new_rects = moved(rects, over_index, active_index);
        let new_rect = new_rects[index];

        Some(Transform {
            x: new_rect.left() - old_rect.left(),
            y: new_rect.top() - old_rect.top(),
            scale_x: scale(new_rect.width(), old_rect.width()),
            scale_y: scale(new_rect.height(), old_rect.height()),
        })
    }
}

/// `new / old`, or 1 when either side is collapsed and there is nothing to scale.
fn scale(new: f32, old: f32) -> f32 {
    let ratio = new / old;
    if old > 0.0 && new > 0.0 && ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}
