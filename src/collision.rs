use egui::Rect;

/// Decides which droppable the dragged item is currently over.
///
/// `collision_rect` is where the dragged item is drawn right now, `droppables` are the laid out
/// slots of every item (the dragged one included). Returns an index into `droppables`.
pub trait CollisionDetection {
    fn detect(&self, collision_rect: Rect, droppables: &[Rect]) -> Option<usize>;
}

impl<F> CollisionDetection for F
where
    F: Fn(Rect, &[Rect]) -> Option<usize>,
{
    fn detect(&self, collision_rect: Rect, droppables: &[Rect]) -> Option<usize> {
        self(collision_rect, droppables)
    }
}

/// Picks the droppable whose center is closest to the center of the dragged item.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestCenter;

impl CollisionDetection for ClosestCenter {
    fn detect(&self, collision_rect: Rect, droppables: &[Rect]) -> Option<usize> {
        let center = collision_rect.center();
        droppables
            .iter()
            .enumerate()
            .map(|(idx, rect)| (idx, rect.center().distance_sq(center)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, _)| idx)
    }
}

/// Picks the droppable covering the largest share of the dragged item. Nothing is hit without
/// overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectIntersection;

impl CollisionDetection for RectIntersection {
    fn detect(&self, collision_rect: Rect, droppables: &[Rect]) -> Option<usize> {
        droppables
            .iter()
            .enumerate()
            .filter_map(|(idx, rect)| {
                let overlap = rect.intersect(collision_rect);
                if !overlap.is_positive() {
                    return None;
                }
                let union_area = rect.area() + collision_rect.area() - overlap.area();
                Some((idx, overlap.area() / union_area))
            })
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, _)| idx)
    }
}
