use egui::{Pos2, Rect, Vec2};

/// Responsive grid where every column is at least `min_column_width` wide and the leftover width
/// is shared evenly between columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub min_column_width: f32,
    pub gap: f32,
}

impl GridLayout {
    pub fn columns(&self, available_width: f32) -> usize {
        let per_column = self.min_column_width + self.gap;
        if per_column <= 0.0 {
            return 1;
        }
        let fitting = ((available_width + self.gap) / per_column).floor();
        (fitting as usize).max(1)
    }

    /// Never below one point, so slots stay non-empty in panels narrower than a single column.
    pub fn column_width(&self, available_width: f32, columns: usize) -> f32 {
        let gaps = self.gap * columns.saturating_sub(1) as f32;
        ((available_width - gaps) / columns.max(1) as f32).max(1.0)
    }

    /// Slots for items with the given `heights`, filled row by row starting at `origin`. Each row is
    /// as tall as its tallest item and every slot takes the full row height.
    pub fn slots(&self, origin: Pos2, available_width: f32, heights: &[f32]) -> Vec<Rect> {
        let columns = self.columns(available_width);
        let column_width = self.column_width(available_width, columns);

        let mut slots = Vec::with_capacity(heights.len());
        let mut top = origin.y;
        for row in heights.chunks(columns) {
            let row_height = row.iter().copied().fold(0.0f32, f32::max);
            for column in 0..row.len() {
                let left = origin.x + column as f32 * (column_width + self.gap);
                slots.push(Rect::from_min_size(
                    Pos2::new(left, top),
                    Vec2::new(column_width, row_height),
                ));
            }
            top += row_height + self.gap;
        }
        slots
    }

    /// Bounding rect of `slots`, or an empty rect at `origin`.
    pub fn bounds(origin: Pos2, available_width: f32, slots: &[Rect]) -> Rect {
        let bottom = slots.iter().map(|r| r.bottom()).fold(origin.y, f32::max);
        Rect::from_min_max(origin, Pos2::new(origin.x + available_width, bottom))
    }
}
