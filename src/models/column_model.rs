#[derive(Debug, Clone, PartialEq)]
pub struct ColumnItem {
    /// Position of the item in the layout input.
    pub item_index: usize,
    pub display_w: f32,
    pub display_h: f32,
    /// Y position of the item inside its column.
    pub offset_top: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub column_index: u32,
    pub height_px: f32,
    pub items: Vec<ColumnItem>,
}

impl ColumnModel {
    pub fn new(column_index: u32, height_px: f32, items: Vec<ColumnItem>) -> Self {
        Self {
            column_index,
            height_px,
            items,
        }
    }
}

/// Where a single input item ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub column_index: u32,
    pub display_width: f32,
}

/// Result of one masonry layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryModel {
    pub column_width: f32,
    pub columns: Vec<ColumnModel>,
}

impl MasonryModel {
    /// Number of items placed across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    /// Per-item placements, in input order.
    pub fn placements(&self) -> Vec<Placement> {
        let mut out = vec![
            Placement {
                column_index: 0,
                display_width: self.column_width,
            };
            self.item_count()
        ];
        for column in &self.columns {
            for item in &column.items {
                if let Some(slot) = out.get_mut(item.item_index) {
                    slot.column_index = column.column_index;
                    slot.display_width = item.display_w;
                }
            }
        }
        out
    }

    /// Height of the tallest column.
    pub fn content_height(&self) -> f32 {
        self.columns
            .iter()
            .map(|c| c.height_px)
            .fold(0.0f32, f32::max)
    }
}
