use thiserror::Error;
use tracing::debug;

use crate::models::{ColumnItem, ColumnModel, MasonryModel};

/// Errors raised by the masonry distributor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Column count must be at least one.
    #[error("Invalid configuration: column count must be at least 1, got {0}")]
    InvalidConfiguration(usize),
    /// Precomputed column indices do not cover the item list.
    #[error("Column assignment covers {indices} items, expected {items}")]
    AssignmentLength { items: usize, indices: usize },
    /// A precomputed column index points past the last column.
    #[error("Item {item_index} assigned to column {column}, but only {column_count} columns exist")]
    ColumnOutOfRange {
        item_index: usize,
        column: u32,
        column_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Anything that can flow through the masonry layout.
pub trait MasonryItem {
    /// Stable identity, used for cache keys.
    fn layout_id(&self) -> u64;
    /// Intrinsic display height in pixels.
    fn display_height(&self) -> f32;
}

/// How items are distributed across columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnStrategy {
    /// Item `i` goes to column `i % column_count`.
    #[default]
    RoundRobin,
    /// Each item goes to the column with the smallest stacked height so far.
    ShortestColumn,
}

impl ColumnStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "round-robin" | "round_robin" | "roundrobin" => Some(Self::RoundRobin),
            "shortest" | "shortest-column" | "shortest_column" | "balanced" => {
                Some(Self::ShortestColumn)
            }
            _ => None,
        }
    }
}

/// Width shared by every column.
///
/// `(container_width - 2 * horizontal_inset - (column_count - 1) * spacing) / column_count`,
/// clamped to 0 when the container is too small to hold the insets and gaps.
pub fn compute_column_width(
    container_width: f32,
    horizontal_inset: f32,
    column_count: usize,
    spacing: f32,
) -> Result<f32> {
    if column_count == 0 {
        return Err(LayoutError::InvalidConfiguration(column_count));
    }

    let inset = horizontal_inset.max(0.0);
    let spacing = spacing.max(0.0);
    let gaps = (column_count - 1) as f32 * spacing;
    let width = (container_width - 2.0 * inset - gaps) / column_count as f32;

    if width.is_finite() {
        Ok(width.max(0.0))
    } else {
        Ok(0.0)
    }
}

/// Column that round-robin assignment gives the item at `index`.
fn round_robin_column(index: usize, column_count: usize) -> usize {
    index % column_count
}

/// Round-robin partition of `items` into `column_count` columns.
///
/// Relative order is preserved inside each column. An empty input yields
/// `column_count` empty columns.
pub fn assign_columns<T>(items: &[T], column_count: usize) -> Result<Vec<Vec<&T>>> {
    if column_count == 0 {
        return Err(LayoutError::InvalidConfiguration(column_count));
    }

    let per_column = items.len() / column_count + 1;
    let mut columns: Vec<Vec<&T>> = (0..column_count)
        .map(|_| Vec::with_capacity(per_column))
        .collect();
    for (i, item) in items.iter().enumerate() {
        columns[round_robin_column(i, column_count)].push(item);
    }
    Ok(columns)
}

/// Configuration for the masonry layout.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryLayout {
    /// Number of columns (default: 2)
    pub column_count: usize,
    /// Gap between columns and between stacked items in pixels (default: 12)
    pub spacing: f32,
    /// Padding on the left and right of the grid in pixels (default: 16)
    pub horizontal_inset: f32,
    /// Column assignment policy (default: round-robin)
    pub strategy: ColumnStrategy,
}

impl Default for MasonryLayout {
    fn default() -> Self {
        Self {
            column_count: 2,
            spacing: 12.0,
            horizontal_inset: 16.0,
            strategy: ColumnStrategy::RoundRobin,
        }
    }
}

impl MasonryLayout {
    pub fn new(column_count: usize, spacing: f32, horizontal_inset: f32) -> Self {
        Self {
            column_count,
            spacing,
            horizontal_inset,
            strategy: ColumnStrategy::RoundRobin,
        }
    }

    pub fn with_strategy(mut self, strategy: ColumnStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn column_width(&self, container_width: f32) -> Result<f32> {
        compute_column_width(
            container_width,
            self.horizontal_inset,
            self.column_count,
            self.spacing,
        )
    }

    /// Column index for every item, in input order.
    ///
    /// Independent of container width, so the result can be reused across resizes.
    pub fn column_indices<T: MasonryItem>(&self, items: &[T]) -> Result<Vec<u32>> {
        if self.column_count == 0 {
            return Err(LayoutError::InvalidConfiguration(self.column_count));
        }

        let indices = match self.strategy {
            ColumnStrategy::RoundRobin => (0..items.len())
                .map(|i| round_robin_column(i, self.column_count) as u32)
                .collect(),
            ColumnStrategy::ShortestColumn => self.shortest_column_indices(items),
        };
        Ok(indices)
    }

    fn shortest_column_indices<T: MasonryItem>(&self, items: &[T]) -> Vec<u32> {
        let spacing = self.spacing.max(0.0);
        let mut heights = vec![0.0f32; self.column_count];
        let mut filled = vec![false; self.column_count];
        let mut out = Vec::with_capacity(items.len());

        for item in items {
            // Ties go to the leftmost column.
            let mut target = 0;
            for (col, h) in heights.iter().enumerate().skip(1) {
                if *h < heights[target] {
                    target = col;
                }
            }
            if filled[target] {
                heights[target] += spacing;
            }
            heights[target] += item.display_height().max(0.0);
            filled[target] = true;
            out.push(target as u32);
        }
        out
    }

    /// Computes a full layout pass for `items` inside a container of `container_width`.
    ///
    /// # Algorithm
    /// 1. Derive the shared column width from the container geometry.
    /// 2. Assign every item a column using the configured strategy.
    /// 3. Stack each column's items top to bottom, separated by `spacing`.
    pub fn compute<T: MasonryItem>(&self, items: &[T], container_width: f32) -> Result<MasonryModel> {
        let indices = self.column_indices(items)?;
        self.model_from_indices(items, &indices, container_width)
    }

    /// Rebuilds a layout from precomputed column indices without re-running assignment.
    ///
    /// `indices` must hold one in-range column per item.
    pub fn model_from_indices<T: MasonryItem>(
        &self,
        items: &[T],
        indices: &[u32],
        container_width: f32,
    ) -> Result<MasonryModel> {
        let column_width = self.column_width(container_width)?;
        let spacing = self.spacing.max(0.0);

        if indices.len() != items.len() {
            return Err(LayoutError::AssignmentLength {
                items: items.len(),
                indices: indices.len(),
            });
        }
        if let Some((item_index, &column)) = indices
            .iter()
            .enumerate()
            .find(|(_, c)| **c as usize >= self.column_count)
        {
            return Err(LayoutError::ColumnOutOfRange {
                item_index,
                column,
                column_count: self.column_count,
            });
        }

        let mut columns: Vec<ColumnModel> = (0..self.column_count)
            .map(|c| ColumnModel::new(c as u32, 0.0, Vec::new()))
            .collect();

        for (item_index, (item, &col)) in items.iter().zip(indices).enumerate() {
            let column = &mut columns[col as usize];
            let offset_top = if column.items.is_empty() {
                0.0
            } else {
                column.height_px + spacing
            };
            let display_h = item.display_height().max(0.0);
            column.items.push(ColumnItem {
                item_index,
                display_w: column_width,
                display_h,
                offset_top,
            });
            column.height_px = offset_top + display_h;
        }

        debug!(
            items = items.len(),
            columns = self.column_count,
            column_width,
            strategy = ?self.strategy,
            "Computed masonry layout"
        );

        Ok(MasonryModel {
            column_width,
            columns,
        })
    }
}
