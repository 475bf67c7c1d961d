pub mod layout_cache;
pub mod masonry;

pub use layout_cache::{CachedMasonryComputer, LayoutCache};
pub use masonry::{
    assign_columns, compute_column_width, ColumnStrategy, LayoutError, MasonryItem,
    MasonryLayout,
};
