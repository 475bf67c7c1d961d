pub mod category;
pub mod column_model;
pub mod post;

pub use category::*;
pub use column_model::*;
pub use post::*;
