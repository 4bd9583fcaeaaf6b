//! Aggregates module
pub mod filter_state;
pub mod product;
pub mod cart;
pub mod category;

pub use filter_state::{FacetChange, FilterState};
pub use product::Product;
pub use cart::{GuestLine, GuestList, GuestListError};
pub use category::{visible_rows, CategoryNode, CategoryRow, ExpandedPaths, MAX_CATEGORY_DEPTH};
