//! Presentation layer: view models, cell formatting and a text renderer.
//!
//! ```text
//! DataTable -> compute_viewmodel -> TableViewModel -> render -> String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready table state
//! - [`helpers`]: Cell text, badge and date formatting
//! - [`renderer`]: Plain-text rendering

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{
    CellView, DateRangeView, FilterChipView, HeaderCell, PaginatorView, RowView,
    SelectionSummary, TableViewModel,
};
