//! HTML rendering of the dashboard.

pub mod components;
pub mod markup;
pub mod page;
pub mod style;

pub use markup::{escape, Element};
pub use page::{compose_dashboard, document, render_error, render_loading};
