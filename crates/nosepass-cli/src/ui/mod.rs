//! Terminal presentation for the diagnostic stream.

pub mod context;
pub mod theme;

pub use context::UiContext;
pub use theme::render_strength;
