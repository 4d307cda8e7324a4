//! Content stream execution state.
//!
//! Tracks the transformation and text state needed to place glyphs while
//! walking a page's content stream operators.

pub mod graphics_state;

pub use graphics_state::{GraphicsState, GraphicsStateStack, Matrix};
