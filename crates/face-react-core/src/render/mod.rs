//! Expression rendering: eye patterns, the off-screen canvas and the
//! renderer that flushes it to a [`crate::ports::DisplaySink`].

mod canvas;
mod patterns;
mod renderer;

pub use canvas::{Canvas, BACKGROUND, CANVAS_HEIGHT, CANVAS_WIDTH, EYE_COLOR};
pub use patterns::{pattern, Shape};
pub use renderer::{ExpressionRenderer, SELF_TEST_COLORS};
