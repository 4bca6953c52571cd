//! Test support utilities for face-react.
//!
//! Provides mocks for every port and synthetic frame builders for testing
//! the reaction loop without a camera or display.
//!
//! # Example
//!
//! ```
//! use face_react_test_support::{MockDisplay, MockFrameSource, SyntheticFrameBuilder};
//!
//! // A source that yields a gray frame forever
//! let source = MockFrameSource::new(vec![SyntheticFrameBuilder::gray(128)]);
//!
//! // Keep a handle to inspect what was drawn later
//! let display = MockDisplay::new();
//! let handle = display.clone();
//! assert_eq!(handle.show_count(), 0);
//! # drop(source);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticFrameBuilder;
pub use mocks::{MockClassifier, MockDisplay, MockFaceLocator, MockFrameSource};
