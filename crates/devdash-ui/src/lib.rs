//! Terminal front end for devdash.
//!
//! [`TermSession`] owns the terminal and runs the input loop; [`grid_view`]
//! draws a retained layout with ratatui.

pub mod grid_view;
pub mod keys;
pub mod session;

pub use keys::QuitKey;
pub use session::{Flow, TermSession};
