//! Runtime layer for devdash.
//!
//! [`Composer`] turns project configuration into a [`Layout`] by querying
//! the bound providers; [`RefreshLoop`] repeats that on a timer in a tokio
//! task and hands each finished layout to the UI.
//!
//! [`Layout`]: devdash_core::layout::Layout

pub mod composer;
pub mod refresh;

pub use composer::Composer;
pub use devdash_core as core;
pub use devdash_data as data;
pub use refresh::{RefreshHandle, RefreshLoop, RefreshStats};
