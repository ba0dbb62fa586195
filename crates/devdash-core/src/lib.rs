//! Core rendering abstraction for devdash.
//!
//! Turns hand-written widget options into typed styles, holds the retained
//! row/column layout, and defines the backend contract the UI implements.

pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod facade;
pub mod layout;
pub mod options;
pub mod settings;
pub mod size;
pub mod style;
pub mod widget;

pub use error::{DashError, Result};
