//! Data provider layer for devdash.
//!
//! Each configured integration (analytics, search console, uptime monitor,
//! issue tracker) is a [`ProviderWidget`]: it fetches render-ready
//! [`WidgetData`] for the widgets that name it. Providers are built from
//! their configuration by a [`ProviderFactory`].

pub mod factory;
mod http;
pub mod providers;
pub mod widget_data;

pub use devdash_core as core;
pub use factory::{HttpProviderFactory, ProviderFactory, ProviderWidget};
pub use widget_data::WidgetData;
