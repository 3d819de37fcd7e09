//! rasshdash library - dashboard controller for the RASSH honeypot
//!
//! Exposes the modules for the binary and the integration tests.

pub mod cli;
pub mod config;
pub mod connection;
pub mod errors;
pub mod event;
pub mod feed;
pub mod logging;
pub mod poller;
pub mod presenter;
pub mod push;
pub mod reconciler;
pub mod runtime;
pub mod status_command;
pub mod tui;
pub mod view;

pub use config::DashConfig;
pub use event::{DashEvent, TransportSignal};
pub use reconciler::{AnimationTimings, ViewReconciler};
pub use view::{RenderPatch, ViewModel};
