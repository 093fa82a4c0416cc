//! Core radar components
pub mod arbiter;
pub mod buffer;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod hardware;
pub mod panel;
pub mod publish;
pub mod scan;
pub mod sweep;

#[cfg(test)]
pub(crate) mod mock;
