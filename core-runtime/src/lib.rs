//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the video player core:
//! - Logging and tracing infrastructure
//! - Player event bus
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the playback crate depends
//! on. It establishes the logging conventions (structured `tracing` fields,
//! per-player spans, host log forwarding) and the broadcast channel that lets
//! any number of observers follow a player alongside its delegate.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
