//! # Video Playback Module
//!
//! Reconciles raw playback telemetry into a player lifecycle state and a
//! small set of derived flags, then drives controls and observers from them.
//!
//! ## Overview
//!
//! This module handles:
//! - The playback state machine (`start`/`play`/`pause`/`stop`/`seek`)
//! - Periodic telemetry sampling of the platform media primitive
//! - Derived flags (`is_waiting_buffer`, `is_loading`, `is_finished`) as a
//!   pure reducer returning side effects
//! - Ordered delivery of every change to a delegate, a control surface, a
//!   loading indicator and an event bus on the UI dispatcher
//! - The control-surface contract and its default layout
//!
//! The platform provides the media primitive, the media item and the UI
//! dispatcher through `bridge-traits`.

pub mod builder;
pub mod config;
pub mod control;
pub mod effects;
pub mod engine;
pub mod error;
pub mod notifier;
pub mod player;
pub mod sampler;
pub mod state;

pub use builder::PlayerBuilder;
pub use config::PlayerConfig;
pub use control::{ControlElements, ControlLayout, ControlSurface, MaskSurface, StandardControlSurface};
pub use effects::{PrimitiveCommand, SideEffect};
pub use engine::PlayerModel;
pub use error::{PlaybackError, Result};
pub use notifier::PlayerDelegate;
pub use player::{Player, PlayerHandle};
pub use state::{DerivedFlags, Telemetry};
