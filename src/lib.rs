//! Workspace umbrella crate.
//!
//! Host applications can depend on `vplayer-workspace` and get the player
//! core plus, with the default `desktop-shims` feature, the desktop bridge
//! implementations without wiring each crate individually.

pub use core_playback::*;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop as desktop;
