//! Player construction.

use std::sync::{Arc, Weak};

use bridge_traits::{
    ActivityIndicator, MediaItem, MediaPrimitive, OverlayHost, PlayerId, UiDispatcher,
};
use core_async::runtime::{current_handle, Handle};
use core_runtime::events::EventBus;

use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::notifier::{EventNotifier, PlayerDelegate};
use crate::player::{Player, PlayerParts};

/// Assembles a [`Player`] from its capabilities.
///
/// Required: media item, media primitive, UI dispatcher and an async runtime
/// (taken from the ambient Tokio runtime when [`PlayerBuilder::runtime`] is
/// not called). Everything else is optional.
///
/// ```rust,ignore
/// let player = PlayerBuilder::new()
///     .item(item)
///     .primitive(primitive)
///     .dispatcher(Arc::new(MainThreadDispatcher::new()?))
///     .indicator(spinner)
///     .build()?;
/// ```
#[derive(Default)]
pub struct PlayerBuilder {
    config: PlayerConfig,
    item: Option<Arc<dyn MediaItem>>,
    primitive: Option<Arc<dyn MediaPrimitive>>,
    dispatcher: Option<Arc<dyn UiDispatcher>>,
    runtime: Option<Handle>,
    delegate: Option<Weak<dyn PlayerDelegate>>,
    indicator: Option<Arc<dyn ActivityIndicator>>,
    overlay_host: Option<Arc<dyn OverlayHost>>,
    event_bus: Option<EventBus>,
}

impl PlayerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn item(mut self, item: Arc<dyn MediaItem>) -> Self {
        self.item = Some(item);
        self
    }

    pub fn primitive(mut self, primitive: Arc<dyn MediaPrimitive>) -> Self {
        self.primitive = Some(primitive);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn UiDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// The player keeps only a weak reference; the caller owns the delegate.
    pub fn delegate<D>(mut self, delegate: &Arc<D>) -> Self
    where
        D: PlayerDelegate + 'static,
    {
        self.delegate = Some(Arc::downgrade(delegate) as Weak<dyn PlayerDelegate>);
        self
    }

    pub fn indicator(mut self, indicator: Arc<dyn ActivityIndicator>) -> Self {
        self.indicator = Some(indicator);
        self
    }

    pub fn overlay_host(mut self, host: Arc<dyn OverlayHost>) -> Self {
        self.overlay_host = Some(host);
        self
    }

    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Build the player, register its status observer and apply the
    /// construction policy: `start()` with `auto_start`, `stop()` otherwise.
    pub fn build(self) -> Result<Player> {
        self.config.validate().map_err(PlaybackError::InvalidConfig)?;

        let item = self.item.ok_or_else(|| {
            PlaybackError::capability_missing(
                "media_item",
                "Call PlayerBuilder::item() with the item to play",
            )
        })?;
        let primitive = self.primitive.ok_or_else(|| {
            PlaybackError::capability_missing(
                "media_primitive",
                "Call PlayerBuilder::primitive() with the platform playback engine",
            )
        })?;
        let dispatcher = self.dispatcher.ok_or_else(|| {
            PlaybackError::capability_missing(
                "ui_dispatcher",
                "Call PlayerBuilder::dispatcher(); on desktop use bridge_desktop::MainThreadDispatcher",
            )
        })?;
        let runtime = self.runtime.or_else(current_handle).ok_or_else(|| {
            PlaybackError::capability_missing(
                "async_runtime",
                "Build inside a Tokio runtime or pass PlayerBuilder::runtime()",
            )
        })?;

        let id = PlayerId::new();
        let notifier = EventNotifier::new(id, self.delegate, self.indicator, self.event_bus);
        let auto_start = self.config.auto_start;

        let player = Player::assemble(PlayerParts {
            id,
            config: self.config,
            item,
            primitive,
            dispatcher,
            runtime,
            notifier,
            overlay_host: self.overlay_host,
        });

        if auto_start {
            player.start()?;
        } else {
            player.stop()?;
        }
        Ok(player)
    }
}
