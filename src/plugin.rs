use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::Error;
use crate::config::Config;
use crate::event::{EventContext, EventKind};

/// The name of a plugin.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Name(pub &'static str);
/// The author of a plugin.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Author(pub &'static str);
/// The version of a plugin.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Version(pub &'static str);

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Relays like commands to the OneBot API
pub mod send_like;

/// Common includes used in plugins.
#[allow(unused)]
mod prelude {
    pub use super::{Author, EventHandler, Name, Plugin, Version};
    pub use crate::Error as SendLikeError;
    pub use crate::command::Command as ChatCommand;
    pub use crate::config::Config;
    pub use crate::event::{EventContext, EventKind, MessageEvent};
    pub use async_trait::async_trait;
}

/// The base trait that all plugins must implement.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Returns the name of the plugin.
    fn name() -> Name
    where
        Self: Sized;

    /// Returns the author of the plugin.
    fn author() -> Author
    where
        Self: Sized;

    /// Returns the version of the plugin.
    fn version() -> Version
    where
        Self: Sized;

    /// The constructor for a new plugin.
    fn new(config: &Config) -> Self
    where
        Self: Sized;

    /// Returns the kinds of events the plugin handles.
    fn events() -> &'static [EventKind]
    where
        Self: Sized,
    {
        &[]
    }

    /// Called once after the plugin has been registered, before any event is dispatched.
    async fn initialize(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Called once when the host shuts down.
    async fn shutdown(&self) {}
}

/// A handler for dispatched events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles the event in `ctx`.
    async fn handle(&self, ctx: &mut EventContext) -> Result<(), Error>;
}

/// Plugin registry.
#[derive(Default)]
pub struct Registry {
    /// List of loaded plugins.
    pub plugins: Vec<Arc<dyn Plugin>>,
    /// Event handlers, in subscription order, per event kind.
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl Registry {
    /// Constructs and returns a new, empty plugin registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs and returns a new plugin registry with initialized plugins.
    #[must_use]
    pub fn preloaded(config: &Config) -> Self {
        let mut registry = Self::new();
        debug!("registering plugins");

        registry.register::<send_like::SendLike>(config);

        let num_plugins = registry.plugins.len();
        debug!(%num_plugins, "finished registering plugins");

        registry
    }

    /// Constructs a plugin based on its type and subscribes it to the events it handles.
    pub fn register<P: Plugin + EventHandler + 'static>(&mut self, config: &Config) {
        let plugin = Arc::new(P::new(config));

        for kind in P::events() {
            self.subscribe(*kind, plugin.clone());
        }

        debug!(
            name = %P::name(),
            author = %P::author(),
            version = %P::version(),
            "registered plugin"
        );
        self.plugins.push(plugin);
    }

    /// Subscribes `handler` to events of the given `kind`.
    pub fn subscribe(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Returns the number of handlers subscribed to events of the given `kind`.
    #[must_use]
    pub fn num_handlers(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Initializes all registered plugins.
    ///
    /// # Errors
    ///
    /// Returns the error of the first plugin that fails to initialize.
    pub async fn initialize(&self) -> Result<(), Error> {
        for plugin in &self.plugins {
            plugin.initialize().await?;
        }

        Ok(())
    }

    /// Dispatches the event in `ctx` to the handlers subscribed to its kind.
    ///
    /// Handlers are called in subscription order until one of them prevents the default handling.
    ///
    /// # Errors
    ///
    /// Returns the error of the first handler that fails.
    pub async fn dispatch(&self, ctx: &mut EventContext) -> Result<(), Error> {
        let kind = ctx.event().kind;
        let Some(handlers) = self.handlers.get(&kind) else {
            return Ok(());
        };

        debug!(%kind, num_handlers = handlers.len(), "dispatching event");

        for handler in handlers {
            handler.handle(ctx).await?;

            if ctx.is_default_prevented() {
                break;
            }
        }

        Ok(())
    }

    /// Shuts down all registered plugins in reverse registration order.
    pub async fn shutdown(&self) {
        for plugin in self.plugins.iter().rev() {
            plugin.shutdown().await;
        }

        info!("all plugins shut down");
    }
}
