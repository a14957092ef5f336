//! Event Bus implementation.
//!
//! Provides the typed, per-owner `EventBus` used by containers to publish
//! move and drag notifications to registered handlers.

use parking_lot::RwLock;
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// An event that can travel over an [`EventBus`].
pub trait BusEvent: Clone + Send + Sync + 'static {
    /// Coarse classification used by [`EventFilter`].
    type Category: Copy + PartialEq + fmt::Debug + Send + Sync + 'static;

    fn category(&self) -> Self::Category;
}

/// Filter to receive only specific event types
#[derive(Debug, Clone)]
pub enum EventFilter<C> {
    /// Receive all events.
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<C>),
}

impl<C> Default for EventFilter<C> {
    fn default() -> Self {
        EventFilter::All
    }
}

impl<C: PartialEq> EventFilter<C> {
    /// Filter accepting a single category
    pub fn only(category: C) -> Self {
        EventFilter::Categories(vec![category])
    }

    /// Check if a category matches this filter
    pub fn matches(&self, category: &C) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(category),
        }
    }
}

/// Type alias for event handler functions
type EventHandler<E> = Box<dyn Fn(E) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
    /// How long to retain events in history.
    pub history_retention: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 256,
            history_retention: Duration::from_secs(300),
        }
    }
}

/// Event with timestamp for history
#[derive(Debug, Clone)]
struct TimestampedEvent<E> {
    event: E,
    timestamp: Instant,
}

/// Registered handler with its filter.
struct Registration<E: BusEvent> {
    id: SubscriptionId,
    filter: EventFilter<E::Category>,
    handler: EventHandler<E>,
}

/// Typed publish/subscribe hub.
///
/// Handlers run synchronously on the publishing thread, in registration
/// order. A handler must not subscribe to or unsubscribe from the bus that
/// is invoking it.
pub struct EventBus<E: BusEvent> {
    /// Registered synchronous handlers
    handlers: RwLock<Vec<Registration<E>>>,
    /// Event history (optional)
    history: RwLock<VecDeque<TimestampedEvent<E>>>,
    /// Configuration
    config: EventBusConfig,
}

impl<E: BusEvent> EventBus<E> {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            history: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Publish an event to all matching handlers
    ///
    /// Returns the number of handlers that received the event.
    pub fn publish(&self, event: E) -> usize {
        if self.config.enable_history {
            self.add_to_history(&event);
        }

        let category = event.category();
        let handlers = self.handlers.read();
        let mut delivered = 0;
        for registration in handlers.iter() {
            if registration.filter.matches(&category) {
                (registration.handler)(event.clone());
                delivered += 1;
            }
        }
        delivered
    }

    /// Subscribe to events with a synchronous handler
    pub fn subscribe<F>(&self, filter: EventFilter<E::Category>, handler: F) -> SubscriptionId
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().push(Registration {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|registration| registration.id != id);
        let removed = handlers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Drop every handler
    pub fn clear(&self) {
        self.handlers.write().clear();
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Get recent event history (if enabled)
    ///
    /// Returns events since the given instant, or all history if None.
    pub fn history(&self, since: Option<Instant>) -> Vec<E> {
        if !self.config.enable_history {
            return Vec::new();
        }

        let history = self.history.read();
        match since {
            Some(since) => history
                .iter()
                .filter(|e| e.timestamp >= since)
                .map(|e| e.event.clone())
                .collect(),
            None => history.iter().map(|e| e.event.clone()).collect(),
        }
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Add an event to history, maintaining size and age limits
    fn add_to_history(&self, event: &E) {
        let mut history = self.history.write();
        let now = Instant::now();

        history.push_back(TimestampedEvent {
            event: event.clone(),
            timestamp: now,
        });

        let retention = self.config.history_retention;
        while history
            .front()
            .is_some_and(|e| now.duration_since(e.timestamp) > retention)
        {
            history.pop_front();
        }

        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
