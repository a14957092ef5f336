//! # Event Bus Module
//!
//! Typed publish/subscribe used by wires containers to announce moves and
//! drag gestures, and the `SubscriptionId` token shared by every
//! registration in the workspace (scene attribute listeners included).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wirekit_core::event_bus::{EventBus, EventFilter};
//!
//! let bus = EventBus::<WiresEvent>::new();
//! let subscription = bus.subscribe(EventFilter::only(WiresEventKind::Move), |event| {
//!     println!("moved: {:?}", event);
//! });
//!
//! bus.publish(event);
//! bus.unsubscribe(subscription);
//! ```

mod bus;

pub use bus::*;
