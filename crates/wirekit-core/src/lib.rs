//! # WireKit Core
//!
//! Core types and utilities for WireKit.
//! Provides the error taxonomy, planar geometry, identity allocation and the
//! typed event bus shared by the scene substrate and the wires containers.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod id;

pub use error::{ContainerError, Error, LayoutError, Result, SceneError};

pub use event_bus::{BusEvent, EventBus, EventBusConfig, EventFilter, SubscriptionId};

pub use geometry::{BoundingBox, Point};

pub use id::{IdAllocator, SequentialAllocator, UuidAllocator};
