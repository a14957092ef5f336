//! # WireKit Scene
//!
//! In-memory drawable substrate for the wires containers: a tree of groups
//! and primitives with frames, per-attribute change listeners, a coalescing
//! change batcher and a drag gesture source.

pub mod batcher;
pub mod node;
pub mod scene;

pub use batcher::AttributeChangeBatcher;
pub use node::{moves_position, resizes_frame, Attribute, NodeId, NodeKind, TRANSFORMING_ATTRIBUTES};
pub use scene::{AttributeNotification, DragNotification, DragPhase, Scene, SceneResult};
