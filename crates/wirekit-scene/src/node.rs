//! Drawable nodes and their observable attributes.

use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Handle to a node stored in a [`crate::Scene`].
    pub struct NodeId;
}

/// Observable attribute of a drawable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    X,
    Y,
    Width,
    Height,
    Rotation,
    Draggable,
}

impl Attribute {
    /// Whether this attribute is part of the node's location.
    pub fn is_position(self) -> bool {
        matches!(self, Attribute::X | Attribute::Y)
    }

    /// Whether this attribute is part of the node's frame size.
    pub fn is_size(self) -> bool {
        matches!(self, Attribute::Width | Attribute::Height)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::X => "x",
            Attribute::Y => "y",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::Rotation => "rotation",
            Attribute::Draggable => "draggable",
        };
        f.write_str(name)
    }
}

/// Attributes whose change requires layout recomputation.
pub const TRANSFORMING_ATTRIBUTES: [Attribute; 5] = [
    Attribute::X,
    Attribute::Y,
    Attribute::Width,
    Attribute::Height,
    Attribute::Rotation,
];

/// True when any of the attributes moves the node (the X/Y predicate).
pub fn moves_position(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|a| a.is_position())
}

/// True when any of the attributes resizes the node frame.
pub fn resizes_frame(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|a| a.is_size())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Grouping node; children are positioned relative to it.
    Group,
    /// Leaf drawable.
    Primitive,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub id: Option<String>,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub draggable: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: None,
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            draggable: false,
            parent: None,
            children: Vec::new(),
        }
    }
}
