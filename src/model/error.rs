use thiserror::Error;

use crate::model::tree::NodeId;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("Node {0:?} is not a split")]
    NotASplit(NodeId),
    #[error("Node {0:?} is not a panel")]
    NotAPanel(NodeId),
    #[error("Node {node:?} is not a child of {parent:?}")]
    NotAChild { node: NodeId, parent: NodeId },
    #[error("Node {0:?} cannot be moved or removed on its own")]
    Immovable(NodeId),
    #[error("Moving {0:?} would place it inside its own subtree")]
    WouldCreateCycle(NodeId),
    #[error("The layout already has a root split")]
    RootAlreadySet,
    #[error("The layout already has an editor region")]
    EditorRegionExists,
    #[error("A panel named {0:?} already exists")]
    DuplicateName(String),
    #[error("Floating panel {0:?} needs non-empty bounds")]
    EmptyBounds(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),
    #[error("Document {document:?} is not open in {panel:?}")]
    DocumentNotOpen { panel: String, document: String },
}
