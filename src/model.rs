pub mod error;
pub mod layout_model;
pub mod tree;

pub use error::ModelError;
pub use layout_model::{
    Documents, EditorArea, LayoutModel, MainWindow, NodeData, NodeInfo, PanelData, SlidingData,
    WeightUpdate,
};
pub use tree::NodeId;
