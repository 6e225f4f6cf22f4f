pub mod accessor;
pub mod engine;
pub mod graph;
pub mod snapshot;
pub mod weights;

pub use accessor::{
    Accessor, EditorAccessor, PanelAccessor, SlidingAccessor, SplitAccessor, WindowSystemAccessor,
};
pub use engine::LayoutEngine;
pub use graph::{EditorAreaState, FrameState, LayoutNodeKind, Orientation, PanelKind, Side};
pub use snapshot::{Snapshot, SnapshotId, SnapshotKind, Visibility, WindowSystemSnapshot};
pub use weights::correct_weights;

pub use crate::model::WeightUpdate;
