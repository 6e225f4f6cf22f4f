use tracing::debug;

use crate::common::config::ReconcileSettings;
use crate::common::geometry::Rect;
use crate::layout_engine::accessor::{Accessor, SplitAccessor, WindowSystemAccessor};
use crate::layout_engine::snapshot::WindowSystemSnapshot;
use crate::layout_engine::weights;
use crate::model::{LayoutModel, ModelError, NodeId, WeightUpdate};

/// Reconciles the layout model with what the renderer shows.
///
/// Holds no layout state of its own: every call rebuilds from the model it
/// is given.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    settings: ReconcileSettings,
}

impl LayoutEngine {
    pub fn new(settings: &ReconcileSettings) -> Self { LayoutEngine { settings: settings.clone() } }

    /// Snapshots `model` and projects it. `None` means there is nothing to
    /// render.
    pub fn build_accessor_tree(&self, model: &LayoutModel) -> Option<WindowSystemAccessor> {
        let Some(snapshot) = WindowSystemSnapshot::build(model) else {
            debug!("Layout model is empty; nothing to project");
            return None;
        };
        if self.settings.debug_trees {
            debug!("Snapshot\n{}", snapshot.draw_tree().trim());
        }
        let root = WindowSystemAccessor::project(snapshot);
        if self.settings.debug_trees {
            debug!("Accessors\n{}", root.draw_tree().trim());
        }
        Some(root)
    }

    /// See [`weights::correct_weights`]. `split` must belong to `root`.
    pub fn correct_weights(
        &self,
        root: &WindowSystemAccessor,
        split: &SplitAccessor,
        children: &[&Accessor],
        weights: &[f64],
    ) -> Vec<WeightUpdate> {
        let epsilon = self.settings.weight_epsilon;
        weights::correct_weights(root.snapshot(), split, children, weights, epsilon)
    }

    /// The user dragged a divider of `split`: writes the corrected weights to
    /// the model and returns the rebuilt accessor tree.
    pub fn user_moved_split(
        &self,
        model: &mut LayoutModel,
        root: &WindowSystemAccessor,
        split: &SplitAccessor,
        children: &[&Accessor],
        weights: &[f64],
    ) -> Result<Option<WindowSystemAccessor>, ModelError> {
        let updates = self.correct_weights(root, split, children, weights);
        debug!(split = ?split.originator, updates = updates.len(), "User moved split");
        model.set_split_weights(&updates)?;
        Ok(self.build_accessor_tree(model))
    }

    /// Records new main window bounds for the current editor area state.
    pub fn user_resized_main_window(
        &self,
        model: &mut LayoutModel,
        bounds: Rect,
    ) -> Option<WindowSystemAccessor> {
        debug!(?bounds, state = ?model.editor_area().state, "User resized main window");
        model.set_main_window_bounds(bounds);
        self.build_accessor_tree(model)
    }

    /// Records new bounds for a separate or sliding panel.
    pub fn user_resized_panel(
        &self,
        model: &mut LayoutModel,
        panel: NodeId,
        bounds: Rect,
    ) -> Result<Option<WindowSystemAccessor>, ModelError> {
        debug!(?panel, ?bounds, "User resized panel");
        model.set_panel_bounds(panel, bounds)?;
        Ok(self.build_accessor_tree(model))
    }
}
