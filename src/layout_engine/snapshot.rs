use std::ops::Index;

use bitflags::bitflags;
use slotmap::{SecondaryMap, SlotMap};
use tracing::warn;

use crate::common::geometry::Rect;
use crate::layout_engine::graph::{
    EditorAreaState, FrameState, LayoutNodeKind, Orientation, PanelKind, Side,
};
use crate::model::{EditorArea, LayoutModel, MainWindow, NodeData, NodeId, PanelData};

slotmap::new_key_type! {
    /// Identifies a snapshot within one [`WindowSystemSnapshot`].
    pub struct SnapshotId;
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Visibility: u8 {
        /// Shown as a sibling in its parent's rendered split.
        const VISIBLE_IN_SPLIT = 1 << 0;
        /// This node or something below it is shown.
        const HAS_VISIBLE_DESCENDANT = 1 << 1;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub originator: NodeId,
    /// Only set when the parent is a split.
    pub parent: Option<SnapshotId>,
    pub visibility: Visibility,
    pub resize_weight: f64,
    pub kind: SnapshotKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotKind {
    Split(SplitSnapshot),
    Panel(PanelSnapshot),
    EditorRegion {
        child: Option<SnapshotId>,
        bounds: Rect,
        state: EditorAreaState,
    },
    Sliding(SlidingSnapshot),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitSnapshot {
    pub orientation: Orientation,
    pub children: Vec<SnapshotId>,
    /// Weight of each child within this split, index-aligned with `children`.
    pub weights: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelSnapshot {
    pub name: String,
    pub kind: PanelKind,
    pub bounds: Rect,
    pub frame_state: FrameState,
    pub documents: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlidingSnapshot {
    pub name: String,
    pub side: Side,
    pub bounds: Rect,
    pub frame_state: FrameState,
    pub slide_in_size: Option<f64>,
    pub documents: Vec<String>,
    pub selected: Option<String>,
}

impl Snapshot {
    pub fn kind(&self) -> LayoutNodeKind {
        match self.kind {
            SnapshotKind::Split(_) => LayoutNodeKind::Split,
            SnapshotKind::Panel(_) => LayoutNodeKind::Panel,
            SnapshotKind::EditorRegion { .. } => LayoutNodeKind::EditorRegion,
            SnapshotKind::Sliding(_) => LayoutNodeKind::Sliding,
        }
    }

    pub fn is_visible_in_split(&self) -> bool {
        self.visibility.contains(Visibility::VISIBLE_IN_SPLIT)
    }

    pub fn has_visible_descendant(&self) -> bool {
        self.visibility.contains(Visibility::HAS_VISIBLE_DESCENDANT)
    }

    pub fn as_split(&self) -> Option<&SplitSnapshot> {
        match &self.kind {
            SnapshotKind::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn orientation(&self) -> Option<Orientation> { self.as_split().map(|s| s.orientation) }
}

/// Immutable capture of a whole [`LayoutModel`], rebuilt on every change.
#[derive(Clone, Debug)]
pub struct WindowSystemSnapshot {
    snapshots: SlotMap<SnapshotId, Snapshot>,
    by_originator: SecondaryMap<NodeId, SnapshotId>,
    pub split_root: Option<SnapshotId>,
    pub separate: Vec<SnapshotId>,
    pub sliding: Vec<SnapshotId>,
    pub active: Option<NodeId>,
    pub maximized: Option<NodeId>,
    pub main_window: MainWindow,
    pub editor_area: EditorArea,
}

impl WindowSystemSnapshot {
    /// Captures every node of `model`. Returns `None` for an empty model.
    pub fn build(model: &LayoutModel) -> Option<Self> {
        if model.is_empty() {
            return None;
        }
        let mut builder = Builder {
            model,
            snapshots: SlotMap::with_key(),
            by_originator: SecondaryMap::new(),
        };
        let split_root = model.root().and_then(|root| builder.build_node(root));
        let separate =
            model.separate_panels().iter().filter_map(|&n| builder.build_node(n)).collect();
        let sliding =
            model.sliding_panels().iter().filter_map(|&n| builder.build_node(n)).collect();
        Some(WindowSystemSnapshot {
            snapshots: builder.snapshots,
            by_originator: builder.by_originator,
            split_root,
            separate,
            sliding,
            active: model.active_panel(),
            maximized: model.maximized_panel(),
            main_window: *model.main_window(),
            editor_area: *model.editor_area(),
        })
    }

    pub fn get(&self, id: SnapshotId) -> Option<&Snapshot> { self.snapshots.get(id) }

    pub fn len(&self) -> usize { self.snapshots.len() }

    pub fn is_empty(&self) -> bool { self.snapshots.is_empty() }

    pub fn find(&self, originator: NodeId) -> Option<SnapshotId> {
        self.by_originator.get(originator).copied()
    }

    /// Weight of `id` within its parent split.
    pub fn weight_in_parent(&self, id: SnapshotId) -> Option<f64> {
        let split = self.get(self.get(id)?.parent?)?.as_split()?;
        let idx = split.children.iter().position(|&c| c == id)?;
        split.weights.get(idx).copied()
    }

    /// Children of `split` with a visible descendant, with their weights.
    pub fn visible_children(
        &self,
        split: SnapshotId,
    ) -> impl Iterator<Item = (SnapshotId, f64)> + '_ {
        self.get(split)
            .and_then(Snapshot::as_split)
            .into_iter()
            .flat_map(|s| s.children.iter().copied().zip(s.weights.iter().copied()))
            .filter(|&(child, _)| self.snapshots[child].has_visible_descendant())
    }

    /// The nearest ancestor of `id` that is shown in its split, along with
    /// the child of that ancestor on the path from `id`.
    pub fn visible_parent(&self, id: SnapshotId) -> Option<(SnapshotId, SnapshotId)> {
        let mut cur = id;
        loop {
            let parent = self.get(cur)?.parent?;
            if self.get(parent)?.is_visible_in_split() {
                return Some((cur, parent));
            }
            cur = parent;
        }
    }

    pub fn draw_tree(&self) -> String {
        let mut out = String::new();
        let roots = self.split_root.iter().chain(&self.separate).chain(&self.sliding);
        for &root in roots {
            let _ = ascii_tree::write_tree(&mut out, &self.get_ascii_tree(root));
        }
        out
    }

    fn get_ascii_tree(&self, id: SnapshotId) -> ascii_tree::Tree {
        let Some(snap) = self.get(id) else {
            return ascii_tree::Tree::Leaf(vec![format!("{id:?} <missing>")]);
        };
        let flags = match (snap.is_visible_in_split(), snap.has_visible_descendant()) {
            (true, _) => "visible",
            (false, true) => "collapsed",
            (false, false) => "hidden",
        };
        let weight = self.weight_in_parent(id).map(|w| format!(" w={w}")).unwrap_or_default();
        let (desc, children) = match &snap.kind {
            SnapshotKind::Split(split) => {
                (format!("Split({})", split.orientation), split.children.clone())
            }
            SnapshotKind::Panel(p) => (format!("Panel {:?}", p.name), vec![]),
            SnapshotKind::EditorRegion { child, .. } => {
                ("EditorRegion".to_owned(), child.iter().copied().collect())
            }
            SnapshotKind::Sliding(s) => (format!("Sliding {:?} {}", s.name, s.side), vec![]),
        };
        let desc = format!("{desc} {:?} [{flags}]{weight}", snap.originator);
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            let children = children.into_iter().map(|c| self.get_ascii_tree(c)).collect();
            ascii_tree::Tree::Node(desc, children)
        }
    }
}

impl Index<SnapshotId> for WindowSystemSnapshot {
    type Output = Snapshot;

    #[track_caller]
    fn index(&self, id: SnapshotId) -> &Snapshot { &self.snapshots[id] }
}

struct Builder<'a> {
    model: &'a LayoutModel,
    snapshots: SlotMap<SnapshotId, Snapshot>,
    by_originator: SecondaryMap<NodeId, SnapshotId>,
}

impl Builder<'_> {
    fn build_node(&mut self, node: NodeId) -> Option<SnapshotId> {
        let model = self.model;
        let Some(info) = model.node(node) else {
            warn!(?node, "Layout node has no data; skipping");
            return None;
        };
        let (kind, visibility) = match &info.data {
            NodeData::Split { orientation } => {
                let mut children = Vec::new();
                let mut weights = Vec::new();
                for child in model.children(node) {
                    let Some(id) = self.build_node(child) else { continue };
                    children.push(id);
                    weights.push(model.node(child).map_or(0.0, |i| i.split_weight));
                }
                let shown = children
                    .iter()
                    .filter(|&&c| self.snapshots[c].has_visible_descendant())
                    .count();
                let mut visibility = Visibility::empty();
                visibility.set(Visibility::HAS_VISIBLE_DESCENDANT, shown > 0);
                visibility.set(Visibility::VISIBLE_IN_SPLIT, shown > 1);
                let split = SplitSnapshot { orientation: *orientation, children, weights };
                (SnapshotKind::Split(split), visibility)
            }
            NodeData::Panel(panel) => {
                let visibility =
                    if panel_visible(panel) { Visibility::all() } else { Visibility::empty() };
                (
                    SnapshotKind::Panel(PanelSnapshot {
                        name: panel.name.clone(),
                        kind: panel.kind,
                        bounds: panel.bounds,
                        frame_state: panel.frame_state,
                        documents: panel.documents.opened().to_vec(),
                        selected: panel.documents.selected().map(str::to_owned),
                    }),
                    visibility,
                )
            }
            NodeData::EditorRegion => {
                let child = model.children(node).next().and_then(|c| self.build_node(c));
                let area = model.editor_area();
                (
                    SnapshotKind::EditorRegion {
                        child,
                        bounds: area.bounds,
                        state: area.state,
                    },
                    Visibility::all(),
                )
            }
            NodeData::Sliding(sliding) => (
                SnapshotKind::Sliding(SlidingSnapshot {
                    name: sliding.name.clone(),
                    side: sliding.side,
                    bounds: sliding.bounds,
                    frame_state: sliding.frame_state,
                    slide_in_size: sliding.slide_in_size(),
                    documents: sliding.documents.opened().to_vec(),
                    selected: sliding.documents.selected().map(str::to_owned),
                }),
                Visibility::all(),
            ),
        };

        let children = match &kind {
            SnapshotKind::Split(split) => split.children.clone(),
            _ => Vec::new(),
        };
        let id = self.snapshots.insert(Snapshot {
            originator: node,
            parent: None,
            visibility,
            resize_weight: info.resize_weight,
            kind,
        });
        for child in children {
            self.snapshots[child].parent = Some(id);
        }
        self.by_originator.insert(node, id);
        Some(id)
    }
}

fn panel_visible(panel: &PanelData) -> bool {
    let permanent_editor = panel.kind == PanelKind::Editor && panel.permanent;
    !panel.minimized && (!panel.documents.is_empty() || permanent_editor)
}
