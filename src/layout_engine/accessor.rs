//! Renderer-facing projection of a [`WindowSystemSnapshot`].
//!
//! Splits that show fewer than two children disappear, and a split nested
//! directly in a split of the same orientation is flattened into its parent
//! with its weights scaled by the slot it occupied.

use crate::common::geometry::Rect;
use crate::layout_engine::graph::{
    EditorAreaState, FrameState, LayoutNodeKind, Orientation, PanelKind, Side,
};
use crate::layout_engine::snapshot::{SnapshotId, SnapshotKind, WindowSystemSnapshot};
use crate::model::{EditorArea, MainWindow, NodeId};

#[derive(Clone, Debug, PartialEq)]
pub enum Accessor {
    Split(SplitAccessor),
    Panel(PanelAccessor),
    EditorRegion(EditorAccessor),
    Sliding(SlidingAccessor),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitAccessor {
    pub originator: NodeId,
    pub snapshot: SnapshotId,
    pub orientation: Orientation,
    /// Always at least two, none a split of the same orientation.
    pub children: Vec<Accessor>,
    pub weights: Vec<f64>,
    pub resize_weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelAccessor {
    pub originator: NodeId,
    pub snapshot: SnapshotId,
    pub name: String,
    pub kind: PanelKind,
    pub bounds: Rect,
    pub frame_state: FrameState,
    pub documents: Vec<String>,
    pub selected: Option<String>,
    pub resize_weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditorAccessor {
    pub originator: NodeId,
    pub snapshot: SnapshotId,
    pub bounds: Rect,
    pub state: EditorAreaState,
    pub child: Option<Box<Accessor>>,
    pub resize_weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlidingAccessor {
    pub originator: NodeId,
    pub snapshot: SnapshotId,
    pub name: String,
    pub side: Side,
    pub bounds: Rect,
    pub frame_state: FrameState,
    pub slide_in_size: Option<f64>,
    pub documents: Vec<String>,
    pub selected: Option<String>,
    pub resize_weight: f64,
}

impl Accessor {
    pub fn kind(&self) -> LayoutNodeKind {
        match self {
            Accessor::Split(_) => LayoutNodeKind::Split,
            Accessor::Panel(_) => LayoutNodeKind::Panel,
            Accessor::EditorRegion(_) => LayoutNodeKind::EditorRegion,
            Accessor::Sliding(_) => LayoutNodeKind::Sliding,
        }
    }

    pub fn originator(&self) -> NodeId {
        match self {
            Accessor::Split(a) => a.originator,
            Accessor::Panel(a) => a.originator,
            Accessor::EditorRegion(a) => a.originator,
            Accessor::Sliding(a) => a.originator,
        }
    }

    pub fn snapshot(&self) -> SnapshotId {
        match self {
            Accessor::Split(a) => a.snapshot,
            Accessor::Panel(a) => a.snapshot,
            Accessor::EditorRegion(a) => a.snapshot,
            Accessor::Sliding(a) => a.snapshot,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Accessor::Panel(a) => Some(&a.name),
            Accessor::Sliding(a) => Some(&a.name),
            Accessor::Split(_) | Accessor::EditorRegion(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitAccessor> {
        match self {
            Accessor::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Accessor] {
        match self {
            Accessor::Split(split) => &split.children,
            Accessor::EditorRegion(editor) => {
                editor.child.as_deref().map(std::slice::from_ref).unwrap_or_default()
            }
            Accessor::Panel(_) | Accessor::Sliding(_) => &[],
        }
    }

    /// Preorder walk over this accessor and everything below it.
    pub fn iter(&self) -> impl Iterator<Item = &Accessor> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children().iter().rev());
            Some(next)
        })
    }

    /// Projects the snapshot `id` and everything below it.
    pub fn project(snapshots: &WindowSystemSnapshot, id: SnapshotId) -> Option<Accessor> {
        let snap = snapshots.get(id)?;
        let resize_weight = snap.resize_weight;
        let originator = snap.originator;
        match &snap.kind {
            SnapshotKind::EditorRegion { child, bounds, state } => {
                let child = child.and_then(|c| Accessor::project(snapshots, c)).map(Box::new);
                Some(Accessor::EditorRegion(EditorAccessor {
                    originator,
                    snapshot: id,
                    bounds: *bounds,
                    state: *state,
                    child,
                    resize_weight,
                }))
            }
            SnapshotKind::Sliding(s) => Some(Accessor::Sliding(SlidingAccessor {
                originator,
                snapshot: id,
                name: s.name.clone(),
                side: s.side,
                bounds: s.bounds,
                frame_state: s.frame_state,
                slide_in_size: s.slide_in_size,
                documents: s.documents.clone(),
                selected: s.selected.clone(),
                resize_weight,
            })),
            SnapshotKind::Split(_) if !snap.is_visible_in_split() => {
                // At most one child has anything to show; the split itself vanishes.
                let (child, _) = snapshots.visible_children(id).next()?;
                Accessor::project(snapshots, child)
            }
            _ if !snap.is_visible_in_split() => None,
            SnapshotKind::Panel(p) => Some(Accessor::Panel(PanelAccessor {
                originator,
                snapshot: id,
                name: p.name.clone(),
                kind: p.kind,
                bounds: p.bounds,
                frame_state: p.frame_state,
                documents: p.documents.clone(),
                selected: p.selected.clone(),
                resize_weight,
            })),
            SnapshotKind::Split(split) => {
                let mut children = Vec::new();
                let mut weights = Vec::new();
                for (child, weight) in snapshots.visible_children(id) {
                    match Accessor::project(snapshots, child) {
                        Some(Accessor::Split(inner)) if inner.orientation == split.orientation => {
                            weights.extend(inner.weights.iter().map(|w| w * weight));
                            children.extend(inner.children);
                        }
                        Some(other) => {
                            children.push(other);
                            weights.push(weight);
                        }
                        None => {}
                    }
                }
                match children.len() {
                    0 => None,
                    1 => children.pop(),
                    _ => Some(Accessor::Split(SplitAccessor {
                        originator,
                        snapshot: id,
                        orientation: split.orientation,
                        children,
                        weights,
                        resize_weight,
                    })),
                }
            }
        }
    }

    fn get_ascii_tree(&self, weight: Option<f64>) -> ascii_tree::Tree {
        let weight = weight.map(|w| format!(" w={w:.4}")).unwrap_or_default();
        let desc = match self {
            Accessor::Split(s) => format!("Split({})", s.orientation),
            Accessor::Panel(p) => match &p.selected {
                Some(doc) => format!("Panel {:?} ({doc})", p.name),
                None => format!("Panel {:?}", p.name),
            },
            Accessor::EditorRegion(_) => "EditorRegion".to_owned(),
            Accessor::Sliding(s) => format!("Sliding {:?} {}", s.name, s.side),
        };
        let desc = format!("{desc} {:?}{weight}", self.originator());
        let children: Vec<_> = match self {
            Accessor::Split(s) => s
                .children
                .iter()
                .zip(&s.weights)
                .map(|(c, &w)| c.get_ascii_tree(Some(w)))
                .collect(),
            _ => self.children().iter().map(|c| c.get_ascii_tree(None)).collect(),
        };
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }
}

/// Root of the projected window system.
///
/// Owns the snapshot it was projected from so accessors can be traced back
/// through it when weights are corrected.
#[derive(Clone, Debug)]
pub struct WindowSystemAccessor {
    snapshot: WindowSystemSnapshot,
    pub split_root: Option<Accessor>,
    pub separate: Vec<Accessor>,
    pub sliding: Vec<Accessor>,
}

impl WindowSystemAccessor {
    pub fn project(snapshot: WindowSystemSnapshot) -> Self {
        let split_root = snapshot.split_root.and_then(|root| Accessor::project(&snapshot, root));
        let separate =
            snapshot.separate.iter().filter_map(|&id| Accessor::project(&snapshot, id)).collect();
        let sliding =
            snapshot.sliding.iter().filter_map(|&id| Accessor::project(&snapshot, id)).collect();
        WindowSystemAccessor { snapshot, split_root, separate, sliding }
    }

    pub fn snapshot(&self) -> &WindowSystemSnapshot { &self.snapshot }

    /// Every accessor in the split tree, then the separate and sliding sets.
    pub fn accessors(&self) -> impl Iterator<Item = &Accessor> + '_ {
        self.split_root
            .iter()
            .chain(&self.separate)
            .chain(&self.sliding)
            .flat_map(|a| a.iter())
    }

    /// Resolves a named panel to its current accessor.
    pub fn find_mode_accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors().find(|a| a.name() == Some(name))
    }

    pub fn find_by_originator(&self, node: NodeId) -> Option<&Accessor> {
        self.accessors().find(|a| a.originator() == node)
    }

    pub fn active_panel_accessor(&self) -> Option<&Accessor> {
        self.find_by_originator(self.snapshot.active?)
    }

    pub fn maximized_panel_accessor(&self) -> Option<&Accessor> {
        self.find_by_originator(self.snapshot.maximized?)
    }

    pub fn main_window(&self) -> &MainWindow { &self.snapshot.main_window }

    pub fn main_window_bounds(&self) -> Rect {
        match self.snapshot.editor_area.state {
            EditorAreaState::Joined => self.snapshot.main_window.bounds_joined,
            EditorAreaState::Separated => self.snapshot.main_window.bounds_separated,
        }
    }

    pub fn editor_area(&self) -> &EditorArea { &self.snapshot.editor_area }

    pub fn draw_tree(&self) -> String {
        let mut out = String::new();
        for accessor in self.split_root.iter().chain(&self.separate).chain(&self.sliding) {
            let _ = ascii_tree::write_tree(&mut out, &accessor.get_ascii_tree(None));
        }
        out
    }
}
