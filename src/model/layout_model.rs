//! The live, mutable docking layout.
//!
//! This is the only long-lived state in the window layout. Snapshots and
//! accessors are rebuilt from it on every change and point back into it with
//! [`NodeId`] handles; weight corrections flow back in through
//! [`LayoutModel::set_split_weights`].

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::common::collections::HashMap;
use crate::common::config::ReconcileSettings;
use crate::common::geometry::Rect;
use crate::layout_engine::graph::{
    EditorAreaState, FrameState, LayoutNodeKind, Orientation, PanelKind, Side,
};
use crate::model::error::ModelError;
use crate::model::tree::{self, NodeId, NodeMap, Tree};

type Result<T> = std::result::Result<T, ModelError>;

/// A corrected split weight: `node` gets `weight` within its parent split
/// `parent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightUpdate {
    pub node: NodeId,
    pub parent: NodeId,
    pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Documents {
    opened: Vec<String>,
    selected: Option<String>,
}

impl Documents {
    pub fn opened(&self) -> &[String] { &self.opened }

    pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }

    pub fn is_empty(&self) -> bool { self.opened.is_empty() }

    /// Opens `doc` (if needed) and selects it.
    pub fn open(&mut self, doc: impl Into<String>) {
        let doc = doc.into();
        if !self.opened.contains(&doc) {
            self.opened.push(doc.clone());
        }
        self.selected = Some(doc);
    }

    /// Closes `doc`. If it was selected, the document that took its place
    /// (or the new last one) becomes selected.
    pub fn close(&mut self, doc: &str) -> bool {
        let Some(idx) = self.opened.iter().position(|d| d == doc) else {
            return false;
        };
        self.opened.remove(idx);
        if self.selected.as_deref() == Some(doc) {
            let next = idx.min(self.opened.len().saturating_sub(1));
            self.selected = self.opened.get(next).cloned();
        }
        true
    }

    pub fn select(&mut self, doc: &str) -> bool {
        if !self.opened.iter().any(|d| d == doc) {
            return false;
        }
        self.selected = Some(doc.to_owned());
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelData {
    pub name: String,
    pub kind: PanelKind,
    /// Permanent editor panels stay visible even with no open documents.
    pub permanent: bool,
    pub minimized: bool,
    pub bounds: Rect,
    pub frame_state: FrameState,
    pub documents: Documents,
}

impl PanelData {
    pub fn view(name: impl Into<String>) -> Self {
        PanelData { name: name.into(), ..Default::default() }
    }

    pub fn editor(name: impl Into<String>) -> Self {
        PanelData {
            name: name.into(),
            kind: PanelKind::Editor,
            permanent: true,
            ..Default::default()
        }
    }

    pub fn with_document(mut self, doc: impl Into<String>) -> Self {
        self.documents.open(doc);
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlidingData {
    pub name: String,
    pub side: Side,
    pub bounds: Rect,
    pub frame_state: FrameState,
    /// Last extent the user slid the panel in to, along its side's axis,
    /// keyed by the document selected at the time.
    pub slide_in_sizes: HashMap<Option<String>, f64>,
    pub documents: Documents,
}

impl SlidingData {
    pub fn new(name: impl Into<String>, side: Side) -> Self {
        SlidingData {
            name: name.into(),
            side,
            bounds: Rect::default(),
            frame_state: FrameState::default(),
            slide_in_sizes: HashMap::default(),
            documents: Documents::default(),
        }
    }

    pub fn with_document(mut self, doc: impl Into<String>) -> Self {
        self.documents.open(doc);
        self
    }

    /// Slide-in size remembered for the currently selected document.
    pub fn slide_in_size(&self) -> Option<f64> {
        let selected = self.documents.selected().map(str::to_owned);
        self.slide_in_sizes.get(&selected).copied()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    Split { orientation: Orientation },
    Panel(PanelData),
    EditorRegion,
    Sliding(SlidingData),
}

impl NodeData {
    pub fn kind(&self) -> LayoutNodeKind {
        match self {
            NodeData::Split { .. } => LayoutNodeKind::Split,
            NodeData::Panel(_) => LayoutNodeKind::Panel,
            NodeData::EditorRegion => LayoutNodeKind::EditorRegion,
            NodeData::Sliding(_) => LayoutNodeKind::Sliding,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NodeData::Panel(p) => Some(&p.name),
            NodeData::Sliding(s) => Some(&s.name),
            NodeData::Split { .. } | NodeData::EditorRegion => None,
        }
    }

    fn documents_mut(&mut self) -> Option<&mut Documents> {
        match self {
            NodeData::Panel(p) => Some(&mut p.documents),
            NodeData::Sliding(s) => Some(&mut s.documents),
            NodeData::Split { .. } | NodeData::EditorRegion => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    pub data: NodeData,
    /// Weight within the parent split. Not normalized.
    pub split_weight: f64,
    pub resize_weight: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MainWindow {
    pub bounds_joined: Rect,
    pub bounds_separated: Rect,
    pub frame_state_joined: FrameState,
    pub frame_state_separated: FrameState,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EditorArea {
    pub state: EditorAreaState,
    pub bounds: Rect,
    pub frame_state: FrameState,
}

pub struct LayoutModel {
    tree: Tree<Components>,
    main_window: MainWindow,
    editor_area: EditorArea,
    default_split_weight: f64,
    default_resize_weight: f64,
}

impl Default for LayoutModel {
    fn default() -> Self { Self::new(&ReconcileSettings::default()) }
}

impl LayoutModel {
    pub fn new(settings: &ReconcileSettings) -> Self {
        LayoutModel {
            tree: Tree::with_observer(Components::default()),
            main_window: MainWindow::default(),
            editor_area: EditorArea::default(),
            default_split_weight: settings.default_split_weight,
            default_resize_weight: settings.default_resize_weight,
        }
    }

    pub fn is_empty(&self) -> bool {
        let c = &self.tree.data;
        c.root.is_none() && c.separate.is_empty() && c.sliding.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> { self.tree.data.root }

    pub fn separate_panels(&self) -> &[NodeId] { &self.tree.data.separate }

    pub fn sliding_panels(&self) -> &[NodeId] { &self.tree.data.sliding }

    pub fn editor_region(&self) -> Option<NodeId> { self.tree.data.editor_region }

    pub fn active_panel(&self) -> Option<NodeId> { self.tree.data.active }

    pub fn maximized_panel(&self) -> Option<NodeId> { self.tree.data.maximized }

    pub fn main_window(&self) -> &MainWindow { &self.main_window }

    pub fn editor_area(&self) -> &EditorArea { &self.editor_area }

    pub fn node(&self, node: NodeId) -> Option<&NodeInfo> { self.tree.data.info.get(node) }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> { node.parent(self.map()) }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(self.map())
    }

    pub fn find_panel(&self, name: &str) -> Option<NodeId> {
        self.tree.data.names.get(name).copied()
    }

    pub fn set_root_split(&mut self, orientation: Orientation) -> Result<NodeId> {
        if self.tree.data.root.is_some() {
            return Err(ModelError::RootAlreadySet);
        }
        let root = self.mk_detached(NodeData::Split { orientation }, None);
        self.tree.data.root = Some(root);
        Ok(root)
    }

    pub fn add_split(
        &mut self,
        parent: NodeId,
        orientation: Orientation,
        weight: Option<f64>,
    ) -> Result<NodeId> {
        self.check_split(parent)?;
        let weight = self.check_weight(weight)?;
        Ok(self.mk_child(parent, NodeData::Split { orientation }, weight))
    }

    pub fn add_panel(
        &mut self,
        parent: NodeId,
        panel: PanelData,
        weight: Option<f64>,
    ) -> Result<NodeId> {
        self.check_split(parent)?;
        let weight = self.check_weight(weight)?;
        self.check_name(&panel.name)?;
        Ok(self.mk_child(parent, NodeData::Panel(panel), weight))
    }

    /// Adds the editor region under `parent` together with the split it
    /// wraps. Returns `(region, inner_split)`.
    pub fn add_editor_region(
        &mut self,
        parent: NodeId,
        inner: Orientation,
        weight: Option<f64>,
    ) -> Result<(NodeId, NodeId)> {
        if self.tree.data.editor_region.is_some() {
            return Err(ModelError::EditorRegionExists);
        }
        self.check_split(parent)?;
        let weight = self.check_weight(weight)?;
        let region = self.mk_child(parent, NodeData::EditorRegion, weight);
        let inner = self.mk_child(region, NodeData::Split { orientation: inner }, 1.0);
        self.tree.data.editor_region = Some(region);
        Ok((region, inner))
    }

    pub fn add_sliding(&mut self, sliding: SlidingData) -> Result<NodeId> {
        self.check_name(&sliding.name)?;
        let node = self.mk_detached(NodeData::Sliding(sliding), None);
        self.tree.data.sliding.push(node);
        Ok(node)
    }

    /// Adds a panel living in its own window outside the split tree.
    pub fn add_separate_panel(&mut self, panel: PanelData) -> Result<NodeId> {
        if panel.bounds.is_empty() {
            return Err(ModelError::EmptyBounds(panel.name));
        }
        self.check_name(&panel.name)?;
        let node = self.mk_detached(NodeData::Panel(panel), None);
        self.tree.data.separate.push(node);
        Ok(node)
    }

    /// Removes `node` and its subtree. The split wrapped by the editor
    /// region can only go away together with the region.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.info(node)?;
        if self.is_editor_inner(node) {
            return Err(ModelError::Immovable(node));
        }
        if self.tree.data.root == Some(node) {
            self.tree.data.root = None;
        }
        debug!(?node, "Removing layout node");
        node.detach(&mut self.tree).remove();
        Ok(())
    }

    /// Moves `node` under the split `new_parent`, at `index` among its
    /// children (clamped to the end).
    ///
    /// Nodes without a parent (the root split, sliding and separate panels)
    /// and the split wrapped by the editor region are immovable.
    pub fn move_node(&mut self, node: NodeId, new_parent: NodeId, index: usize) -> Result<()> {
        self.info(node)?;
        self.check_split(new_parent)?;
        if node.parent(self.map()).is_none() || self.is_editor_inner(node) {
            return Err(ModelError::Immovable(node));
        }
        if new_parent.is_descendant_of(node, self.map()) {
            return Err(ModelError::WouldCreateCycle(node));
        }
        if node.parent(self.map()) == Some(new_parent)
            && node.index_in_parent(self.map()) == Some(index)
        {
            trace!(?node, index, "Node already in place");
            return Ok(());
        }
        let before = new_parent.children(self.map()).filter(|&c| c != node).nth(index);
        let detached = node.detach(&mut self.tree);
        match before {
            Some(sibling) => detached.insert_before(sibling),
            None => detached.push_back(new_parent),
        };
        Ok(())
    }

    pub fn set_split_weight(&mut self, node: NodeId, weight: f64) -> Result<()> {
        let weight = self.check_weight(Some(weight))?;
        self.info_mut(node)?.split_weight = weight;
        Ok(())
    }

    pub fn set_resize_weight(&mut self, node: NodeId, weight: f64) -> Result<()> {
        let weight = self.check_weight(Some(weight))?;
        self.info_mut(node)?.resize_weight = weight;
        Ok(())
    }

    /// Applies a batch of corrected weights. Every update is checked first;
    /// nothing is written unless all of them are valid.
    pub fn set_split_weights(&mut self, updates: &[WeightUpdate]) -> Result<()> {
        for update in updates {
            self.info(update.node)?;
            self.check_weight(Some(update.weight))?;
            if update.node.parent(self.map()) != Some(update.parent) {
                return Err(ModelError::NotAChild { node: update.node, parent: update.parent });
            }
        }
        for update in updates {
            trace!(node = ?update.node, weight = update.weight, "Setting split weight");
            self.info_mut(update.node)?.split_weight = update.weight;
        }
        debug!(count = updates.len(), "Applied split weights");
        Ok(())
    }

    pub fn open_document(&mut self, panel: NodeId, doc: impl Into<String>) -> Result<()> {
        self.documents_mut(panel)?.open(doc);
        Ok(())
    }

    pub fn close_document(&mut self, panel: NodeId, doc: &str) -> Result<()> {
        if self.documents_mut(panel)?.close(doc) {
            Ok(())
        } else {
            Err(self.not_open(panel, doc))
        }
    }

    pub fn select_document(&mut self, panel: NodeId, doc: &str) -> Result<()> {
        if self.documents_mut(panel)?.select(doc) {
            Ok(())
        } else {
            Err(self.not_open(panel, doc))
        }
    }

    pub fn set_minimized(&mut self, panel: NodeId, minimized: bool) -> Result<()> {
        match &mut self.info_mut(panel)?.data {
            NodeData::Panel(p) => {
                p.minimized = minimized;
                Ok(())
            }
            _ => Err(ModelError::NotAPanel(panel)),
        }
    }

    /// Records new bounds for a panel or sliding panel. For sliding panels
    /// the extent along the slide axis is remembered as the slide-in size.
    pub fn set_panel_bounds(&mut self, panel: NodeId, bounds: Rect) -> Result<()> {
        match &mut self.info_mut(panel)?.data {
            NodeData::Panel(p) => p.bounds = bounds,
            NodeData::Sliding(s) => {
                s.bounds = bounds;
                let size = match s.side.orientation() {
                    Orientation::Horizontal => bounds.width,
                    Orientation::Vertical => bounds.height,
                };
                let selected = s.documents.selected().map(str::to_owned);
                s.slide_in_sizes.insert(selected, size);
            }
            _ => return Err(ModelError::NotAPanel(panel)),
        }
        Ok(())
    }

    pub fn set_panel_frame_state(&mut self, panel: NodeId, state: FrameState) -> Result<()> {
        match &mut self.info_mut(panel)?.data {
            NodeData::Panel(p) => p.frame_state = state,
            NodeData::Sliding(s) => s.frame_state = state,
            _ => return Err(ModelError::NotAPanel(panel)),
        }
        Ok(())
    }

    pub fn set_active_panel(&mut self, panel: Option<NodeId>) -> Result<()> {
        if let Some(panel) = panel {
            self.check_panel(panel)?;
        }
        self.tree.data.active = panel;
        Ok(())
    }

    pub fn set_maximized_panel(&mut self, panel: Option<NodeId>) -> Result<()> {
        if let Some(panel) = panel {
            self.check_panel(panel)?;
        }
        self.tree.data.maximized = panel;
        Ok(())
    }

    /// The main window keeps separate bounds for the joined and separated
    /// editor area; the current editor area state decides which is written.
    pub fn set_main_window_bounds(&mut self, bounds: Rect) {
        match self.editor_area.state {
            EditorAreaState::Joined => self.main_window.bounds_joined = bounds,
            EditorAreaState::Separated => self.main_window.bounds_separated = bounds,
        }
    }

    pub fn set_main_window_frame_state(&mut self, state: FrameState) {
        match self.editor_area.state {
            EditorAreaState::Joined => self.main_window.frame_state_joined = state,
            EditorAreaState::Separated => self.main_window.frame_state_separated = state,
        }
    }

    pub fn set_editor_area_state(&mut self, state: EditorAreaState) {
        self.editor_area.state = state;
    }

    pub fn set_editor_area_bounds(&mut self, bounds: Rect) { self.editor_area.bounds = bounds; }

    pub fn set_editor_area_frame_state(&mut self, state: FrameState) {
        self.editor_area.frame_state = state;
    }

    pub fn draw_tree(&self) -> String {
        let mut sections = Vec::new();
        if let Some(root) = self.root() {
            sections.push(self.get_ascii_tree(root));
        }
        let sets = [("separate", self.separate_panels()), ("sliding", self.sliding_panels())];
        for (label, nodes) in sets {
            if !nodes.is_empty() {
                let children = nodes.iter().map(|&n| self.get_ascii_tree(n)).collect();
                sections.push(ascii_tree::Tree::Node(label.to_owned(), children));
            }
        }
        let mut out = String::new();
        for section in sections {
            // Writing into a String cannot fail.
            let _ = ascii_tree::write_tree(&mut out, &section);
        }
        out
    }
}

impl LayoutModel {
    fn map(&self) -> &NodeMap { &self.tree.map }

    fn info(&self, node: NodeId) -> Result<&NodeInfo> {
        self.tree.data.info.get(node).ok_or(ModelError::NodeNotFound(node))
    }

    fn info_mut(&mut self, node: NodeId) -> Result<&mut NodeInfo> {
        self.tree.data.info.get_mut(node).ok_or(ModelError::NodeNotFound(node))
    }

    fn documents_mut(&mut self, panel: NodeId) -> Result<&mut Documents> {
        self.info_mut(panel)?.data.documents_mut().ok_or(ModelError::NotAPanel(panel))
    }

    fn not_open(&self, panel: NodeId, doc: &str) -> ModelError {
        let name = self.node(panel).and_then(|i| i.data.name()).unwrap_or_default();
        ModelError::DocumentNotOpen { panel: name.to_owned(), document: doc.to_owned() }
    }

    fn check_split(&self, node: NodeId) -> Result<()> {
        match self.info(node)?.data {
            NodeData::Split { .. } => Ok(()),
            _ => Err(ModelError::NotASplit(node)),
        }
    }

    fn check_panel(&self, node: NodeId) -> Result<()> {
        match self.info(node)?.data {
            NodeData::Panel(_) | NodeData::Sliding(_) => Ok(()),
            _ => Err(ModelError::NotAPanel(node)),
        }
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.tree.data.names.contains_key(name) {
            return Err(ModelError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    fn check_weight(&self, weight: Option<f64>) -> Result<f64> {
        let weight = weight.unwrap_or(self.default_split_weight);
        if !weight.is_finite() || weight < 0.0 {
            return Err(ModelError::InvalidWeight(weight));
        }
        Ok(weight)
    }

    fn is_editor_inner(&self, node: NodeId) -> bool {
        let region = self.tree.data.editor_region;
        region.is_some() && node.parent(self.map()) == region
    }

    fn mk_detached(&mut self, data: NodeData, weight: Option<f64>) -> NodeId {
        let node = self.tree.mk_node();
        if let Some(name) = data.name() {
            self.tree.data.names.insert(name.to_owned(), node);
        }
        self.tree.data.info.insert(node, NodeInfo {
            data,
            split_weight: weight.unwrap_or(self.default_split_weight),
            resize_weight: self.default_resize_weight,
        });
        node
    }

    fn mk_child(&mut self, parent: NodeId, data: NodeData, weight: f64) -> NodeId {
        let node = self.mk_detached(data, Some(weight));
        node.detach(&mut self.tree).push_back(parent)
    }

    fn get_ascii_tree(&self, node: NodeId) -> ascii_tree::Tree {
        let Some(info) = self.node(node) else {
            return ascii_tree::Tree::Leaf(vec![format!("{node:?} <missing>")]);
        };
        let desc = match &info.data {
            NodeData::Split { orientation } => format!("Split({orientation})"),
            NodeData::Panel(p) => format!("Panel {:?} docs={}", p.name, p.documents.opened().len()),
            NodeData::EditorRegion => "EditorRegion".to_owned(),
            NodeData::Sliding(s) => format!("Sliding {:?} side={}", s.name, s.side),
        };
        let desc = format!("{desc} [weight {}]", info.split_weight);
        let children: Vec<_> = node.children(self.map()).map(|c| self.get_ascii_tree(c)).collect();
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }
}

/// Per-node payloads and the indexes that must follow the tree structure.
#[derive(Default)]
struct Components {
    info: SecondaryMap<NodeId, NodeInfo>,
    names: HashMap<String, NodeId>,
    root: Option<NodeId>,
    editor_region: Option<NodeId>,
    separate: Vec<NodeId>,
    sliding: Vec<NodeId>,
    active: Option<NodeId>,
    maximized: Option<NodeId>,
}

impl tree::Observer for Components {
    fn added_to_forest(&mut self, _map: &NodeMap, node: NodeId) {
        trace!(?node, "Node added to forest");
    }

    fn added_to_parent(&mut self, map: &NodeMap, node: NodeId) {
        debug_assert!(
            node.parent(map).and_then(|p| self.info.get(p)).is_some_and(|p| matches!(
                p.data,
                NodeData::Split { .. } | NodeData::EditorRegion
            )),
            "Only splits and the editor region can have children: {node:?}"
        );
    }

    fn removing_from_parent(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn removed_from_forest(&mut self, _map: &NodeMap, node: NodeId) {
        if let Some(info) = self.info.remove(node)
            && let Some(name) = info.data.name()
        {
            self.names.remove(name);
        }
        let slots = [&mut self.root, &mut self.editor_region, &mut self.active, &mut self.maximized];
        for slot in slots {
            if *slot == Some(node) {
                *slot = None;
            }
        }
        self.separate.retain(|&n| n != node);
        self.sliding.retain(|&n| n != node);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        model: LayoutModel,
        root: NodeId,
        explorer: NodeId,
        region: NodeId,
        inner: NodeId,
        editor: NodeId,
        output: NodeId,
    }

    /// ```text
    /// Split(H)
    /// ├── Panel "explorer" 0.2
    /// ├── EditorRegion 0.6 ── Split(V) ── Panel "editor"
    /// └── Panel "output" 0.2
    /// ```
    fn fixture() -> Fixture {
        let mut model = LayoutModel::default();
        let root = model.set_root_split(Orientation::Horizontal).unwrap();
        let explorer = model
            .add_panel(root, PanelData::view("explorer").with_document("files"), Some(0.2))
            .unwrap();
        let (region, inner) = model.add_editor_region(root, Orientation::Vertical, Some(0.6)).unwrap();
        let editor = model.add_panel(inner, PanelData::editor("editor"), Some(1.0)).unwrap();
        let output = model
            .add_panel(root, PanelData::view("output").with_document("log"), Some(0.2))
            .unwrap();
        Fixture { model, root, explorer, region, inner, editor, output }
    }

    #[test]
    fn build_structure() {
        let f = fixture();
        let children: Vec<_> = f.model.children(f.root).collect();
        assert_eq!(children, vec![f.explorer, f.region, f.output]);
        assert_eq!(f.model.children(f.region).collect::<Vec<_>>(), vec![f.inner]);
        assert_eq!(f.model.parent(f.editor), Some(f.inner));
        assert_eq!(f.model.find_panel("output"), Some(f.output));
        assert_eq!(f.model.editor_region(), Some(f.region));
        assert_eq!(f.model.node(f.explorer).unwrap().split_weight, 0.2);
        assert!(!f.model.is_empty());
    }

    #[test]
    fn default_weights_come_from_settings() {
        let settings = ReconcileSettings {
            default_split_weight: 0.25,
            default_resize_weight: 0.5,
            ..Default::default()
        };
        let mut model = LayoutModel::new(&settings);
        let root = model.set_root_split(Orientation::Vertical).unwrap();
        let panel = model.add_panel(root, PanelData::view("a"), None).unwrap();
        let info = model.node(panel).unwrap();
        assert_eq!(info.split_weight, 0.25);
        assert_eq!(info.resize_weight, 0.5);

        model.set_resize_weight(panel, 1.0).unwrap();
        model.set_split_weight(panel, 0.75).unwrap();
        let info = model.node(panel).unwrap();
        assert_eq!((info.split_weight, info.resize_weight), (0.75, 1.0));
        assert_eq!(model.set_split_weight(root, -0.1), Err(ModelError::InvalidWeight(-0.1)));
    }

    #[test]
    fn structural_errors() {
        let mut f = fixture();
        assert_eq!(f.model.set_root_split(Orientation::Vertical), Err(ModelError::RootAlreadySet));
        assert_eq!(
            f.model.add_panel(f.explorer, PanelData::view("x"), None),
            Err(ModelError::NotASplit(f.explorer))
        );
        assert_eq!(
            f.model.add_panel(f.root, PanelData::view("explorer"), None),
            Err(ModelError::DuplicateName("explorer".into()))
        );
        assert_eq!(
            f.model.add_editor_region(f.root, Orientation::Vertical, None),
            Err(ModelError::EditorRegionExists)
        );
        assert!(matches!(
            f.model.add_split(f.root, Orientation::Vertical, Some(f64::NAN)),
            Err(ModelError::InvalidWeight(w)) if w.is_nan()
        ));
        assert_eq!(
            f.model.add_split(f.root, Orientation::Vertical, Some(-1.0)),
            Err(ModelError::InvalidWeight(-1.0))
        );
        assert_eq!(f.model.remove_node(f.inner), Err(ModelError::Immovable(f.inner)));
        assert_eq!(
            f.model.add_separate_panel(PanelData::view("floating")),
            Err(ModelError::EmptyBounds("floating".into()))
        );
    }

    #[test]
    fn remove_cleans_up_indexes() {
        let mut f = fixture();
        f.model.set_active_panel(Some(f.editor)).unwrap();
        f.model.set_maximized_panel(Some(f.editor)).unwrap();
        f.model.remove_node(f.region).unwrap();
        assert_eq!(f.model.editor_region(), None);
        assert_eq!(f.model.active_panel(), None);
        assert_eq!(f.model.maximized_panel(), None);
        assert_eq!(f.model.find_panel("editor"), None);
        assert!(f.model.node(f.editor).is_none());
        assert_eq!(f.model.children(f.root).collect::<Vec<_>>(), vec![f.explorer, f.output]);

        // The name is free again.
        f.model.add_panel(f.root, PanelData::view("editor"), None).unwrap();

        f.model.remove_node(f.root).unwrap();
        assert_eq!(f.model.root(), None);
        assert!(f.model.is_empty());
    }

    #[test]
    fn move_node_reorders_and_reparents() {
        let mut f = fixture();
        f.model.move_node(f.output, f.root, 0).unwrap();
        assert_eq!(f.model.children(f.root).collect::<Vec<_>>(), vec![f.output, f.explorer, f.region]);

        f.model.move_node(f.output, f.root, 99).unwrap();
        assert_eq!(f.model.children(f.root).collect::<Vec<_>>(), vec![f.explorer, f.region, f.output]);

        f.model.move_node(f.explorer, f.inner, 1).unwrap();
        assert_eq!(f.model.children(f.inner).collect::<Vec<_>>(), vec![f.editor, f.explorer]);
        // Weight travels with the node.
        assert_eq!(f.model.node(f.explorer).unwrap().split_weight, 0.2);

        let nested = f.model.add_split(f.root, Orientation::Vertical, None).unwrap();
        let deep = f.model.add_split(nested, Orientation::Horizontal, None).unwrap();
        assert_eq!(f.model.move_node(nested, deep, 0), Err(ModelError::WouldCreateCycle(nested)));
        assert_eq!(f.model.move_node(f.root, nested, 0), Err(ModelError::Immovable(f.root)));
        assert_eq!(f.model.move_node(f.inner, f.root, 0), Err(ModelError::Immovable(f.inner)));
    }

    #[test]
    fn move_node_to_current_slot_is_a_no_op() {
        let mut f = fixture();
        let before: Vec<_> = f.model.children(f.root).collect();
        f.model.move_node(f.region, f.root, 1).unwrap();
        assert_eq!(f.model.children(f.root).collect::<Vec<_>>(), before);
        f.model.move_node(f.explorer, f.root, 1).unwrap();
        assert_eq!(f.model.children(f.root).collect::<Vec<_>>(), vec![f.region, f.explorer, f.output]);
    }

    #[test]
    fn set_split_weights_is_atomic() {
        let mut f = fixture();
        let good = WeightUpdate { node: f.explorer, parent: f.root, weight: 0.4 };
        let bad = WeightUpdate { node: f.editor, parent: f.root, weight: 0.1 };
        assert_eq!(
            f.model.set_split_weights(&[good, bad]),
            Err(ModelError::NotAChild { node: f.editor, parent: f.root })
        );
        assert_eq!(f.model.node(f.explorer).unwrap().split_weight, 0.2);

        let other = WeightUpdate { node: f.output, parent: f.root, weight: 0.3 };
        f.model.set_split_weights(&[good, other]).unwrap();
        assert_eq!(f.model.node(f.explorer).unwrap().split_weight, 0.4);
        assert_eq!(f.model.node(f.output).unwrap().split_weight, 0.3);

        let negative = WeightUpdate { weight: -0.5, ..good };
        assert_eq!(f.model.set_split_weights(&[negative]), Err(ModelError::InvalidWeight(-0.5)));
    }

    #[test]
    fn documents_open_close_select() {
        let mut f = fixture();
        f.model.open_document(f.editor, "a.rs").unwrap();
        f.model.open_document(f.editor, "b.rs").unwrap();
        f.model.open_document(f.editor, "c.rs").unwrap();
        f.model.select_document(f.editor, "b.rs").unwrap();
        f.model.close_document(f.editor, "b.rs").unwrap();

        let NodeData::Panel(panel) = &f.model.node(f.editor).unwrap().data else {
            panic!("editor is a panel");
        };
        assert_eq!(panel.documents.opened(), ["a.rs", "c.rs"]);
        assert_eq!(panel.documents.selected(), Some("c.rs"));

        assert_eq!(
            f.model.select_document(f.editor, "zzz.rs"),
            Err(ModelError::DocumentNotOpen { panel: "editor".into(), document: "zzz.rs".into() })
        );
        assert_eq!(f.model.open_document(f.root, "x"), Err(ModelError::NotAPanel(f.root)));
    }

    #[test]
    fn closing_last_document_clears_selection() {
        let mut docs = Documents::default();
        docs.open("only");
        assert!(docs.close("only"));
        assert!(docs.is_empty());
        assert_eq!(docs.selected(), None);
        assert!(!docs.close("only"));
    }

    #[test]
    fn sliding_bounds_remember_slide_in_size() {
        let mut model = LayoutModel::default();
        let left = model.add_sliding(SlidingData::new("left", Side::Left)).unwrap();
        let bottom = model.add_sliding(SlidingData::new("bottom", Side::Bottom)).unwrap();
        model.set_panel_bounds(left, Rect::new(0.0, 0.0, 240.0, 800.0)).unwrap();
        model.set_panel_bounds(bottom, Rect::new(0.0, 600.0, 1200.0, 180.0)).unwrap();

        let slide_in = |node| match &model.node(node).unwrap().data {
            NodeData::Sliding(s) => s.slide_in_size(),
            _ => None,
        };
        assert_eq!(slide_in(left), Some(240.0));
        assert_eq!(slide_in(bottom), Some(180.0));
        assert_eq!(model.sliding_panels(), [left, bottom]);
        assert!(!model.is_empty());
    }

    #[test]
    fn slide_in_size_is_kept_per_selected_document() {
        let mut model = LayoutModel::default();
        let bottom = model
            .add_sliding(SlidingData::new("bottom", Side::Bottom).with_document("shell"))
            .unwrap();
        model.open_document(bottom, "build").unwrap();
        model.select_document(bottom, "shell").unwrap();
        model.set_panel_bounds(bottom, Rect::new(0.0, 600.0, 1200.0, 300.0)).unwrap();
        model.select_document(bottom, "build").unwrap();
        model.set_panel_bounds(bottom, Rect::new(0.0, 700.0, 1200.0, 120.0)).unwrap();

        let slide_in = |model: &LayoutModel| match &model.node(bottom).unwrap().data {
            NodeData::Sliding(s) => s.slide_in_size(),
            _ => None,
        };
        assert_eq!(slide_in(&model), Some(120.0));
        model.select_document(bottom, "shell").unwrap();
        assert_eq!(slide_in(&model), Some(300.0));
        model.close_document(bottom, "shell").unwrap();
        assert_eq!(slide_in(&model), Some(120.0));
    }

    #[test]
    fn main_window_bounds_follow_editor_area_state() {
        let mut model = LayoutModel::default();
        let joined = Rect::new(0.0, 0.0, 1600.0, 900.0);
        let separated = Rect::new(0.0, 0.0, 400.0, 900.0);
        model.set_main_window_bounds(joined);
        model.set_editor_area_state(EditorAreaState::Separated);
        model.set_main_window_bounds(separated);
        model.set_main_window_frame_state(FrameState::Maximized);
        assert_eq!(model.main_window().bounds_joined, joined);
        assert_eq!(model.main_window().bounds_separated, separated);
        assert_eq!(model.main_window().frame_state_separated, FrameState::Maximized);
        assert_eq!(model.main_window().frame_state_joined, FrameState::Normal);
    }

    #[test]
    fn active_panel_must_be_a_panel() {
        let mut f = fixture();
        assert_eq!(f.model.set_active_panel(Some(f.root)), Err(ModelError::NotAPanel(f.root)));
        f.model.set_active_panel(Some(f.output)).unwrap();
        assert_eq!(f.model.active_panel(), Some(f.output));
    }

    #[test]
    fn draw_tree_lists_all_sections() {
        let mut f = fixture();
        f.model
            .add_separate_panel(
                PanelData::view("floating").with_bounds(Rect::new(10.0, 10.0, 300.0, 200.0)),
            )
            .unwrap();
        let drawn = f.model.draw_tree();
        assert!(drawn.contains("Split(horizontal)"), "{drawn}");
        assert!(drawn.contains("Panel \"explorer\""), "{drawn}");
        assert!(drawn.contains("EditorRegion"), "{drawn}");
        assert!(drawn.contains("separate"), "{drawn}");
        assert!(!drawn.contains("sliding"), "{drawn}");
    }
}
