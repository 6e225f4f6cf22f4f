use slotmap::SlotMap;

/// N-ary tree whose structure lives in a [`NodeMap`] arena.
///
/// Per-node payloads are kept outside the tree, keyed by [`NodeId`] in
/// secondary maps owned by the observer `O`, which is told about every
/// structural change.
pub struct Tree<O> {
    pub map: NodeMap,
    pub data: O,
}

impl<O: Observer> Tree<O> {
    pub fn with_observer(data: O) -> Self { Tree { map: NodeMap::default(), data } }

    /// Adds a new node to the forest as a root of its own.
    pub fn mk_node(&mut self) -> NodeId {
        let id = self.map.map.insert(Node::default());
        self.data.added_to_forest(&self.map, id);
        id
    }
}

/// Map that holds the structure of the tree.
///
/// Several roots can live in one map, which lets subtrees move between the
/// split tree and the floating/sliding sets without changing identity.
#[derive(Default)]
pub struct NodeMap {
    map: SlotMap<NodeId, Node>,
}

impl NodeMap {
    pub fn contains(&self, id: NodeId) -> bool { self.map.contains_key(id) }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

slotmap::new_key_type! {
    /// Represents a node somewhere in the layout model.
    pub struct NodeId;
}

impl NodeId {
    #[track_caller]
    pub fn detach<O: Observer>(self, tree: &mut Tree<O>) -> DetachedNode<'_, O> {
        DetachedNode { id: self, tree }
    }

    pub fn parent(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.parent)
    }

    pub fn first_child(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.first_child)
    }

    pub fn last_child(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.last_child)
    }

    pub fn next_sibling(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.next_sibling)
    }

    pub fn prev_sibling(self, map: &NodeMap) -> Option<NodeId> {
        map.map.get(self).and_then(|n| n.prev_sibling)
    }

    pub fn is_empty(self, map: &NodeMap) -> bool { self.first_child(map).is_none() }

    pub fn children(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.first_child(map);
        std::iter::from_fn(move || {
            let node = next?;
            next = node.next_sibling(map);
            Some(node)
        })
    }

    /// Returns an iterator over all ancestors of the current node, including itself.
    pub fn ancestors(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = map.contains(self).then_some(self);
        std::iter::from_fn(move || {
            let node = next?;
            next = node.parent(map);
            Some(node)
        })
    }

    pub fn traverse_preorder(self, map: &NodeMap) -> impl Iterator<Item = NodeId> + '_ {
        let top = self;
        let mut cur = map.contains(self).then_some(self);
        std::iter::from_fn(move || {
            let node = cur?;
            cur = node.first_child(map).or_else(|| {
                node.ancestors(map)
                    .take_while(|&a| a != top)
                    .find_map(|a| a.next_sibling(map))
            });
            Some(node)
        })
    }

    pub fn index_in_parent(self, map: &NodeMap) -> Option<usize> {
        let parent = self.parent(map)?;
        parent.children(map).position(|c| c == self)
    }

    pub fn is_descendant_of(self, ancestor: NodeId, map: &NodeMap) -> bool {
        self.ancestors(map).any(|a| a == ancestor)
    }
}

pub trait Observer
where Self: Sized {
    fn added_to_forest(&mut self, map: &NodeMap, node: NodeId);
    fn added_to_parent(&mut self, map: &NodeMap, node: NodeId);
    fn removing_from_parent(&mut self, map: &NodeMap, node: NodeId);
    fn removed_from_forest(&mut self, map: &NodeMap, node: NodeId);
}

impl Observer for () {
    fn added_to_forest(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn added_to_parent(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn removing_from_parent(&mut self, _map: &NodeMap, _node: NodeId) {}

    fn removed_from_forest(&mut self, _map: &NodeMap, _node: NodeId) {}
}

#[must_use = "Detached nodes should be reattached to the tree or removed"]
pub struct DetachedNode<'a, O> {
    id: NodeId,
    tree: &'a mut Tree<O>,
}

impl<'a, O: Observer> DetachedNode<'a, O> {
    #[track_caller]
    pub fn push_back(self, parent: NodeId) -> NodeId { self.attach(parent, None) }

    #[track_caller]
    pub fn insert_before(self, sibling: NodeId) -> NodeId {
        if sibling == self.id {
            return self.id;
        }
        let parent = sibling.parent(&self.tree.map).expect("cannot make a sibling of a root node");
        self.attach(parent, Some(sibling))
    }

    /// Removes the node and its whole subtree from the forest.
    pub fn remove(mut self) {
        self.unlink_from_parent();
        let doomed: Vec<_> = self.id.traverse_preorder(&self.tree.map).collect();
        for node in doomed {
            self.tree.data.removed_from_forest(&self.tree.map, node);
            self.tree.map.map.remove(node);
        }
    }

    fn unlink_from_parent(&mut self) -> Option<NodeId> {
        let parent = self.id.parent(&self.tree.map)?;
        self.tree.data.removing_from_parent(&self.tree.map, self.id);
        self.tree.map.unlink(self.id);
        Some(parent)
    }

    #[track_caller]
    fn attach(mut self, parent: NodeId, before: Option<NodeId>) -> NodeId {
        if parent == self.id || parent.is_descendant_of(self.id, &self.tree.map) {
            return self.id;
        }
        self.unlink_from_parent();
        self.tree.map.link(self.id, parent, before);
        self.tree.data.added_to_parent(&self.tree.map, self.id);
        self.id
    }
}

#[derive(Default, PartialEq, Debug)]
struct Node {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl NodeMap {
    /// Links an unlinked `id` under `parent`, before `next` or at the end.
    #[track_caller]
    fn link(&mut self, id: NodeId, parent: NodeId, next: Option<NodeId>) {
        debug_assert!(self.map[id].parent.is_none(), "linking a node that is still attached");
        debug_assert!(next.is_none_or(|n| self.map[n].parent == Some(parent)));
        let prev = match next {
            Some(next) => self.map[next].prev_sibling,
            None => self.map[parent].last_child,
        };

        let node = &mut self.map[id];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = next;

        match prev {
            Some(prev) => self.map[prev].next_sibling = Some(id),
            None => self.map[parent].first_child = Some(id),
        }
        match next {
            Some(next) => self.map[next].prev_sibling = Some(id),
            None => self.map[parent].last_child = Some(id),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(node) = self.map.get_mut(id) else { return };
        let (parent, prev, next) = (
            node.parent.take(),
            node.prev_sibling.take(),
            node.next_sibling.take(),
        );
        match prev {
            Some(prev) => self.map[prev].next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.map[parent].first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.map[next].prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.map[parent].last_child = prev;
                }
            }
        }
    }
}
