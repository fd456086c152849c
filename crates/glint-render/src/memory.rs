#![forbid(unsafe_code)]

//! In-memory [`Surface`] backed by a generational arena.
//!
//! Used by tests, benchmarks and the terminal demo. Besides the trait
//! surface it records how many times each node's text was written, which
//! is how tests observe that only one effect drives a node per frame.

use crate::surface::{NodeId, NodeKind, Property, Rgb, Style, Surface};

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: Option<String>,
    style: Style,
    text_writes: u64,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            text: None,
            style: Style::default(),
            text_writes: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed surface.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Surface holding only a root container.
    #[must_use]
    pub fn new() -> Self {
        let mut surface = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::from_parts(0, 0),
            live: 0,
        };
        surface.root = surface.insert(Node::new(NodeKind::Container));
        surface
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            return NodeId::from_parts(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::from_parts(index, 0)
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return;
        };
        if slot.generation != id.generation() {
            return;
        }
        let Some(node) = slot.node.take() else {
            return;
        };
        self.live -= 1;
        self.free.push(id.index());
        for child in node.children {
            self.release(child);
        }
    }

    /// How many times `node`'s text has been written.
    #[must_use]
    pub fn text_writes(&self, node: NodeId) -> u64 {
        self.get(node).map_or(0, |n| n.text_writes)
    }

    /// Parent of `node`, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    /// Live nodes of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.slots
            .iter()
            .filter_map(|slot| slot.node.as_ref())
            .filter(|node| node.kind == kind)
            .count()
    }

    /// Whether `node` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
    }
}

impl Surface for MemorySurface {
    fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.insert(Node::new(kind));
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "glint.render", node = %id, ?kind, "node created");
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || child == self.root {
            return false;
        }
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        // Refuse to create a cycle.
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                return false;
            }
            ancestor = self.get(a).and_then(|n| n.parent);
        }
        self.unlink(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    fn detach(&mut self, node: NodeId) -> bool {
        if node == self.root || !self.contains(node) {
            return false;
        }
        self.unlink(node);
        self.release(node);
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "glint.render", node = %node, "node detached");
        true
    }

    fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.get(node).map(|n| n.kind)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.text.as_deref()
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        let Some(n) = self.get_mut(node) else {
            return false;
        };
        match &mut n.text {
            Some(existing) => {
                existing.clear();
                existing.push_str(text);
            }
            None => n.text = Some(text.to_owned()),
        }
        n.text_writes += 1;
        true
    }

    fn style(&self, node: NodeId) -> Option<Style> {
        self.get(node).map(|n| n.style)
    }

    fn set_property(&mut self, node: NodeId, property: Property, value: f32) -> bool {
        match self.get_mut(node) {
            Some(n) => {
                n.style.set(property, value);
                true
            }
            None => false,
        }
    }

    fn set_color(&mut self, node: NodeId, color: Rgb) -> bool {
        match self.get_mut(node) {
            Some(n) => {
                n.style.color = color;
                true
            }
            None => false,
        }
    }

    fn node_count(&self) -> usize {
        self.live
    }
}
