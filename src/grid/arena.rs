//! Node storage for the sample grid
//!
//! Nodes live in a contiguous arena and point at each other through stable
//! integer ids instead of references, so the editing operations can relink
//! columns in O(1) without lifetime gymnastics. A free list recycles the
//! slots of nodes detached by clip and make_mono; append reuses them.

/// Stable handle to a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// One channel's amplitude at one time instant
///
/// `next_time` is the same channel at the next instant; `next_channel` is
/// the next channel at the same instant. Either may be absent at the grid's
/// trailing edge.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub value: f32,
    pub next_time: Option<NodeId>,
    pub next_channel: Option<NodeId>,
}

/// Arena of sample nodes with slot recycling
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh unlinked node, reusing a freed slot when one exists
    pub fn alloc(&mut self, value: f32) -> NodeId {
        let node = Node {
            value,
            next_time: None,
            next_channel: None,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Allocate one time-column from a frame of channel values
    ///
    /// The nodes are inter-linked via `next_channel` in frame order; the
    /// returned id is the channel-0 row. `frame` must be non-empty.
    pub fn alloc_column(&mut self, frame: &[f32]) -> NodeId {
        let head = self.alloc(frame[0]);
        let mut prev = head;
        for &value in &frame[1..] {
            let next = self.alloc(value);
            self.nodes[prev.0].next_channel = Some(next);
            prev = next;
        }
        head
    }

    /// Return a single node's slot to the free list
    ///
    /// Links are scrubbed so a stale id cannot walk back into live nodes.
    pub fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.value = 0.0;
        node.next_time = None;
        node.next_channel = None;
        self.free.push(id);
    }

    /// Release an entire column, following `next_channel` from `head`
    pub fn release_column(&mut self, head: NodeId) {
        let mut row = Some(head);
        while let Some(id) = row {
            row = self.nodes[id.0].next_channel;
            self.release(id);
        }
    }

    /// Release a run of columns, following `next_time` from `head`
    ///
    /// Used when clip discards a prefix or suffix of the grid.
    pub fn release_run(&mut self, head: NodeId) {
        let mut col = Some(head);
        while let Some(id) = col {
            col = self.nodes[id.0].next_time;
            self.release_column(id);
        }
    }

    /// Drop every node and forget the free list
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }

    /// Number of nodes currently reachable (allocated minus freed)
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> f32 {
        self.nodes[id.0].value
    }

    #[inline]
    pub fn set_value(&mut self, id: NodeId, value: f32) {
        self.nodes[id.0].value = value;
    }

    #[inline]
    pub fn next_time(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_time
    }

    #[inline]
    pub fn set_next_time(&mut self, id: NodeId, to: Option<NodeId>) {
        self.nodes[id.0].next_time = to;
    }

    #[inline]
    pub fn next_channel(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_channel
    }

    #[inline]
    pub fn set_next_channel(&mut self, id: NodeId, to: Option<NodeId>) {
        self.nodes[id.0].next_channel = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_read() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(0.5);
        assert_eq!(arena.value(id), 0.5);
        assert_eq!(arena.next_time(id), None);
        assert_eq!(arena.next_channel(id), None);
        assert_eq!(arena.live_nodes(), 1);
    }

    #[test]
    fn test_alloc_column_links_channels() {
        let mut arena = NodeArena::new();
        let head = arena.alloc_column(&[0.1, 0.2, 0.3]);

        assert_eq!(arena.value(head), 0.1);
        let ch1 = arena.next_channel(head).unwrap();
        assert_eq!(arena.value(ch1), 0.2);
        let ch2 = arena.next_channel(ch1).unwrap();
        assert_eq!(arena.value(ch2), 0.3);
        assert_eq!(arena.next_channel(ch2), None);
        assert_eq!(arena.live_nodes(), 3);
    }

    #[test]
    fn test_release_recycles_slot() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(0.1);
        let _b = arena.alloc(0.2);
        arena.release(a);
        assert_eq!(arena.live_nodes(), 1);

        // The freed slot is reused before the arena grows
        let c = arena.alloc(0.3);
        assert_eq!(c, a);
        assert_eq!(arena.live_nodes(), 2);
    }

    #[test]
    fn test_release_column() {
        let mut arena = NodeArena::new();
        let head = arena.alloc_column(&[0.1, 0.2, 0.3]);
        arena.release_column(head);
        assert_eq!(arena.live_nodes(), 0);
    }

    #[test]
    fn test_release_run_frees_all_columns() {
        let mut arena = NodeArena::new();
        let first = arena.alloc_column(&[0.1, 0.2]);
        let second = arena.alloc_column(&[0.3, 0.4]);
        arena.set_next_time(first, Some(second));
        // Link the second rows too, as the grid would
        let r0 = arena.next_channel(first).unwrap();
        let r1 = arena.next_channel(second).unwrap();
        arena.set_next_time(r0, Some(r1));

        arena.release_run(first);
        assert_eq!(arena.live_nodes(), 0);
    }

    #[test]
    fn test_release_scrubs_links() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(0.1);
        let b = arena.alloc(0.2);
        arena.set_next_time(a, Some(b));
        arena.release(a);
        // A recycled slot starts unlinked
        let c = arena.alloc(0.9);
        assert_eq!(c, a);
        assert_eq!(arena.next_time(c), None);
    }
}
