use crate::common::DEFAULT_BTREE_ORDER;

/// Index of a node in the tree's arena.
type NodeId = usize;

/// A tree node. Leaves carry the key/value pairs and a forward link to the
/// next leaf; internal nodes carry routing keys and one more child than keys.
enum Node<V> {
    Internal {
        keys: Vec<i32>,
        children: Vec<NodeId>,
    },
    Leaf {
        keys: Vec<i32>,
        values: Vec<V>,
        next: Option<NodeId>,
    },
}

enum InsertOutcome {
    Duplicate,
    Inserted,
    SplitChild { separator: i32, right: NodeId },
}

/// B+ tree mapping unique i32 keys to values, with all nodes held in an
/// arena and addressed by index.
///
/// A node that reaches `order` keys splits: leaves move their upper half to
/// a new right sibling and copy the sibling's first key up; internal nodes
/// promote their middle key, leaving it out of both halves. Internal routing
/// is upper-bound, so a key equal to a routing key descends right. Removal
/// never merges or rebalances, it only shrinks the owning leaf.
pub struct BPlusTree<V> {
    nodes: Vec<Node<V>>,
    root: NodeId,
    order: usize,
    len: usize,
}

impl<V> BPlusTree<V> {
    /// Creates an empty tree with the default order.
    pub fn new() -> Self {
        Self::with_order(DEFAULT_BTREE_ORDER)
    }

    /// Creates an empty tree splitting nodes at `order` keys.
    pub fn with_order(order: usize) -> Self {
        assert!(order >= 3, "order must be at least 3");
        Self {
            nodes: vec![Node::Leaf {
                keys: Vec::new(),
                values: Vec::new(),
                next: None,
            }],
            root: 0,
            order,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a key/value pair.
    /// Returns false without mutating the tree if the key already exists.
    pub fn insert(&mut self, key: i32, value: V) -> bool {
        match self.insert_recursive(self.root, key, value) {
            InsertOutcome::Duplicate => false,
            InsertOutcome::Inserted => {
                self.len += 1;
                true
            }
            InsertOutcome::SplitChild { separator, right } => {
                // The root itself split: grow the tree by one level
                let new_root = Node::Internal {
                    keys: vec![separator],
                    children: vec![self.root, right],
                };
                self.nodes.push(new_root);
                self.root = self.nodes.len() - 1;
                self.len += 1;
                true
            }
        }
    }

    /// Looks up a key, returning its value if present.
    pub fn search(&self, key: i32) -> Option<&V> {
        let leaf_id = self.find_leaf(key);
        match &self.nodes[leaf_id] {
            Node::Leaf { keys, values, .. } => {
                let pos = keys.partition_point(|&k| k < key);
                if pos < keys.len() && keys[pos] == key {
                    Some(&values[pos])
                } else {
                    None
                }
            }
            Node::Internal { .. } => unreachable!("find_leaf returned an internal node"),
        }
    }

    /// Removes a key, returning false if it was not present.
    /// Underflowing leaves are left as they are.
    pub fn remove(&mut self, key: i32) -> bool {
        let leaf_id = self.find_leaf(key);
        match &mut self.nodes[leaf_id] {
            Node::Leaf { keys, values, .. } => {
                let pos = keys.partition_point(|&k| k < key);
                if pos < keys.len() && keys[pos] == key {
                    keys.remove(pos);
                    values.remove(pos);
                    self.len -= 1;
                    true
                } else {
                    false
                }
            }
            Node::Internal { .. } => unreachable!("find_leaf returned an internal node"),
        }
    }

    /// Iterates over all key/value pairs in ascending key order by walking
    /// the leaf chain from the leftmost leaf.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            leaf: Some(self.leftmost_leaf()),
            pos: 0,
        }
    }

    /// Descends to the leaf whose key range contains `key`.
    fn find_leaf(&self, key: i32) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.nodes[current] {
                Node::Leaf { .. } => return current,
                Node::Internal { keys, children } => {
                    // Upper-bound routing: a key equal to keys[i] lives in
                    // children[i + 1]
                    current = children[keys.partition_point(|&k| k <= key)];
                }
            }
        }
    }

    fn leftmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.nodes[current] {
                Node::Leaf { .. } => return current,
                Node::Internal { children, .. } => current = children[0],
            }
        }
    }

    fn insert_recursive(&mut self, node_id: NodeId, key: i32, value: V) -> InsertOutcome {
        let child_id = match &self.nodes[node_id] {
            Node::Leaf { .. } => return self.insert_into_leaf(node_id, key, value),
            Node::Internal { keys, children } => children[keys.partition_point(|&k| k <= key)],
        };

        match self.insert_recursive(child_id, key, value) {
            InsertOutcome::SplitChild { separator, right } => {
                self.insert_separator(node_id, separator, right)
            }
            outcome => outcome,
        }
    }

    fn insert_into_leaf(&mut self, leaf_id: NodeId, key: i32, value: V) -> InsertOutcome {
        let order = self.order;
        let needs_split = match &mut self.nodes[leaf_id] {
            Node::Leaf { keys, values, .. } => {
                let pos = keys.partition_point(|&k| k < key);
                if pos < keys.len() && keys[pos] == key {
                    return InsertOutcome::Duplicate;
                }
                keys.insert(pos, key);
                values.insert(pos, value);
                keys.len() >= order
            }
            Node::Internal { .. } => unreachable!("insert_into_leaf on an internal node"),
        };

        if needs_split {
            let (separator, right) = self.split_leaf(leaf_id);
            InsertOutcome::SplitChild { separator, right }
        } else {
            InsertOutcome::Inserted
        }
    }

    /// Inserts a separator key and its right child into an internal node
    /// after one of the node's children split.
    fn insert_separator(
        &mut self,
        node_id: NodeId,
        separator: i32,
        right_child: NodeId,
    ) -> InsertOutcome {
        let order = self.order;
        let needs_split = match &mut self.nodes[node_id] {
            Node::Internal { keys, children } => {
                let pos = keys.partition_point(|&k| k <= separator);
                keys.insert(pos, separator);
                children.insert(pos + 1, right_child);
                keys.len() >= order
            }
            Node::Leaf { .. } => unreachable!("insert_separator on a leaf node"),
        };

        if needs_split {
            let (separator, right) = self.split_internal(node_id);
            InsertOutcome::SplitChild { separator, right }
        } else {
            InsertOutcome::Inserted
        }
    }

    /// Splits a full leaf. The upper half (the remainder, for odd counts)
    /// moves to a new right sibling; the sibling's first key is the
    /// separator and stays in the sibling. The leaf chain is relinked so
    /// the left leaf points at the new sibling.
    fn split_leaf(&mut self, leaf_id: NodeId) -> (i32, NodeId) {
        let right_id = self.nodes.len();

        let (separator, right_node) = match &mut self.nodes[leaf_id] {
            Node::Leaf { keys, values, next } => {
                let mid = keys.len() / 2;
                let right_keys = keys.split_off(mid);
                let right_values = values.split_off(mid);
                let separator = right_keys[0];

                let right_node = Node::Leaf {
                    keys: right_keys,
                    values: right_values,
                    next: next.take(),
                };
                *next = Some(right_id);

                (separator, right_node)
            }
            Node::Internal { .. } => unreachable!("split_leaf on an internal node"),
        };

        self.nodes.push(right_node);
        (separator, right_id)
    }

    /// Splits a full internal node. The middle key is promoted and belongs
    /// to neither half; the right half takes the keys and children after it.
    fn split_internal(&mut self, node_id: NodeId) -> (i32, NodeId) {
        let right_id = self.nodes.len();

        let (separator, right_node) = match &mut self.nodes[node_id] {
            Node::Internal { keys, children } => {
                let mid = keys.len() / 2;
                let right_keys = keys.split_off(mid + 1);
                let right_children = children.split_off(mid + 1);
                let separator = keys.remove(mid);

                let right_node = Node::Internal {
                    keys: right_keys,
                    children: right_children,
                };

                (separator, right_node)
            }
            Node::Leaf { .. } => unreachable!("split_internal on a leaf node"),
        };

        self.nodes.push(right_node);
        (separator, right_id)
    }
}

impl<V> Default for BPlusTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a tree's key/value pairs in key order.
pub struct Iter<'a, V> {
    tree: &'a BPlusTree<V>,
    leaf: Option<NodeId>,
    pos: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i32, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf_id = self.leaf?;
            match &self.tree.nodes[leaf_id] {
                Node::Leaf { keys, values, next } => {
                    if self.pos < keys.len() {
                        let item = (keys[self.pos], &values[self.pos]);
                        self.pos += 1;
                        return Some(item);
                    }
                    // Exhausted this leaf, follow the chain
                    self.leaf = *next;
                    self.pos = 0;
                }
                Node::Internal { .. } => unreachable!("leaf chain links to an internal node"),
            }
        }
    }
}
