mod bplus_tree;

pub use bplus_tree::{BPlusTree, Iter};

use crate::common::Rid;

/// Index from tuple key to row locator, the only index kind tables carry.
pub type RidIndex = BPlusTree<Rid>;
