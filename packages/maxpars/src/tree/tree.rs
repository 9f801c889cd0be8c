use crate::seq::SeqRef;
use crate::tree::node::Node;
use crate::{make_error, make_internal_report};
use eyre::Report;

/// A rooted bifurcating tree stored as a flat arena of node records within a
/// fixed capacity.
///
/// The root index is tracked explicitly and is not pinned to 0: `add`
/// relocates it when the spliced interior node takes the root's place. A
/// fully built tree over M tips holds 2M-1 nodes.
#[derive(Clone, Debug, Default)]
pub struct Tree {
  nodes: Vec<Node>,
  capacity: usize,
  root: Option<usize>,
}

impl Tree {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      nodes: Vec::with_capacity(capacity),
      capacity,
      root: None,
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub const fn root(&self) -> Option<usize> {
    self.root
  }

  #[inline]
  pub fn node(&self, index: usize) -> &Node {
    &self.nodes[index]
  }

  #[inline]
  pub fn node_mut(&mut self, index: usize) -> &mut Node {
    &mut self.nodes[index]
  }

  #[inline]
  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  /// Number of tips currently attached.
  pub fn tip_count(&self) -> usize {
    self.nodes.iter().filter(|node| node.is_tip()).count()
  }

  /// Parsimony score stored at the root's sequence, if any.
  pub fn root_score(&self) -> Option<usize> {
    let root = self.root?;
    self.nodes[root].seq.as_ref().map(|seq| seq.read().score())
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.root = None;
  }

  /// Attach a tip onto the edge above node `at`.
  ///
  /// On an empty tree, node 0 becomes a lone root holding `seq` and `at` is
  /// ignored. Otherwise a new interior node is spliced in at the current
  /// length, between `at` and its parent, and the new tip lands just after
  /// it; the length grows by 2 and the tip index is returned. When `at` is
  /// the root, the spliced interior node becomes the new root.
  pub fn add(&mut self, at: usize, seq: SeqRef) -> Result<usize, Report> {
    if self.nodes.is_empty() {
      if self.capacity < 1 {
        return make_error!("Cannot add to a tree of capacity 0");
      }
      self.nodes.push(Node::tip(None, seq));
      self.root = Some(0);
      return Ok(0);
    }

    if at >= self.nodes.len() {
      return make_error!(
        "Attachment edge index {at} is out of bounds for a tree of {} nodes",
        self.nodes.len()
      );
    }
    if self.nodes.len() + 2 > self.capacity {
      return make_error!(
        "Tree capacity {} exceeded when attaching a tip to a tree of {} nodes",
        self.capacity,
        self.nodes.len()
      );
    }

    let interior = self.nodes.len();
    let tip = interior + 1;
    let old_parent = self.nodes[at].parent;

    self.nodes.push(Node {
      parent: old_parent,
      children: [Some(at), Some(tip)],
      seq: None,
      branch_length: None,
    });
    self.nodes.push(Node::tip(Some(interior), seq));
    self.nodes[at].parent = Some(interior);

    match old_parent {
      Some(parent) => {
        let slot = self.nodes[parent]
          .children
          .iter_mut()
          .find(|child| **child == Some(at))
          .ok_or_else(|| make_internal_report!("Parent {parent} does not list {at} among its children"))?;
        *slot = Some(interior);
      }
      None => {
        self.root = Some(interior);
      }
    }

    Ok(tip)
  }

  /// Overwrite this tree with a copy of another. Node records are copied
  /// verbatim; sequence handles stay shared with the source.
  pub fn copy_from(&mut self, src: &Tree) -> Result<(), Report> {
    if self.capacity < src.nodes.len() {
      return make_error!(
        "Cannot copy a tree of {} nodes into a tree of capacity {}",
        src.nodes.len(),
        self.capacity
      );
    }
    self.nodes.clear();
    self.nodes.extend(src.nodes.iter().cloned());
    self.root = src.root;
    Ok(())
  }

  /// Join two trees under a fresh root.
  ///
  /// The new root sits at index 0; nodes of `t1` follow shifted by +1, then
  /// nodes of `t2` shifted by +len1+1. The old roots become the new root's
  /// children. Branch lengths are carried over verbatim.
  pub fn join(t1: &Tree, t2: &Tree) -> Result<Tree, Report> {
    let (root1, root2) = match (t1.root, t2.root) {
      (Some(root1), Some(root2)) => (root1, root2),
      _ => return make_error!("Cannot join empty trees"),
    };

    let len1 = t1.nodes.len();
    let capacity = len1 + t2.nodes.len() + 1;
    let mut joined = Tree::with_capacity(capacity);

    joined.nodes.push(Node {
      parent: None,
      children: [Some(root1 + 1), Some(root2 + len1 + 1)],
      seq: None,
      branch_length: None,
    });

    for node in &t1.nodes {
      joined.nodes.push(Node {
        parent: Some(node.parent.map_or(0, |parent| parent + 1)),
        children: node.children.map(|child| child.map(|child| child + 1)),
        seq: node.seq.clone(),
        branch_length: node.branch_length,
      });
    }

    let shift = len1 + 1;
    for node in &t2.nodes {
      joined.nodes.push(Node {
        parent: Some(node.parent.map_or(0, |parent| parent + shift)),
        children: node.children.map(|child| child.map(|child| child + shift)),
        seq: node.seq.clone(),
        branch_length: node.branch_length,
      });
    }

    joined.root = Some(0);
    Ok(joined)
  }
}
