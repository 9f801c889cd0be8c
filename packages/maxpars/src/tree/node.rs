use crate::seq::SeqRef;

/// One record of the flat tree arena.
///
/// A node without a parent is the root; a node with no children is a tip.
/// The sequence handle is shared, never owned exclusively: tips reference
/// the alignment's sequences, interior nodes reference scorer scratch or
/// freshly allocated ancestors. The branch length is the length of the edge
/// above the node; unset means 0 where compared.
#[derive(Clone, Debug, Default)]
pub struct Node {
  pub parent: Option<usize>,
  pub children: [Option<usize>; 2],
  pub seq: Option<SeqRef>,
  pub branch_length: Option<f64>,
}

impl Node {
  pub fn tip(parent: Option<usize>, seq: SeqRef) -> Self {
    Self {
      parent,
      children: [None, None],
      seq: Some(seq),
      branch_length: None,
    }
  }

  #[inline]
  pub const fn is_tip(&self) -> bool {
    self.children[0].is_none() && self.children[1].is_none()
  }

  #[inline]
  pub const fn is_root(&self) -> bool {
    self.parent.is_none()
  }

  /// Both child indices, present iff the node is interior.
  #[inline]
  pub fn children_pair(&self) -> Option<(usize, usize)> {
    match self.children {
      [Some(left), Some(right)] => Some((left, right)),
      _ => None,
    }
  }

  #[inline]
  pub fn branch_length_or_zero(&self) -> f64 {
    self.branch_length.unwrap_or(0.0)
  }
}
