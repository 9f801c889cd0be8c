use crate::make_internal_report;
use crate::seq::dna_sequence::DnaSequence;
use crate::seq::{seq_ref, SeqRef};
use crate::tree::tree::Tree;
use crate::{make_error, make_internal_error};
use eyre::Report;
use std::sync::Arc;

/// Fitch parsimony score of a whole tree.
///
/// Post-order traversal with an explicit stack: every interior node receives
/// the Fitch ancestor of its two children, allocating a sequence for nodes
/// that carry none. Returns the score accumulated at the root.
pub fn compute_score(tree: &mut Tree) -> Result<usize, Report> {
  let root = match tree.root() {
    Some(root) => root,
    None => return make_error!("Cannot compute the parsimony score of an empty tree"),
  };

  let site_len = tip_site_len(tree)?;

  let mut stack = vec![(root, false)];
  while let Some((index, expanded)) = stack.pop() {
    let (left, right) = match tree.node(index).children_pair() {
      Some(children) => children,
      None => continue,
    };

    if !expanded {
      stack.push((index, true));
      stack.push((left, false));
      stack.push((right, false));
      continue;
    }

    let left_seq = node_seq(tree, left)?;
    let right_seq = node_seq(tree, right)?;

    let ancestor = match &tree.node(index).seq {
      Some(seq) => Arc::clone(seq),
      None => {
        let seq = seq_ref(DnaSequence::with_len(site_len));
        tree.node_mut(index).seq = Some(Arc::clone(&seq));
        seq
      }
    };
    ancestor.write().set_fitch_ancestor(&left_seq.read(), &right_seq.read())?;
  }

  root_score(tree)
}

/// Re-score a tree after a single tip was attached.
///
/// Only the interior chain from the new tip's parent up to the root is
/// stale; recompute it in place, installing the k-th scratch sequence at the
/// k-th chain node. All other nodes must already carry valid sequences.
/// Returns the score at the root.
pub fn update_score(tree: &mut Tree, tip_index: usize, scratch: &[SeqRef]) -> Result<usize, Report> {
  if tip_index >= tree.len() {
    return make_error!("Tip index {tip_index} is out of bounds for a tree of {} nodes", tree.len());
  }

  let mut current = tree.node(tip_index).parent;
  let mut depth = 0;

  while let Some(index) = current {
    let (left, right) = tree
      .node(index)
      .children_pair()
      .ok_or_else(|| make_internal_report!("Interior node {index} on the update chain has no children"))?;

    let left_seq = node_seq(tree, left)?;
    let right_seq = node_seq(tree, right)?;

    let ancestor = match scratch.get(depth) {
      Some(seq) => Arc::clone(seq),
      None => return make_internal_error!("Scratch pool of {} sequences exhausted at depth {depth}", scratch.len()),
    };
    ancestor.write().set_fitch_ancestor(&left_seq.read(), &right_seq.read())?;
    tree.node_mut(index).seq = Some(ancestor);

    current = tree.node(index).parent;
    depth += 1;
  }

  root_score(tree)
}

fn root_score(tree: &Tree) -> Result<usize, Report> {
  tree
    .root_score()
    .ok_or_else(|| make_internal_report!("The root node carries no sequence after scoring"))
}

fn node_seq(tree: &Tree, index: usize) -> Result<SeqRef, Report> {
  tree
    .node(index)
    .seq
    .clone()
    .ok_or_else(|| make_internal_report!("Node {index} carries no sequence"))
}

fn tip_site_len(tree: &Tree) -> Result<usize, Report> {
  let tip = tree
    .nodes()
    .iter()
    .find(|node| node.is_tip())
    .ok_or_else(|| make_internal_report!("The tree has no tips"))?;
  match &tip.seq {
    Some(seq) => Ok(seq.read().len()),
    None => make_error!("A tip node carries no sequence"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seq::alignment::Alignment;
  use eyre::Report;
  use pretty_assertions::assert_eq;

  fn alignment(rows: &[&str]) -> Result<Alignment, Report> {
    let seqs = rows
      .iter()
      .map(|row| DnaSequence::from_iupac(row))
      .collect::<Result<Vec<_>, Report>>()?;
    Alignment::from_seqs(seqs)
  }

  /// All valid signatures for an alignment of n sequences:
  /// entry 0 is 0, entry i ranges over 0..=2(i-1).
  fn all_signatures(n: usize) -> Vec<Vec<usize>> {
    let mut signatures = vec![vec![0]];
    for level in 1..n {
      let mut extended = Vec::new();
      for signature in &signatures {
        for edge in 0..=2 * (level - 1) {
          let mut longer = signature.clone();
          longer.push(edge);
          extended.push(longer);
        }
      }
      signatures = extended;
    }
    signatures
  }

  /// Drive `update_score` the way the search does: copy, attach, re-score.
  fn incremental_score(aln: &Alignment, signature: &[usize]) -> Result<usize, Report> {
    let n = aln.len();
    let site_len = aln.site_count();
    let capacity = 2 * n - 1;

    let scratch: Vec<Vec<SeqRef>> = (0..n)
      .map(|level| (0..level).map(|_| seq_ref(DnaSequence::with_len(site_len))).collect())
      .collect();

    let mut prev = Tree::with_capacity(capacity);
    prev.add(signature[0], Arc::clone(aln.seq(0)))?;
    let mut score = prev.root_score().unwrap_or_default();

    for level in 1..n {
      let mut next = Tree::with_capacity(capacity);
      next.copy_from(&prev)?;
      let tip = next.add(signature[level], Arc::clone(aln.seq(level)))?;
      score = update_score(&mut next, tip, &scratch[level])?;
      prev = next;
    }
    Ok(score)
  }

  #[test]
  fn test_fitch_four_tip_caterpillar() -> Result<(), Report> {
    // Signature [0, 0, 0, 0] nests every later tip against tip 0. Columns
    // 0..=2 each force one change and the deepest pairing of AAAA with CCAA
    // costs one extra on column 1.
    let aln = alignment(&["AAAA", "AACA", "ACAA", "CCAA"])?;
    let mut tree = aln.to_tree(&[0, 0, 0, 0])?;
    assert_eq!(compute_score(&mut tree)?, 4);
    Ok(())
  }

  #[test]
  fn test_fitch_score_after_excision_recovers_total() -> Result<(), Report> {
    let mut aln = alignment(&["AAAA", "AACA", "ACAA", "CCAA"])?;
    let excised_changes = aln.excise_uninformative_sites()?;
    assert_eq!(excised_changes, 2);

    // Only the A,A,C,C column survives; the caterpillar splits it twice.
    let mut tree = aln.to_tree(&[0, 0, 0, 0])?;
    assert_eq!(compute_score(&mut tree)?, 2);
    Ok(())
  }

  #[test]
  fn test_fitch_single_tip_scores_zero() -> Result<(), Report> {
    let aln = alignment(&["ACGT"])?;
    let mut tree = aln.to_tree(&[0])?;
    assert_eq!(compute_score(&mut tree)?, 0);
    Ok(())
  }

  #[test]
  fn test_fitch_two_tips() -> Result<(), Report> {
    let aln = alignment(&["ACGT", "ACCA"])?;
    let mut tree = aln.to_tree(&[0, 0])?;
    assert_eq!(compute_score(&mut tree)?, 2);
    Ok(())
  }

  #[test]
  fn test_fitch_ambiguity_codes_absorb_changes() -> Result<(), Report> {
    // N intersects everything, so an N column never costs a change.
    let aln = alignment(&["AN", "CN", "GN"])?;
    let mut tree = aln.to_tree(&[0, 0, 0])?;
    assert_eq!(compute_score(&mut tree)?, 2);
    Ok(())
  }

  #[test]
  fn test_fitch_incremental_matches_full_for_every_signature() -> Result<(), Report> {
    let aln = alignment(&["ACGTAC", "ACGTGG", "ATTTGC", "GCGTAC", "ACTAAC"])?;
    for signature in all_signatures(aln.len()) {
      let mut tree = aln.to_tree(&signature)?;
      let full = compute_score(&mut tree)?;
      let incremental = incremental_score(&aln, &signature)?;
      assert_eq!(full, incremental, "signature {signature:?}");
    }
    Ok(())
  }

  #[test]
  fn test_fitch_excision_offset_holds_for_every_signature() -> Result<(), Report> {
    let rows = ["ACGTAC", "ACGTGG", "ATTTGC", "GCGTAC"];
    let mut excised = alignment(&rows)?;
    let offset = excised.excise_uninformative_sites()?;
    let original = alignment(&rows)?;

    for signature in all_signatures(rows.len()) {
      let mut full_tree = original.to_tree(&signature)?;
      let mut excised_tree = excised.to_tree(&signature)?;
      assert_eq!(
        compute_score(&mut full_tree)?,
        compute_score(&mut excised_tree)? + offset,
        "signature {signature:?}"
      );
    }
    Ok(())
  }

  #[test]
  fn test_fitch_update_score_rejects_out_of_bounds_tip() -> Result<(), Report> {
    let aln = alignment(&["A", "C"])?;
    let mut tree = aln.to_tree(&[0, 0])?;
    compute_score(&mut tree)?;
    assert!(update_score(&mut tree, 99, &[]).is_err());
    Ok(())
  }
}
