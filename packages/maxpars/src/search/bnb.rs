use crate::make_error;
use crate::parsimony::fitch;
use crate::search::results::SearchResults;
use crate::seq::alignment::Alignment;
use crate::seq::dna_sequence::DnaSequence;
use crate::seq::{seq_ref, SeqRef};
use crate::tree::tree::Tree;
use eyre::Report;
use itertools::Itertools;
use log::debug;
use std::sync::Arc;

/// Depth-first branch-and-bound enumeration of rooted bifurcating tree
/// signatures under the Fitch parsimony criterion.
///
/// Tip i extends a partial tree along one of its 2i-1 edges, so
/// `signature[i]` sweeps 0..=2(i-1) and every topology is visited exactly
/// once. A subtree is pruned when its partial score plus the absent-state
/// lower bound already exceeds the best score seen. All search-time
/// allocations happen at construction: one tree per level, one scratch
/// sequence row per level, the signature buffer.
pub struct MaxParsimonySearch {
  seqs: Vec<SeqRef>,
  absent: Vec<usize>,
  tree_stack: Vec<Tree>,
  scratch: Vec<Vec<SeqRef>>,
  signature: Vec<Option<usize>>,
  results: SearchResults,
}

impl MaxParsimonySearch {
  /// Prepare a search over an alignment, with an initial upper bound on the
  /// parsimony score (`usize::MAX` when unknown) and a cap on how many
  /// equally optimal signatures to keep.
  pub fn new(aln: &Alignment, initial_bound: usize, result_capacity: usize) -> Result<Self, Report> {
    let n = aln.len();
    if n == 0 {
      return make_error!("Cannot search over an empty alignment");
    }

    let site_len = aln.site_count();
    let tree_capacity = 2 * n - 1;

    let mut results = SearchResults::new(result_capacity)?;
    results.reduce_score(initial_bound);

    Ok(Self {
      seqs: aln.seqs().to_vec(),
      absent: aln.count_absent_states(),
      tree_stack: (0..n).map(|_| Tree::with_capacity(tree_capacity)).collect(),
      scratch: (0..n)
        .map(|level| (0..level).map(|_| seq_ref(DnaSequence::with_len(site_len))).collect())
        .collect(),
      signature: vec![None; n],
      results,
    })
  }

  /// Run the search to completion and return the accumulated results.
  pub fn run(mut self) -> Result<SearchResults, Report> {
    let n = self.seqs.len();

    self.tree_stack[0].clear();
    self.tree_stack[0].add(0, Arc::clone(&self.seqs[0]))?;
    self.signature[0] = Some(0);

    let mut level = 1;
    while level > 0 {
      if level == n {
        // A complete tree: the previous level's tree holds all tips.
        if let Some(score) = self.tree_stack[n - 1].root_score() {
          if score <= self.results.score() {
            let signature = self.signature.iter().map(|edge| edge.unwrap_or_default()).collect_vec();
            debug!("Recording tree with score {score}: {signature:?}");
            self.results.add(&signature, score);
          }
        }
        level -= 1;
        continue;
      }

      if self.signature[level] == Some(2 * (level - 1)) {
        // Every edge choice at this level has been tried.
        self.signature[level] = None;
        level -= 1;
        continue;
      }

      let edge = self.signature[level].map_or(0, |edge| edge + 1);
      self.signature[level] = Some(edge);

      let (lower, upper) = self.tree_stack.split_at_mut(level);
      let tree = &mut upper[0];
      tree.copy_from(&lower[level - 1])?;
      let tip = tree.add(edge, Arc::clone(&self.seqs[level]))?;
      let partial = fitch::update_score(tree, tip, &self.scratch[level])?;

      // Every state still absent after this level forces at least one
      // change on some later edge.
      if partial + self.absent[level] <= self.results.score() {
        level += 1;
      }
    }

    Ok(self.results)
  }
}
