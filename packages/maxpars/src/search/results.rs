use crate::make_error;
use eyre::Report;
use serde::{Deserialize, Serialize};

/// Best score seen so far and up to `capacity` tree signatures achieving it.
///
/// A strictly better score empties the collection; signatures arriving at
/// the current best score are appended in insertion order until the capacity
/// is reached, then silently dropped. There is no deduplication. The score
/// starts at the usize::MAX sentinel, standing in for positive infinity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResults {
  signatures: Vec<Vec<usize>>,
  score: usize,
  capacity: usize,
}

impl SearchResults {
  pub fn new(capacity: usize) -> Result<Self, Report> {
    if capacity == 0 {
      return make_error!("Results capacity must be positive");
    }
    Ok(Self {
      signatures: Vec::new(),
      score: usize::MAX,
      capacity,
    })
  }

  #[inline]
  pub const fn score(&self) -> usize {
    self.score
  }

  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.signatures.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.signatures.is_empty()
  }

  #[inline]
  pub fn signatures(&self) -> &[Vec<usize>] {
    &self.signatures
  }

  pub fn add(&mut self, signature: &[usize], score: usize) {
    if score < self.score {
      self.signatures.clear();
      self.score = score;
    }
    if score == self.score && self.signatures.len() < self.capacity {
      self.signatures.push(signature.to_vec());
    }
  }

  /// Replay another accumulator's entries in order.
  pub fn add_all(&mut self, other: &SearchResults) {
    for signature in &other.signatures {
      self.add(signature, other.score);
    }
  }

  /// Install an externally obtained bound: a score known to be achievable
  /// (or an upper bound on the optimum) that tightens pruning before any
  /// signature is recorded.
  pub fn reduce_score(&mut self, score: usize) {
    if score < self.score {
      self.signatures.clear();
      self.score = score;
    }
  }

  pub fn clear(&mut self) {
    self.signatures.clear();
    self.score = usize::MAX;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_results_rejects_zero_capacity() {
    assert!(SearchResults::new(0).is_err());
  }

  #[test]
  fn test_results_better_score_clears_previous() -> Result<(), Report> {
    let mut results = SearchResults::new(4)?;
    results.add(&[0, 0, 1], 7);
    results.add(&[0, 0, 2], 7);
    assert_eq!(results.len(), 2);

    results.add(&[0, 0, 0], 5);
    assert_eq!(results.score(), 5);
    assert_eq!(results.signatures(), &[vec![0, 0, 0]]);
    Ok(())
  }

  #[test]
  fn test_results_worse_score_is_ignored() -> Result<(), Report> {
    let mut results = SearchResults::new(4)?;
    results.add(&[0, 0], 3);
    results.add(&[0, 1], 9);
    assert_eq!(results.score(), 3);
    assert_eq!(results.len(), 1);
    Ok(())
  }

  #[test]
  fn test_results_capacity_drops_extra_ties() -> Result<(), Report> {
    let mut results = SearchResults::new(2)?;
    results.add(&[0, 0, 0], 4);
    results.add(&[0, 0, 1], 4);
    results.add(&[0, 0, 2], 4);
    assert_eq!(results.len(), 2);
    assert_eq!(results.signatures(), &[vec![0, 0, 0], vec![0, 0, 1]]);
    Ok(())
  }

  #[test]
  fn test_results_add_all_replays_in_order() -> Result<(), Report> {
    let mut a = SearchResults::new(4)?;
    a.add(&[0, 0], 6);

    let mut b = SearchResults::new(4)?;
    b.add(&[0, 1], 5);
    b.add(&[0, 0], 5);

    a.add_all(&b);
    assert_eq!(a.score(), 5);
    assert_eq!(a.signatures(), &[vec![0, 1], vec![0, 0]]);
    Ok(())
  }

  #[test]
  fn test_results_reduce_score_installs_bound() -> Result<(), Report> {
    let mut results = SearchResults::new(4)?;
    results.add(&[0, 0], 6);
    results.reduce_score(4);
    assert_eq!(results.score(), 4);
    assert!(results.is_empty());

    // A bound above the current score changes nothing.
    results.reduce_score(10);
    assert_eq!(results.score(), 4);
    Ok(())
  }

  #[test]
  fn test_results_clear_restores_sentinel() -> Result<(), Report> {
    let mut results = SearchResults::new(4)?;
    results.add(&[0, 0], 6);
    results.clear();
    assert_eq!(results.score(), usize::MAX);
    assert!(results.is_empty());
    Ok(())
  }
}
