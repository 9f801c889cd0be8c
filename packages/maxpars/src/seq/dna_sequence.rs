use crate::alphabet::iupac::{from_states, to_states};
use crate::make_error;
use eyre::{Report, WrapErr};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNA sequence over 4-bit ambiguity states, one byte per site.
///
/// Every site byte lies in `0..=15` and encodes a subset of `{A, C, G, T}`
/// with bit weights A=1, C=2, G=4, T=8. The score field accumulates Fitch
/// state changes when the sequence is used as an ancestor; tip sequences
/// carry score 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DnaSequence {
  sites: Vec<u8>,
  score: usize,
  name: Option<String>,
}

impl DnaSequence {
  /// A zero-filled (all-gap) sequence of the given length, for interior
  /// nodes that will be overwritten by Fitch scoring.
  pub fn with_len(len: usize) -> Self {
    Self {
      sites: vec![0; len],
      score: 0,
      name: None,
    }
  }

  /// Parse a sequence from IUPAC ambiguity characters (case-insensitive).
  pub fn from_iupac(str: &str) -> Result<Self, Report> {
    let sites = to_states(str).wrap_err_with(|| format!("When parsing sequence '{str}'"))?;
    Ok(Self {
      sites,
      score: 0,
      name: None,
    })
  }

  /// Construct from raw 4-bit states. Rejects bytes above 15.
  pub fn from_states(sites: Vec<u8>) -> Result<Self, Report> {
    if let Some(&bad) = sites.iter().find(|&&state| state > 15) {
      return make_error!("Site state {bad} is out of the valid range 0..=15");
    }
    Ok(Self {
      sites,
      score: 0,
      name: None,
    })
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.sites.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.sites.is_empty()
  }

  #[inline]
  pub fn sites(&self) -> &[u8] {
    &self.sites
  }

  #[inline]
  pub fn site(&self, pos: usize) -> u8 {
    self.sites[pos]
  }

  #[inline]
  pub const fn score(&self) -> usize {
    self.score
  }

  #[inline]
  pub fn set_score(&mut self, score: usize) {
    self.score = score;
  }

  #[inline]
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn set_name(&mut self, name: impl Into<String>) {
    self.name = Some(name.into());
  }

  /// Replace the site vector wholesale. Used by uninformative-site excision.
  pub fn set_sites(&mut self, sites: Vec<u8>) -> Result<(), Report> {
    if let Some(&bad) = sites.iter().find(|&&state| state > 15) {
      return make_error!("Site state {bad} is out of the valid range 0..=15");
    }
    self.sites = sites;
    Ok(())
  }

  /// Copy another sequence's sites into this one.
  pub fn copy_sites(&mut self, other: &DnaSequence) {
    self.sites.clear();
    self.sites.extend_from_slice(&other.sites);
  }

  /// Hamming distance: the number of sites whose raw state bytes differ.
  ///
  /// Ambiguity codes participate by byte inequality, not by set difference.
  pub fn distance(&self, other: &DnaSequence) -> Result<usize, Report> {
    if self.len() != other.len() {
      return make_error!(
        "Cannot compute distance between sequences of different lengths: {} vs {}",
        self.len(),
        other.len()
      );
    }
    Ok(
      self
        .sites
        .iter()
        .zip(other.sites.iter())
        .filter(|(a, b)| a != b)
        .count(),
    )
  }

  /// Overwrite this sequence with the Fitch ancestor of two children.
  ///
  /// Site-wise: the intersection of the child states if non-empty, their
  /// union otherwise, counting one state change per union site. The score
  /// becomes the sum of both child scores plus the local change count, so
  /// propagating this through all ancestors yields the tree's parsimony
  /// score at the root.
  pub fn set_fitch_ancestor(&mut self, a: &DnaSequence, b: &DnaSequence) -> Result<(), Report> {
    if a.len() != b.len() {
      return make_error!(
        "Cannot compute Fitch ancestor of sequences of different lengths: {} vs {}",
        a.len(),
        b.len()
      );
    }

    self.sites.resize(a.len(), 0);

    let mut changes = 0;
    for (site, (&sa, &sb)) in self.sites.iter_mut().zip(a.sites.iter().zip(b.sites.iter())) {
      let intersection = sa & sb;
      if intersection != 0 {
        *site = intersection;
      } else {
        *site = sa | sb;
        changes += 1;
      }
    }

    self.score = a.score + b.score + changes;
    Ok(())
  }
}

impl fmt::Display for DnaSequence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", from_states(&self.sites))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[test]
  fn test_dna_sequence_from_iupac() -> Result<(), Report> {
    let seq = DnaSequence::from_iupac("acgtN-")?;
    assert_eq!(seq.sites(), &[1, 2, 4, 8, 15, 0]);
    assert_eq!(seq.score(), 0);
    Ok(())
  }

  #[test]
  fn test_dna_sequence_from_iupac_rejects_unknown() {
    assert!(DnaSequence::from_iupac("ACZT").is_err());
  }

  #[test]
  fn test_dna_sequence_from_states_validates_range() {
    assert!(DnaSequence::from_states(vec![0, 15]).is_ok());
    assert!(DnaSequence::from_states(vec![16]).is_err());
  }

  #[test]
  fn test_dna_sequence_display_roundtrip() -> Result<(), Report> {
    let text = "ACMGRSVTWYHKDBN-";
    let seq = DnaSequence::from_iupac(text)?;
    assert_eq!(seq.to_string(), text);
    Ok(())
  }

  #[rstest]
  #[case("AAAA", "AAAA", 0)]
  #[case("AAAA", "AACA", 1)]
  #[case("ACGT", "TGCA", 4)]
  #[case("ANGT", "AAGT", 1)] // N != A by byte inequality
  fn test_dna_sequence_distance(#[case] a: &str, #[case] b: &str, #[case] expected: usize) -> Result<(), Report> {
    let a = DnaSequence::from_iupac(a)?;
    let b = DnaSequence::from_iupac(b)?;
    assert_eq!(a.distance(&b)?, expected);
    Ok(())
  }

  #[test]
  fn test_dna_sequence_distance_rejects_length_mismatch() -> Result<(), Report> {
    let a = DnaSequence::from_iupac("ACGT")?;
    let b = DnaSequence::from_iupac("ACG")?;
    assert!(a.distance(&b).is_err());
    Ok(())
  }

  #[test]
  fn test_dna_sequence_fitch_ancestor_intersection_and_union() -> Result<(), Report> {
    let a = DnaSequence::from_iupac("AAC")?;
    let b = DnaSequence::from_iupac("ACC")?;
    let mut anc = DnaSequence::with_len(3);
    anc.set_fitch_ancestor(&a, &b)?;

    // site 0: A&A = A; site 1: A&C = 0 -> A|C = M; site 2: C&C = C
    assert_eq!(anc.to_string(), "AMC");
    assert_eq!(anc.score(), 1);
    Ok(())
  }

  #[test]
  fn test_dna_sequence_fitch_ancestor_accumulates_child_scores() -> Result<(), Report> {
    let mut a = DnaSequence::from_iupac("A")?;
    let mut b = DnaSequence::from_iupac("C")?;
    a.set_score(2);
    b.set_score(3);

    let mut anc = DnaSequence::with_len(1);
    anc.set_fitch_ancestor(&a, &b)?;
    assert_eq!(anc.score(), 6);
    Ok(())
  }

  #[test]
  fn test_dna_sequence_fitch_ancestor_rejects_length_mismatch() -> Result<(), Report> {
    let a = DnaSequence::from_iupac("AC")?;
    let b = DnaSequence::from_iupac("A")?;
    let mut anc = DnaSequence::with_len(2);
    assert!(anc.set_fitch_ancestor(&a, &b).is_err());
    Ok(())
  }

  #[test]
  fn test_dna_sequence_copy_sites_replaces_contents() -> Result<(), Report> {
    let source = DnaSequence::from_iupac("ACGT")?;
    let mut target = DnaSequence::with_len(2);
    target.copy_sites(&source);
    assert_eq!(target.sites(), source.sites());
    assert_eq!(target.score(), 0);
    Ok(())
  }

  #[test]
  fn test_dna_sequence_equality_covers_score_and_name() -> Result<(), Report> {
    let a = DnaSequence::from_iupac("ACGT")?;
    let mut b = DnaSequence::from_iupac("ACGT")?;
    assert_eq!(a, b);
    b.set_score(1);
    assert_ne!(a, b);
    b.set_score(0);
    b.set_name("b");
    assert_ne!(a, b);
    Ok(())
  }
}
