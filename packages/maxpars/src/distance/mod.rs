pub mod hamming;
pub mod jukes_cantor;

use crate::seq::dna_sequence::DnaSequence;
use eyre::Report;

/// A pairwise distance over equal-length sequences.
///
/// Implementations must return non-negative values; saturating corrections
/// return positive infinity rather than NaN so that minimum searches over a
/// distance matrix stay well behaved.
pub trait Distance {
  fn distance(&self, a: &DnaSequence, b: &DnaSequence) -> Result<f64, Report>;
}
