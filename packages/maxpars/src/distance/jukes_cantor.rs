use crate::distance::Distance;
use crate::seq::dna_sequence::DnaSequence;
use eyre::Report;

/// Jukes-Cantor corrected distance, in units of expected substitutions over
/// the whole sequence: `-3/4 * N * ln(1 - 4/3 * d/N)` for Hamming distance
/// d over N sites.
///
/// Saturated pairs (argument of the logarithm at or below zero) yield
/// positive infinity. The absolute value guards against negative zeros from
/// floating-point noise on identical sequences.
#[derive(Clone, Copy, Debug, Default)]
pub struct JukesCantor;

impl Distance for JukesCantor {
  fn distance(&self, a: &DnaSequence, b: &DnaSequence) -> Result<f64, Report> {
    let hamming = a.distance(b)? as f64;
    let n_sites = a.len() as f64;
    if n_sites == 0.0 {
      return Ok(0.0);
    }

    let argument = 1.0 - 4.0 / 3.0 * hamming / n_sites;
    if argument <= 0.0 {
      return Ok(f64::INFINITY);
    }
    Ok((-0.75 * n_sites * argument.ln()).abs())
  }
}
