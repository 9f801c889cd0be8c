use crate::distance::Distance;
use crate::seq::dna_sequence::DnaSequence;
use eyre::Report;

/// Raw Hamming distance: the number of differing site bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hamming;

impl Distance for Hamming {
  fn distance(&self, a: &DnaSequence, b: &DnaSequence) -> Result<f64, Report> {
    Ok(a.distance(b)? as f64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_ulps_eq;
  use eyre::Report;

  #[test]
  fn test_hamming_counts_differing_sites() -> Result<(), Report> {
    let a = DnaSequence::from_iupac("ACGTACGT")?;
    let b = DnaSequence::from_iupac("ACCTACGA")?;
    assert_ulps_eq!(Hamming.distance(&a, &b)?, 2.0);
    Ok(())
  }

  #[test]
  fn test_hamming_rejects_length_mismatch() -> Result<(), Report> {
    let a = DnaSequence::from_iupac("ACGT")?;
    let b = DnaSequence::from_iupac("AC")?;
    assert!(Hamming.distance(&a, &b).is_err());
    Ok(())
  }
}
