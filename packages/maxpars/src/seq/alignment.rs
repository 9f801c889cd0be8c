use crate::alphabet::iupac::{POPCOUNT4, STATE_ANY};
use crate::make_error;
use crate::seq::dna_sequence::DnaSequence;
use crate::seq::{seq_ref, SeqRef};
use crate::tree::tree::Tree;
use eyre::Report;
use std::sync::Arc;

/// Per-site analysis of an alignment, computed lazily and invalidated by
/// mutation of the site vectors.
#[derive(Clone, Debug)]
struct SiteAnalysis {
  /// True at sites where at least two distinct states each occur in at
  /// least two sequences. Only informative sites can change the optimal
  /// topology.
  informative: Vec<bool>,
  informative_count: usize,
  /// State changes contributed by uninformative sites: the sum over those
  /// sites of (distinct states - 1). Uninformative sites contribute exactly
  /// this much to the Fitch score of any tree.
  uninformative_changes: usize,
}

/// An alignment: a collection of equal-length DNA sequences, ordered as
/// loaded. Tips are handed to trees by reference.
#[derive(Clone, Debug, Default)]
pub struct Alignment {
  seqs: Vec<SeqRef>,
  analysis: Option<SiteAnalysis>,
}

impl Alignment {
  pub fn from_seqs(seqs: Vec<DnaSequence>) -> Result<Self, Report> {
    if let Some(first) = seqs.first() {
      let len = first.len();
      if let Some(bad) = seqs.iter().find(|seq| seq.len() != len) {
        return make_error!(
          "All sequences in an alignment must have equal lengths, but '{}' has {} sites while '{}' has {}",
          bad.name().unwrap_or("<unnamed>"),
          bad.len(),
          first.name().unwrap_or("<unnamed>"),
          len
        );
      }
    }
    Ok(Self {
      seqs: seqs.into_iter().map(seq_ref).collect(),
      analysis: None,
    })
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.seqs.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.seqs.is_empty()
  }

  /// Number of sites per member sequence.
  pub fn site_count(&self) -> usize {
    self.seqs.first().map_or(0, |seq| seq.read().len())
  }

  #[inline]
  pub fn seq(&self, index: usize) -> &SeqRef {
    &self.seqs[index]
  }

  #[inline]
  pub fn seqs(&self) -> &[SeqRef] {
    &self.seqs
  }

  fn analysis(&mut self) -> &SiteAnalysis {
    if self.analysis.is_none() {
      self.analysis = Some(self.analyze());
    }
    self.analysis.as_ref().unwrap()
  }

  fn analyze(&self) -> SiteAnalysis {
    let n_sites = self.site_count();
    let mut informative = vec![false; n_sites];
    let mut informative_count = 0;
    let mut uninformative_changes = 0;

    for pos in 0..n_sites {
      let mut occurrences = [0_usize; 16];
      for seq in &self.seqs {
        occurrences[seq.read().site(pos) as usize] += 1;
      }

      let distinct = occurrences.iter().filter(|&&count| count > 0).count();
      let repeated = occurrences.iter().filter(|&&count| count >= 2).count();

      if repeated >= 2 {
        informative[pos] = true;
        informative_count += 1;
      } else {
        uninformative_changes += distinct.saturating_sub(1);
      }
    }

    SiteAnalysis {
      informative,
      informative_count,
      uninformative_changes,
    }
  }

  /// Bitmap of informative sites, true where a site can affect the optimal
  /// topology.
  pub fn informative_sites(&mut self) -> &[bool] {
    &self.analysis().informative
  }

  pub fn informative_site_count(&mut self) -> usize {
    self.analysis().informative_count
  }

  /// State changes contributed by uninformative sites to the Fitch score of
  /// every tree over this alignment.
  pub fn uninformative_changes(&mut self) -> usize {
    self.analysis().uninformative_changes
  }

  /// Project every member onto its informative sites, strictly reducing the
  /// scoring work without changing which topologies are optimal.
  ///
  /// Returns the state-change count of the removed sites; adding it to any
  /// subsequent parsimony score recovers the score over the original
  /// alignment.
  pub fn excise_uninformative_sites(&mut self) -> Result<usize, Report> {
    let analysis = self.analysis().clone();

    for seq in &self.seqs {
      let mut seq = seq.write();
      let projected = seq
        .sites()
        .iter()
        .zip(analysis.informative.iter())
        .filter(|(_, &keep)| keep)
        .map(|(&state, _)| state)
        .collect();
      seq.set_sites(projected)?;
    }

    // Every surviving site is informative.
    self.analysis = Some(SiteAnalysis {
      informative: vec![true; analysis.informative_count],
      informative_count: analysis.informative_count,
      uninformative_changes: 0,
    });

    Ok(analysis.uninformative_changes)
  }

  /// Lower-bound lookahead for the branch-and-bound search.
  ///
  /// Returns `A` where `A[i]` counts, summed over sites, the state bits
  /// present in the union of all sequences but absent from every sequence
  /// among `0..=i`. Each such bit must appear through a state change on an
  /// edge added after depth i, so `A[i]` is a valid additive lower bound on
  /// the remaining work.
  pub fn count_absent_states(&self) -> Vec<usize> {
    let n_sites = self.site_count();

    let mut union = vec![0_u8; n_sites];
    for seq in &self.seqs {
      let seq = seq.read();
      for (u, &state) in union.iter_mut().zip(seq.sites()) {
        *u |= state;
      }
    }

    let mut remaining = union;
    let mut absent = Vec::with_capacity(self.seqs.len());
    for seq in &self.seqs {
      let seq = seq.read();
      let mut count = 0_usize;
      for (r, &state) in remaining.iter_mut().zip(seq.sites()) {
        *r &= !state & STATE_ANY;
        count += POPCOUNT4[*r as usize] as usize;
      }
      absent.push(count);
    }
    absent
  }

  /// Materialize the tree a signature describes by replaying `add` over the
  /// members in order.
  pub fn to_tree(&self, signature: &[usize]) -> Result<Tree, Report> {
    if signature.len() != self.seqs.len() {
      return make_error!(
        "Signature length {} does not match the number of sequences {}",
        signature.len(),
        self.seqs.len()
      );
    }
    let mut tree = Tree::with_capacity(2 * self.seqs.len().max(1) - 1);
    for (&edge, seq) in signature.iter().zip(self.seqs.iter()) {
      tree.add(edge, Arc::clone(seq))?;
    }
    Ok(tree)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;

  fn alignment(rows: &[&str]) -> Result<Alignment, Report> {
    let seqs = rows
      .iter()
      .map(|row| DnaSequence::from_iupac(row))
      .collect::<Result<Vec<_>, Report>>()?;
    Alignment::from_seqs(seqs)
  }

  #[test]
  fn test_alignment_rejects_unequal_lengths() -> Result<(), Report> {
    let seqs = vec![DnaSequence::from_iupac("ACGT")?, DnaSequence::from_iupac("ACG")?];
    assert!(Alignment::from_seqs(seqs).is_err());
    Ok(())
  }

  #[test]
  fn test_alignment_uninformative_analysis() -> Result<(), Report> {
    // Column 0 is constant, columns 1..=3 each have a single minority state:
    // no informative sites, and 0 + 1 + 1 + 1 = 3 uninformative changes.
    let mut aln = alignment(&["AAAA", "AAAC", "ACAA", "AAAA"])?;
    assert_eq!(aln.informative_site_count(), 0);
    assert_eq!(aln.uninformative_changes(), 3);
    assert_eq!(aln.informative_sites(), &[false, false, false, false]);
    Ok(())
  }

  #[test]
  fn test_alignment_informative_site_detected() -> Result<(), Report> {
    // Column 0: A,A,C,C -> two states twice each, informative.
    let mut aln = alignment(&["AA", "AA", "CA", "CA"])?;
    assert_eq!(aln.informative_sites(), &[true, false]);
    assert_eq!(aln.informative_site_count(), 1);
    Ok(())
  }

  #[test]
  fn test_alignment_excise_uninformative_sites() -> Result<(), Report> {
    let mut aln = alignment(&["AAAA", "AAAC", "ACAA", "AAAA"])?;
    let changes = aln.excise_uninformative_sites()?;
    assert_eq!(changes, 3);
    assert_eq!(aln.site_count(), 0);
    assert_eq!(aln.uninformative_changes(), 0);
    Ok(())
  }

  #[test]
  fn test_alignment_excise_keeps_informative_projection() -> Result<(), Report> {
    let mut aln = alignment(&["ACA", "ACC", "CAA", "CAC"])?;
    // Columns 0 and 1 are informative, column 2 is a 2/2 split as well.
    assert_eq!(aln.informative_sites(), &[true, true, true]);

    let mut aln = alignment(&["ACA", "ACA", "CAA", "CAC"])?;
    // Column 2: A,A,A,C -> uninformative.
    let changes = aln.excise_uninformative_sites()?;
    assert_eq!(changes, 1);
    assert_eq!(aln.site_count(), 2);
    assert_eq!(aln.seq(0).read().to_string(), "AC");
    Ok(())
  }

  #[test]
  fn test_alignment_count_absent_states() -> Result<(), Report> {
    // Union at the single site is {A,C,G,T}; placing tips in order leaves
    // 3, 2, 1, then 0 states unseen.
    let aln = alignment(&["A", "C", "G", "T"])?;
    assert_eq!(aln.count_absent_states(), vec![3, 2, 1, 0]);
    Ok(())
  }

  #[test]
  fn test_alignment_count_absent_states_multi_site() -> Result<(), Report> {
    let aln = alignment(&["AC", "AG", "AT"])?;
    // Site 0 never contributes. Site 1 union is {C,G,T}: after tip 0 two
    // bits remain, after tip 1 one bit, after tip 2 none.
    assert_eq!(aln.count_absent_states(), vec![2, 1, 0]);
    Ok(())
  }

  #[test]
  fn test_alignment_to_tree_shares_tip_sequences() -> Result<(), Report> {
    let aln = alignment(&["A", "C", "G"])?;
    let tree = aln.to_tree(&[0, 0, 0])?;
    assert_eq!(tree.len(), 5);
    assert!(Arc::ptr_eq(aln.seq(0), tree.node(0).seq.as_ref().unwrap()));
    Ok(())
  }

  #[test]
  fn test_alignment_to_tree_rejects_wrong_signature_length() -> Result<(), Report> {
    let aln = alignment(&["A", "C", "G"])?;
    assert!(aln.to_tree(&[0, 0]).is_err());
    Ok(())
  }
}
