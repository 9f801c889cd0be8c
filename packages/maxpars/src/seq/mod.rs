pub mod alignment;
pub mod dna_sequence;

use self::dna_sequence::DnaSequence;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to a sequence.
///
/// Tip sequences are shared by reference between the alignment and every
/// tree they are attached to; interior-node sequences are shared between a
/// tree and the scorer's scratch pool. Tip sequences are never mutated after
/// loading.
pub type SeqRef = Arc<RwLock<DnaSequence>>;

pub fn seq_ref(seq: DnaSequence) -> SeqRef {
  Arc::new(RwLock::new(seq))
}
