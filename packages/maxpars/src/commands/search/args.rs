use clap::{Args, ValueHint};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SearchArgs {
  /// Path to the input alignment in interleaved PHYLIP format
  #[clap(value_hint = ValueHint::FilePath)]
  pub input: PathBuf,

  /// Keep at most this many equally optimal trees
  #[clap(long, short = 'm', default_value_t = 100)]
  pub max_trees: usize,

  /// Initial upper bound on the parsimony score.
  ///
  /// When omitted, the Fitch score of a UPGMA starting tree under the
  /// Jukes-Cantor distance is used. A bound below the true optimum prunes
  /// every tree and yields no results.
  #[clap(long)]
  pub bound: Option<usize>,

  /// Search over the full alignment instead of excising uninformative sites first
  #[clap(long)]
  pub keep_uninformative: bool,

  /// Write results to this file ('-' for standard output)
  #[clap(long, short = 'o', value_hint = ValueHint::FilePath)]
  pub output: Option<PathBuf>,

  /// Emit the score and tree signatures as JSON instead of Newick trees
  #[clap(long)]
  pub json: bool,
}
