use clap::{Args, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DistanceMetric {
  /// Jukes-Cantor corrected distance (saturated pairs become infinite)
  JukesCantor,
  /// Raw Hamming distance
  Hamming,
}

#[derive(Args, Debug)]
pub struct UpgmaArgs {
  /// Path to the input alignment in interleaved PHYLIP format
  #[clap(value_hint = ValueHint::FilePath)]
  pub input: PathBuf,

  /// Distance used between sequence pairs
  #[clap(long, value_enum, default_value = "jukes-cantor")]
  pub distance: DistanceMetric,

  /// Write the tree to this file ('-' for standard output)
  #[clap(long, short = 'o', value_hint = ValueHint::FilePath)]
  pub output: Option<PathBuf>,
}
