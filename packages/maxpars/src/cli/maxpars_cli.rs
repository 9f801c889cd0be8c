use crate::cli::verbosity::Verbosity;
use crate::commands::search::args::SearchArgs;
use crate::commands::upgma::args::UpgmaArgs;
use crate::utils::global_init::setup_logger;
use clap::{Parser, Subcommand};
use eyre::Report;

/// Maximum-parsimony phylogenetic tree inference
///
/// Reconstructs rooted bifurcating evolutionary trees from aligned DNA
/// sequences by exhaustive branch-and-bound search under the Fitch
/// parsimony criterion.
#[derive(Parser, Debug)]
#[clap(name = "maxpars")]
#[clap(author, version)]
pub struct MaxparsArgs {
  #[clap(subcommand)]
  pub command: MaxparsCommands,

  #[clap(flatten)]
  pub verbosity: Verbosity,
}

#[derive(Subcommand, Debug)]
pub enum MaxparsCommands {
  /// Find every most-parsimonious tree by branch-and-bound search over all
  /// rooted bifurcating topologies.
  Search(SearchArgs),

  /// Build a distance-based tree by UPGMA agglomerative clustering.
  Upgma(UpgmaArgs),
}

pub fn maxpars_parse_cli_args() -> Result<MaxparsArgs, Report> {
  let args = MaxparsArgs::parse();
  setup_logger(args.verbosity.get_filter_level());
  Ok(args)
}
