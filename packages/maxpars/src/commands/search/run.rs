use crate::clustering::upgma::upgma;
use crate::commands::search::args::SearchArgs;
use crate::distance::jukes_cantor::JukesCantor;
use crate::io::file::create_file;
use crate::io::phylip::read_phylip_file;
use crate::parsimony::fitch::compute_score;
use crate::search::bnb::MaxParsimonySearch;
use crate::search::results::SearchResults;
use crate::seq::alignment::Alignment;
use crate::tree::nwk::{write_nwk_str, WriteNwkOptions};
use eyre::Report;
use log::{info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct SearchReport<'a> {
  score: usize,
  signatures: &'a [Vec<usize>],
}

pub fn run_search(args: &SearchArgs) -> Result<(), Report> {
  let mut aln = read_phylip_file(&args.input)?;
  info!("Read {} sequences of {} sites", aln.len(), aln.site_count());

  let excised_changes = if args.keep_uninformative {
    0
  } else {
    let n_before = aln.site_count();
    let changes = aln.excise_uninformative_sites()?;
    info!(
      "Excised {} uninformative sites contributing {changes} state changes; {} sites remain",
      n_before - aln.site_count(),
      aln.site_count()
    );
    changes
  };

  let bound = match args.bound {
    Some(bound) => bound,
    None => {
      let mut guide = upgma(&aln, &JukesCantor)?;
      let score = compute_score(&mut guide)?;
      info!("UPGMA starting tree has parsimony score {score}");
      score
    }
  };

  let results = MaxParsimonySearch::new(&aln, bound, args.max_trees)?.run()?;
  if results.is_empty() {
    warn!(
      "No tree was found within the initial bound {bound}; the bound is below the optimal score"
    );
  } else {
    info!(
      "Found {} optimal trees with parsimony score {}",
      results.len(),
      results.score() + excised_changes
    );
  }

  write_results(args, &aln, &results, excised_changes)
}

fn write_results(
  args: &SearchArgs,
  aln: &Alignment,
  results: &SearchResults,
  excised_changes: usize,
) -> Result<(), Report> {
  let output = args.output.clone().unwrap_or_else(|| Path::new("-").to_path_buf());
  let mut writer = create_file(&output)?;

  if args.json {
    let report = SearchReport {
      score: results.score().saturating_add(excised_changes),
      signatures: results.signatures(),
    };
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    return Ok(());
  }

  for signature in results.signatures() {
    let tree = aln.to_tree(signature)?;
    writeln!(writer, "{}", write_nwk_str(&tree, &WriteNwkOptions::default())?)?;
  }
  Ok(())
}
