use crate::clustering::upgma::upgma;
use crate::commands::upgma::args::{DistanceMetric, UpgmaArgs};
use crate::distance::hamming::Hamming;
use crate::distance::jukes_cantor::JukesCantor;
use crate::distance::Distance;
use crate::io::file::create_file;
use crate::io::phylip::read_phylip_file;
use crate::tree::nwk::{write_nwk_str, WriteNwkOptions};
use eyre::Report;
use log::info;
use std::io::Write;
use std::path::Path;

pub fn run_upgma(args: &UpgmaArgs) -> Result<(), Report> {
  let aln = read_phylip_file(&args.input)?;
  info!("Read {} sequences of {} sites", aln.len(), aln.site_count());

  let distance: &dyn Distance = match args.distance {
    DistanceMetric::JukesCantor => &JukesCantor,
    DistanceMetric::Hamming => &Hamming,
  };

  let tree = upgma(&aln, distance)?;

  let output = args.output.clone().unwrap_or_else(|| Path::new("-").to_path_buf());
  let mut writer = create_file(&output)?;
  writeln!(writer, "{}", write_nwk_str(&tree, &WriteNwkOptions::default())?)?;
  Ok(())
}
