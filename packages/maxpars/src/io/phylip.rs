use crate::alphabet::iupac::to_state;
use crate::io::fs::read_file_to_string;
use crate::make_error;
use crate::seq::alignment::Alignment;
use crate::seq::dna_sequence::DnaSequence;
use eyre::{Report, WrapErr};
use itertools::Itertools;
use std::path::Path;

/// Width of the fixed name field on first-group lines.
const NAME_WIDTH: usize = 10;

pub fn read_phylip_file(filepath: impl AsRef<Path>) -> Result<Alignment, Report> {
  let filepath = filepath.as_ref();
  let contents = read_file_to_string(filepath)?;
  read_phylip_str(&contents).wrap_err_with(|| format!("When parsing PHYLIP file '{}'", filepath.display()))
}

/// Parse an interleaved PHYLIP alignment.
///
/// The header line carries the species and site counts. Lines then come in
/// groups of one per species: in the first group each line starts with a
/// 10-character fixed-width name, in later groups every character is a
/// site. Blank lines are ignored. Sites are case-insensitive IUPAC codes,
/// `?` for fully ambiguous, and `.` meaning "same as species 1 at this
/// position". Any malformed input fails the whole read; no partial
/// alignment is returned.
pub fn read_phylip_str(contents: &str) -> Result<Alignment, Report> {
  let mut lines = contents.lines().map(str::trim_end).filter(|line| !line.trim().is_empty());

  let header = match lines.next() {
    Some(header) => header,
    None => return make_error!("PHYLIP input is empty"),
  };
  let (n_species, n_sites) = parse_header(header)?;

  let mut names: Vec<String> = Vec::with_capacity(n_species);
  let mut sites: Vec<Vec<u8>> = Vec::with_capacity(n_species);

  for (index, line) in lines.enumerate() {
    let species_index = index % n_species;
    let in_first_group = index < n_species;

    let site_chars: Vec<char> = if in_first_group {
      let chars = line.chars().collect_vec();
      if chars.len() < NAME_WIDTH {
        return make_error!(
          "Species {} has a name field shorter than the fixed width of {NAME_WIDTH} characters: '{line}'",
          species_index + 1
        );
      }
      let name: String = chars[..NAME_WIDTH].iter().collect();
      names.push(name.trim().to_owned());
      sites.push(Vec::with_capacity(n_sites));
      chars[NAME_WIDTH..].to_vec()
    } else {
      line.chars().collect_vec()
    };

    for c in site_chars {
      let pos = sites[species_index].len();
      if pos >= n_sites {
        return make_error!(
          "Species '{}' has too many sites: expected {n_sites}",
          names[species_index]
        );
      }

      let state = if c == '.' {
        if species_index == 0 {
          return make_error!("Character '.' is not allowed in species 1, which it refers to");
        }
        match sites[0].get(pos) {
          Some(&state) => state,
          None => {
            return make_error!(
              "Character '.' at site {} of species '{}' has no corresponding site in species 1",
              pos + 1,
              names[species_index]
            )
          }
        }
      } else {
        to_state(c).wrap_err_with(|| format!("When reading sites of species '{}'", names[species_index]))?
      };

      sites[species_index].push(state);
    }
  }

  if names.len() < n_species {
    return make_error!("Expected {n_species} species but found only {}", names.len());
  }
  if let Some(short) = sites.iter().position(|s| s.len() < n_sites) {
    return make_error!(
      "Species '{}' has too few sites: expected {n_sites}, found {}",
      names[short],
      sites[short].len()
    );
  }

  let seqs = names
    .into_iter()
    .zip(sites)
    .map(|(name, sites)| {
      let mut seq = DnaSequence::from_states(sites)?;
      seq.set_name(name);
      Ok(seq)
    })
    .collect::<Result<Vec<_>, Report>>()?;

  Alignment::from_seqs(seqs)
}

fn parse_header(header: &str) -> Result<(usize, usize), Report> {
  let mut parts = header.split_whitespace();

  let n_species: usize = match parts.next() {
    Some(count) => count
      .parse()
      .wrap_err_with(|| format!("When parsing the species count from the PHYLIP header '{header}'"))?,
    None => return make_error!("PHYLIP header is empty"),
  };

  let n_sites: usize = match parts.next() {
    Some(count) => count
      .parse()
      .wrap_err_with(|| format!("When parsing the site count from the PHYLIP header '{header}'"))?,
    None => return make_error!("PHYLIP header '{header}' is missing the site count"),
  };

  if n_species < 2 {
    return make_error!("A PHYLIP alignment requires at least 2 species, the header declares {n_species}");
  }
  if n_sites < 1 {
    return make_error!("A PHYLIP alignment requires at least 1 site, the header declares {n_sites}");
  }

  Ok((n_species, n_sites))
}
