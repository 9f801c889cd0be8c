use crate::make_error;
use eyre::Report;

/// Bit weights of the four canonical nucleotides within a 4-bit state.
pub const BIT_A: u8 = 1;
pub const BIT_C: u8 = 2;
pub const BIT_G: u8 = 4;
pub const BIT_T: u8 = 8;

/// All four bits set: fully ambiguous state (`N`).
pub const STATE_ANY: u8 = BIT_A | BIT_C | BIT_G | BIT_T;

/// No bits set: gap.
pub const STATE_GAP: u8 = 0;

/// Number of set bits for every 4-bit state.
pub const POPCOUNT4: [u8; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

/// Convert an IUPAC ambiguity character to its 4-bit state.
///
/// Accepts lowercase, `?` as a synonym of `N`, and `X` as a synonym of `N`.
#[inline]
pub fn to_state(letter: char) -> Result<u8, Report> {
  match letter.to_ascii_uppercase() {
    '-' => Ok(0),
    'A' => Ok(1),
    'C' => Ok(2),
    'M' => Ok(3),
    'G' => Ok(4),
    'R' => Ok(5),
    'S' => Ok(6),
    'V' => Ok(7),
    'T' => Ok(8),
    'W' => Ok(9),
    'Y' => Ok(10),
    'H' => Ok(11),
    'K' => Ok(12),
    'D' => Ok(13),
    'B' => Ok(14),
    'N' | 'X' | '?' => Ok(15),
    _ => make_error!("Unknown nucleotide character: '{letter}'"),
  }
}

/// Convert a 4-bit state back to its canonical IUPAC character.
///
/// States above 15 have no meaning; only the low 4 bits are considered.
#[inline]
pub const fn from_state(state: u8) -> char {
  match state & 0x0f {
    0 => '-',
    1 => 'A',
    2 => 'C',
    3 => 'M',
    4 => 'G',
    5 => 'R',
    6 => 'S',
    7 => 'V',
    8 => 'T',
    9 => 'W',
    10 => 'Y',
    11 => 'H',
    12 => 'K',
    13 => 'D',
    14 => 'B',
    _ => 'N',
  }
}

pub fn to_states(str: &str) -> Result<Vec<u8>, Report> {
  str.chars().map(to_state).collect()
}

pub fn from_states(states: &[u8]) -> String {
  states.iter().map(|&state| from_state(state)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[test]
  fn test_iupac_roundtrip_all_states() -> Result<(), Report> {
    for state in 0..=15_u8 {
      assert_eq!(to_state(from_state(state))?, state);
    }
    Ok(())
  }

  #[rstest]
  #[case('a', 1)]
  #[case('t', 8)]
  #[case('?', 15)]
  #[case('x', 15)]
  #[case('n', 15)]
  fn test_iupac_synonyms_and_case(#[case] letter: char, #[case] expected: u8) -> Result<(), Report> {
    assert_eq!(to_state(letter)?, expected);
    Ok(())
  }

  #[test]
  fn test_iupac_rejects_unknown() {
    assert!(to_state('Z').is_err());
    assert!(to_state('.').is_err());
    assert!(to_state(' ').is_err());
  }

  #[test]
  fn test_iupac_popcount_table() {
    for state in 0..=15_u8 {
      assert_eq!(POPCOUNT4[state as usize], state.count_ones() as u8);
    }
  }

  #[test]
  fn test_iupac_ambiguity_codes_are_unions() -> Result<(), Report> {
    assert_eq!(to_state('M')?, BIT_A | BIT_C);
    assert_eq!(to_state('R')?, BIT_A | BIT_G);
    assert_eq!(to_state('S')?, BIT_C | BIT_G);
    assert_eq!(to_state('W')?, BIT_A | BIT_T);
    assert_eq!(to_state('Y')?, BIT_C | BIT_T);
    assert_eq!(to_state('K')?, BIT_G | BIT_T);
    assert_eq!(to_state('V')?, BIT_A | BIT_C | BIT_G);
    assert_eq!(to_state('H')?, BIT_A | BIT_C | BIT_T);
    assert_eq!(to_state('D')?, BIT_A | BIT_G | BIT_T);
    assert_eq!(to_state('B')?, BIT_C | BIT_G | BIT_T);
    assert_eq!(to_state('N')?, STATE_ANY);
    assert_eq!(to_state('-')?, STATE_GAP);
    Ok(())
  }
}
