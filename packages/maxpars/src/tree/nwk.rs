use crate::make_error;
use crate::tree::tree::Tree;
use crate::utils::float_fmt::float_to_digits;
use eyre::Report;
use smart_default::SmartDefault;
use std::io::Write;

#[derive(Clone, SmartDefault)]
pub struct WriteNwkOptions {
  /// Format branch lengths keeping this many significant digits
  pub weight_significant_digits: Option<u8>,

  /// Format branch lengths keeping this many decimal digits
  pub weight_decimal_digits: Option<i8>,
}

pub fn write_nwk_str(tree: &Tree, options: &WriteNwkOptions) -> Result<String, Report> {
  let mut buf = Vec::new();
  write_nwk_writer(&mut buf, tree, options)?;
  Ok(String::from_utf8(buf)?)
}

pub fn write_nwk_writer(writer: &mut impl Write, tree: &Tree, options: &WriteNwkOptions) -> Result<(), Report> {
  let root = match tree.root() {
    Some(root) => root,
    None => return make_error!("When converting tree to Newick format: the tree is empty"),
  };

  node_to_nwk_writer(writer, tree, root, options)?;
  write!(writer, ";")?;
  Ok(())
}

fn node_to_nwk_writer(
  writer: &mut impl Write,
  tree: &Tree,
  index: usize,
  options: &WriteNwkOptions,
) -> Result<(), Report> {
  let node = tree.node(index);

  if let Some((left, right)) = node.children_pair() {
    write!(writer, "(")?;
    node_to_nwk_writer(writer, tree, left, options)?;
    write!(writer, ",")?;
    node_to_nwk_writer(writer, tree, right, options)?;
    write!(writer, ")")?;
  }

  if let Some(seq) = &node.seq {
    if let Some(name) = seq.read().name() {
      write!(writer, "{name}")?;
    }
  }

  if let Some(branch_length) = node.branch_length {
    let formatted = float_to_digits(
      branch_length,
      options.weight_significant_digits,
      options.weight_decimal_digits,
    );
    write!(writer, ":{formatted}")?;
  }

  Ok(())
}
