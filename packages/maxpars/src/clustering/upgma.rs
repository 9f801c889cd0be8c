use crate::distance::Distance;
use crate::make_error;
use crate::seq::alignment::Alignment;
use crate::tree::tree::Tree;
use eyre::Report;
use ndarray::Array2;
use std::sync::Arc;

/// Build a rooted tree by agglomerative clustering with arithmetic-mean
/// distance updates.
///
/// Each round merges the closest pair of clusters (ties broken by lowest
/// first index, then lowest second), recording half their distance as the
/// merge height. Heights live temporarily in the branch-length fields and
/// are converted to true edge lengths at the end, so tips end up at height
/// zero and every branch length is non-negative.
pub fn upgma(aln: &Alignment, distance: &dyn Distance) -> Result<Tree, Report> {
  let n = aln.len();
  if n == 0 {
    return make_error!("Cannot build a UPGMA tree from an empty alignment");
  }

  let mut clusters = aln
    .seqs()
    .iter()
    .map(|seq| {
      let mut tree = Tree::with_capacity(1);
      tree.add(0, Arc::clone(seq))?;
      Ok(tree)
    })
    .collect::<Result<Vec<Tree>, Report>>()?;

  // Slot n of the matrix and size array is scratch for the freshly merged
  // cluster's distances.
  let mut sizes = vec![1_usize; n + 1];
  let mut dist = Array2::<f64>::zeros((n + 1, n + 1));
  for i in 0..n {
    for j in (i + 1)..n {
      let d = distance.distance(&aln.seq(i).read(), &aln.seq(j).read())?;
      dist[[i, j]] = d;
      dist[[j, i]] = d;
    }
  }

  let mut active = n;
  while active > 1 {
    let (mut best_i, mut best_j, mut best) = (0, 1, f64::INFINITY);
    for i in 0..active {
      for j in (i + 1)..active {
        if dist[[i, j]] < best {
          best = dist[[i, j]];
          best_i = i;
          best_j = j;
        }
      }
    }

    let height = best / 2.0;
    set_root_height(&mut clusters[best_i], height);
    set_root_height(&mut clusters[best_j], height);
    let merged = Tree::join(&clusters[best_i], &clusters[best_j])?;

    let (weight_i, weight_j) = (sizes[best_i] as f64, sizes[best_j] as f64);
    for m in 0..active {
      if m == best_i || m == best_j {
        continue;
      }
      dist[[n, m]] = (weight_i * dist[[best_i, m]] + weight_j * dist[[best_j, m]]) / (weight_i + weight_j);
    }

    // The merged cluster takes slot i; the last active cluster backfills
    // slot j.
    clusters[best_i] = merged;
    sizes[best_i] += sizes[best_j];
    for m in 0..active {
      if m == best_i || m == best_j {
        continue;
      }
      dist[[best_i, m]] = dist[[n, m]];
      dist[[m, best_i]] = dist[[n, m]];
    }

    let last = active - 1;
    if best_j != last {
      clusters.swap(best_j, last);
      sizes.swap(best_j, last);
      for m in 0..=n {
        dist.swap([best_j, m], [last, m]);
      }
      for m in 0..=n {
        dist.swap([m, best_j], [m, last]);
      }
    }
    active -= 1;
  }

  let mut tree = clusters.swap_remove(0);
  heights_to_branch_lengths(&mut tree);
  Ok(tree)
}

fn set_root_height(tree: &mut Tree, height: f64) {
  if let Some(root) = tree.root() {
    tree.node_mut(root).branch_length = Some(height);
  }
}

/// Convert stored merge heights into edge lengths, top down.
///
/// A node's own height is read from either child's still-stored value (both
/// children of a merge carry it) before the children are themselves
/// converted; tips sit at height zero and the root keeps no edge.
fn heights_to_branch_lengths(tree: &mut Tree) {
  let root = match tree.root() {
    Some(root) => root,
    None => return,
  };

  let mut stack = vec![root];
  while let Some(index) = stack.pop() {
    let own_height = match tree.node(index).children_pair() {
      Some((left, right)) => {
        stack.push(left);
        stack.push(right);
        tree.node(left).branch_length_or_zero()
      }
      None => 0.0,
    };
    if let Some(stored) = tree.node(index).branch_length {
      tree.node_mut(index).branch_length = Some(stored - own_height);
    }
  }
}
