pub mod alphabet;
pub mod cli;
pub mod clustering;
pub mod commands;
pub mod distance;
pub mod io;
pub mod parsimony;
pub mod search;
pub mod seq;
pub mod tree;
pub mod utils;
