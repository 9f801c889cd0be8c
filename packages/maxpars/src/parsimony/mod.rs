pub mod fitch;
