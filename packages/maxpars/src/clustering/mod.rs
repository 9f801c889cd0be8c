pub mod upgma;
