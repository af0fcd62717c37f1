pub mod fasta;
pub mod pairs;
pub mod parser;
pub mod progress;
