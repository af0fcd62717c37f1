pub mod predict;
pub mod score;
