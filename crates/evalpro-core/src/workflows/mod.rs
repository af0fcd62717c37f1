//! # Workflows Module
//!
//! Ready-made predictors and the entry points that run them over a batch.
//!
//! ## Overview
//!
//! The engine's [`BatchPredictionDriver`](crate::engine::driver::BatchPredictionDriver)
//! works with any [`Predictor`](crate::engine::driver::Predictor). This module supplies
//! the one most users need: [`predict::CommandPredictor`], which runs an external
//! structure-prediction program once per sample, and [`predict::run`], which wires a
//! predictor, a driver configuration and a progress reporter together.

pub mod predict;
