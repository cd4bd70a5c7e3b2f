//! Analysis of score and activation vectors

/// Equal-width histograms of activations
pub mod histogram;
/// Argmax, top-k and class labels
pub mod ranking;
