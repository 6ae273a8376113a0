//! Color type and distance metric
//!
//! Walk colors are plain 8-bit triples. Similarity is measured as squared
//! Euclidean distance over the three channels; the square root is never
//! taken because it does not change which candidate is nearest.

mod rgb;

pub use rgb::Color;
