//! Colorsort
//!
//! Fills a canvas with every color of an evenly sampled RGB cube, walking
//! from neighbor to neighbor. This library exposes modules for integration
//! testing; the walk itself lives in the `color-walk` crate.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
