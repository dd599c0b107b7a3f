//! An offline physically based renderer: Monte Carlo light transport with
//! multiple importance sampling over BVH-accelerated scenes.

#[macro_use]
extern crate log;

pub mod accelerators;
pub mod cameras;
pub mod core;
pub mod filters;
pub mod integrators;
pub mod lights;
pub mod loader;
pub mod materials;
pub mod shapes;
pub mod textures;
