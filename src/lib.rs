//! Bus Schedules Compiler.
//!
//! Turns the plain-text definition of a bus line (header, two directions of
//! cities, stations and departure grids) into the normalized `;`-separated
//! format consumed by the resource generator.

pub mod blocks;
pub mod cities;
pub mod compiler;
pub mod config;
pub mod days;
pub mod direction;
pub mod error;
pub mod features;
pub mod utils;
