//! Hex-grid terrain: cell graph, chunked triangulation and a Bevy binding.
//!
//! A [`hex_grid::HexGrid`] holds every cell of the map. Edits mark the chunks
//! they touch dirty; [`triangulation::Triangulator`] turns each dirty chunk
//! into a terrain mesh with terraced slopes, cliffs and carved river beds,
//! plus a separate water mesh. [`map::MapPlugin`] wires this into a Bevy app.

pub mod coordinates;
pub mod hex_grid;
pub mod map;
pub mod math;
pub mod mesh_buffer;
pub mod metrics;
pub mod noise_source;
pub mod triangulation;
pub mod visuals;
