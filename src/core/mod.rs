//! Core lattice primitives
//!
//! - utils/   - console logging macros (must be first for macro export!)
//! - d2q9     - lattice vectors, weights, equilibrium
//! - lattice  - double-buffered distribution storage

#[macro_use]
pub mod utils;
pub mod d2q9;
pub mod lattice;
