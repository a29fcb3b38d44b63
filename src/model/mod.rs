pub mod concepto;

pub use concepto::*;
