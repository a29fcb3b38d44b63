pub mod conceptos;

pub use conceptos::ConceptoError;
