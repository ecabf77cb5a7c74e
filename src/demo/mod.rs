pub mod sample;
pub mod suite;
