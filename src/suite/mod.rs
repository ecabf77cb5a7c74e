pub mod error;
pub mod runner;
pub mod suite_model;
