pub mod assertion_model;
pub mod evaluator;
