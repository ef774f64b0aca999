pub mod comparison;
pub mod selector;
