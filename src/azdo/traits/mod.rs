pub mod variable_group;

pub use variable_group::VariableGroupOperations;
