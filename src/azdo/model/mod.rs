pub mod variable_group;

pub use variable_group::{select_pair, Variable, VariableGroup};
