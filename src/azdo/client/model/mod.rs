pub mod variable_group;
