pub mod suggestion;
pub mod visitor;
