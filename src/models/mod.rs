pub mod counter;
pub mod suggestion;
pub mod visitor;
