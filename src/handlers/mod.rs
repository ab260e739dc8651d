pub mod health_handlers;
pub mod suggestion_handlers;
pub mod visitor_handlers;
