/// Admin capability gate
pub mod admin;
/// Command definitions and handlers
pub mod commands;
/// Update routing
pub mod handlers;
