pub mod api;
pub mod calendar;
pub mod chat;
pub mod cli;
pub mod core;
pub mod credentials;
pub mod google;
pub mod mcp;
pub mod openai;
