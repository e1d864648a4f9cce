pub mod command_parsing_service;

pub use command_parsing_service::parse_command;
