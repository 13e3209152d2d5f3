pub mod catalog;
pub mod commands;
pub mod engine;
pub mod http;
pub mod issue;
pub mod package;
pub mod runtime;
pub mod version;
