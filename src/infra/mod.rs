pub mod archive;
pub mod file_system;
pub mod input;
pub mod logger;
pub mod output;
