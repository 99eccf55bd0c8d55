pub mod cli;
pub mod config;
pub mod model;
pub mod scanner;
pub mod util;
