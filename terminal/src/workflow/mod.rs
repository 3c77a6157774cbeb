pub mod config;
pub mod pricebook_file;
pub mod register;
pub mod runner;
