pub mod alert;
pub mod config;
pub mod contacts;
pub mod history;
pub mod reset;
