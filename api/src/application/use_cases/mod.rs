pub mod addresses;
pub mod auth;
pub mod catalog;
pub mod customers;
pub mod settings;
