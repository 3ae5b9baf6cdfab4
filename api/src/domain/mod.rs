pub mod addresses;
pub mod catalog;
pub mod customers;
pub mod settings;
pub mod users;
