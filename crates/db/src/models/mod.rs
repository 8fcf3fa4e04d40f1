pub mod academy;
pub mod account;
pub mod billing;
pub mod client;
pub mod decor;
pub mod finance;
pub mod inventory;
pub mod line_item;
pub mod personnel;
pub mod purchasing;
pub mod settings;
pub mod shop;
pub mod studio;
pub mod wifi;
