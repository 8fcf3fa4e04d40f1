pub mod contact;
pub mod jwt;
pub mod response;
