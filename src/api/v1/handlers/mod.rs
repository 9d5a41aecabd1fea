pub mod account;
pub mod greeting;
pub mod health;
