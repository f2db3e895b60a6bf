pub mod account;
pub mod address;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod pincode;
