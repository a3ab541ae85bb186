//! HTTP request handlers

pub mod complaints;
pub mod health;
pub mod simulations;
pub mod views;
