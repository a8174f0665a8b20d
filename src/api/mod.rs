//! REST API handlers

pub mod gate;
pub mod health;
