// src/lib.rs

//! bookshelf library
//!
//! Client, controller and backend for a REST book collection.

pub mod controller;
pub mod error;
pub mod form;
pub mod models;
pub mod render;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod shell;
pub mod storage;
pub mod utils;
