//! Main module for tagtext library functionality

pub mod ast;
pub mod building;
pub mod config;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod lexing;
pub mod locator;
pub mod parsing;
pub mod testing;
pub mod token;
