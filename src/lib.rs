// lib.rs - Library root for confcheck

pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod discovery;
pub mod document;
pub mod error;
pub mod keymap;
pub mod language;
pub mod merge;
pub mod mode;
pub mod settings;
pub mod theme;
pub mod validate;
