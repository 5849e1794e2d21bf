//! Parley - Ephemeral Two-Person Translated Chat
//!
//! This crate pairs two participants in a short-lived chat room and relays
//! text messages between them, translating each message into the recipient's
//! declared language before delivery.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
