//! indicatory — long-position sizing, risk and return modelling.
//!
//! Hexagonal layout: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
