//! Bullet Hell: dodge bullets that spawn at the arena edges, aim at you, then fire.
//!
//! The library holds the simulation only. Rendering, audio and terminal input
//! live in the binary and talk to the simulation through [`session::Session`].

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod session;
pub mod timing;
