// handlers/mod.rs - HTTP handlers split by security tier
//
// public    no token required (/, /health, signup, login)
// protected JWT required (/api/*)

pub mod protected;
pub mod public;
pub mod utils;
