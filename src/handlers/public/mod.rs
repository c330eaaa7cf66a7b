// handlers/public/mod.rs - endpoints reachable without a token
//
// Service info, health, signup and login. Everything else sits behind the
// JWT layer in `protected`.

pub mod system;
pub mod users;
