pub mod bootstrap;

pub use bootstrap::{seed, BootstrapError};
