pub mod bootstrap;

pub use bootstrap::{build_state, run};
