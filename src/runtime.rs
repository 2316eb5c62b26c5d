//! Runtime for executing conversations

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
#[cfg(test)]
pub use executor::request_reply;
