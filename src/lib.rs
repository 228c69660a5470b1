#[macro_use]
extern crate tracing;

pub mod dock;
pub mod shell;
pub mod timers;
pub mod utils;

#[cfg(test)]
mod tests;
