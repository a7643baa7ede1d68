//! Entry points: a single sync cycle and the polling loop around it

pub mod daemon;
pub mod sync;
