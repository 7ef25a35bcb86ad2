//! Domain models mirrored from the stock gateway

mod branch;
mod movement;
mod stock;

pub use branch::*;
pub use movement::*;
pub use stock::*;
