// Domain layer: cart models and ports (interfaces) for the oracle and clipboard.

pub mod model;
pub mod ports;
