// Domain layer: experiment models and the ports the runner drives.

pub mod model;
pub mod ports;
