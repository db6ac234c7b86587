// Domain layer: measurement model and ports. Adapters live under src/adapters.

pub mod features;
pub mod model;
pub mod ports;
