// Domain layer: value types and the rate lookup port. No I/O here.

pub mod model;
pub mod ports;
