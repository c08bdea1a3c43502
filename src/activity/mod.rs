// Activity aggregation and behavioral vector construction.

pub mod aggregate;
pub mod vectors;
