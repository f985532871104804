pub mod entities;
pub mod ports;
