//! Room renovation previews: restyle a room photo with a generative image model,
//! enumerate the new furniture with a vision model, and keep the result around for
//! installment-purchase clients.

pub mod config;
pub mod designs;
pub mod error;
pub mod gateway;
pub mod telemetry;
