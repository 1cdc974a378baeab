//! Gateway: HTTP host for the webhook dispatcher and the score endpoint.
//!
//! Each request is independent; shared state is immutable and `Arc`-wrapped.

mod server;

pub use server::{build_router, run_gateway, GatewayState};
