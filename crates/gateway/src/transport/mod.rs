//! Transport bindings. Both serve the same [`crate::handler::GatewayHandler`].

pub mod sse;
pub mod stdio;
