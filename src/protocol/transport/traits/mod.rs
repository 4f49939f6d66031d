//! Abstraction traits at the edges of the transport layer: where bytes come
//! from, how time passes, and where finished messages go.
pub mod byte_source;
pub mod gateway_timer;
pub mod message_sink;
