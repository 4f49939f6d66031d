//! Asynchronous timer abstraction used for reconnect backoff and read
//! timeouts.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait GatewayTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms(&mut self, millis: u64) -> impl core::future::Future<Output = ()> + '_;
}
