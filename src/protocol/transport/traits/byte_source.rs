//! Minimal abstraction for the gateway connection. Allows the library to
//! plug into any runtime or driver (tokio sockets, serial ports, replayed
//! captures, embedded UARTs).
use core::future::Future;

/// A stream of raw gateway bytes.
pub trait ByteSource {
    type Error: core::fmt::Debug;

    /// Read the next chunk into `buf`, returning how many bytes were written.
    /// `Ok(0)` means the peer closed the stream.
    fn read<'a>(
        &'a mut self,
        buf: &'a mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + 'a;
}

/// Opens fresh [`ByteSource`]s, once per (re)connection attempt.
pub trait Connector {
    type Source: ByteSource<Error = Self::Error>;
    type Error: core::fmt::Debug;

    /// Human-readable peer description for log lines (`host:port`, device path).
    fn describe(&self) -> String;

    fn connect(&mut self) -> impl Future<Output = Result<Self::Source, Self::Error>> + '_;
}
