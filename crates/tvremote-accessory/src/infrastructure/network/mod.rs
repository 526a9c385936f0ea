//! Network infrastructure: the TCP implementation of `KeyTransport`.
//!
//! - `tcp_sender` opens one short-lived TCP connection per key event.

pub mod tcp_sender;

pub use tcp_sender::TcpKeyTransport;
