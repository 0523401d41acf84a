//! The datagram endpoint: binds a UDP socket and runs the blocking
//! receive-dispatch-reply loop.
//!
//! A single receive/send buffer lives on the stack of the loop and is
//! reused across iterations; there is no buffer pool, since only one
//! datagram is ever in flight at a time.

use std::net::{SocketAddr, UdpSocket};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::ThreadRng;
use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;
use crate::handler::handle_datagram;
use crate::ledger::Ledger;
use crate::metrics::Metrics;
use crate::protocol::MAX_DATAGRAM;

/// Fatal errors that stop the server loop. Socket setup and transport-level
/// send/receive failures are not recoverable: there is no other endpoint to
/// fail over to.
#[derive(Debug, Error)]
pub enum ServerError {
    /// `UdpSocket::bind` failed; there is no other port to fall back to.
    #[error("failed to bind UDP socket on port {port}: {source}")]
    Bind {
        /// The port that failed to bind.
        port: u16,
        #[source]
        source: std::io::Error,
    },
    /// `recv_from` returned an error.
    #[error("failed to receive datagram: {source}")]
    Recv {
        #[source]
        source: std::io::Error,
    },
    /// `send_to` returned an error.
    #[error("failed to send reply datagram to {to}: {source}")]
    Send {
        /// The destination address the reply was addressed to.
        to: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// `send_to` reported fewer bytes written than the reply's length.
    #[error("short write sending reply to {to}: sent {sent} of {expected} bytes")]
    ShortWrite {
        /// The destination address the reply was addressed to.
        to: SocketAddr,
        /// Bytes actually written.
        sent: usize,
        /// Bytes the reply was supposed to be.
        expected: usize,
    },
}

/// Bind a UDP socket on `port` (all interfaces) and serve requests forever.
///
/// Runs entirely on the calling thread: one datagram is received, handled,
/// and replied to before the next `recv_from` call.
pub fn run(
    port: u16,
    mut catalog: Catalog,
    timeout_seconds: u64,
) -> Result<(), ServerError> {
    let socket = UdpSocket::bind(("0.0.0.0", port)).map_err(|source| ServerError::Bind {
        port,
        source,
    })?;
    info!(port, "ticketd listening");

    let mut ledger = Ledger::new();
    let metrics = Metrics::new();
    let mut rng = rand::thread_rng();
    let mut buf = vec![0u8; MAX_DATAGRAM];

    loop {
        serve_one(
            &socket,
            &mut catalog,
            &mut ledger,
            &metrics,
            timeout_seconds,
            &mut rng,
            &mut buf,
        )?;
    }
}

fn serve_one(
    socket: &UdpSocket,
    catalog: &mut Catalog,
    ledger: &mut Ledger,
    metrics: &Metrics,
    timeout_seconds: u64,
    rng: &mut ThreadRng,
    buf: &mut [u8],
) -> Result<(), ServerError> {
    let (len, from): (usize, SocketAddr) = socket
        .recv_from(buf)
        .map_err(|source| ServerError::Recv { source })?;

    let now = now_seconds();
    let reply = handle_datagram(catalog, ledger, metrics, &buf[..len], now, timeout_seconds, rng);

    if let Some(reply) = reply {
        let sent = socket
            .send_to(&reply, from)
            .map_err(|source| ServerError::Send { to: from, source })?;
        if sent != reply.len() {
            return Err(ServerError::ShortWrite {
                to: from,
                sent,
                expected: reply.len(),
            });
        }
    }

    Ok(())
}

fn now_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}
