//! Binds a real UDP socket on an ephemeral port and exercises GET_EVENTS
//! end to end, without going through the server's blocking accept loop.

use std::net::UdpSocket;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use ticketd::catalog::Catalog;
use ticketd::handler::handle_datagram;
use ticketd::ledger::Ledger;
use ticketd::metrics::Metrics;
use ticketd::protocol::{self, MessageType, Response};

#[test]
fn test_get_events_round_trips_over_a_real_socket() {
    let server_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    server_socket
        .set_read_timeout(Some(Duration::from_secs(1)))
        .unwrap();
    let server_addr = server_socket.local_addr().unwrap();

    let client_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    client_socket
        .set_read_timeout(Some(Duration::from_secs(1)))
        .unwrap();
    client_socket.connect(server_addr).unwrap();
    client_socket.send(&[1]).unwrap();

    let mut catalog = Catalog::from_seed(vec![(b"Concert".to_vec(), 100)]);
    let mut ledger = Ledger::new();
    let metrics = Metrics::new();
    let mut rng = StdRng::seed_from_u64(42);

    let mut buf = vec![0u8; protocol::MAX_DATAGRAM];
    let (len, from) = server_socket.recv_from(&mut buf).unwrap();
    let reply = handle_datagram(&mut catalog, &mut ledger, &metrics, &buf[..len], 0, 5, &mut rng)
        .expect("GET_EVENTS always produces a reply");
    server_socket.send_to(&reply, from).unwrap();

    let mut client_buf = vec![0u8; protocol::MAX_DATAGRAM];
    let received = client_socket.recv(&mut client_buf).unwrap();
    assert_eq!(client_buf[0], MessageType::Events.as_u8());

    let decoded = protocol::decode_response(&client_buf[..received]).unwrap();
    let Response::Events(records) = decoded else {
        panic!("expected Events");
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, b"Concert");
}
