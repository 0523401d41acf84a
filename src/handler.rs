//! Per-datagram request handling: sweep, shape-check, dispatch, encode.
//!
//! Expressed as one pure function so it can be tested without a real
//! socket (see `tests/scenarios.rs`).

use rand::Rng;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::ledger::Ledger;
use crate::metrics::Metrics;
use crate::protocol::{self, EventRecord, Request, Response, WireError};

/// Handle one received datagram, returning the bytes to send back to the
/// source address, or `None` if the datagram should be silently dropped.
///
/// `now` is the arrival time (absolute seconds) and must be used for both
/// the expiry sweep and any reservation created or redeemed by this
/// request.
pub fn handle_datagram<R: Rng>(
    catalog: &mut Catalog,
    ledger: &mut Ledger,
    metrics: &Metrics,
    datagram: &[u8],
    now: u64,
    timeout_seconds: u64,
    rng: &mut R,
) -> Option<Vec<u8>> {
    let swept = ledger.sweep(catalog, now);
    metrics.record_reservations_swept(swept);
    if swept > 0 {
        trace!(swept, "expiry sweep reclaimed reservations");
    }

    let request = match protocol::decode_request(datagram) {
        Ok(request) => request,
        Err(WireError::UnknownType { type_byte }) => {
            debug!(type_byte, "dropping datagram with unrecognized type");
            metrics.record_malformed_dropped();
            return None;
        }
        Err(WireError::WrongLength {
            type_byte,
            expected,
            got,
        }) => {
            debug!(type_byte, expected, got, "dropping datagram with wrong length for its type");
            metrics.record_malformed_dropped();
            return None;
        }
    };

    let response = match request {
        Request::GetEvents => {
            trace!("GET_EVENTS");
            let records = catalog
                .iter_in_id_order()
                .map(|(event_id, event)| EventRecord {
                    event_id,
                    tickets_available: event.tickets_available,
                    description: event.description.clone(),
                })
                .collect();
            metrics.record_served();
            Response::Events(records)
        }
        Request::GetReservation {
            event_id,
            ticket_count,
        } => match ledger.create(catalog, event_id, ticket_count, now, timeout_seconds, rng) {
            Ok((reservation_id, reservation)) => {
                trace!(reservation_id, event_id, ticket_count, "reservation created");
                metrics.record_served();
                Response::Reservation {
                    reservation_id,
                    event_id: reservation.event_id,
                    ticket_count: reservation.ticket_count,
                    cookie: reservation.cookie,
                    expiration_time: reservation.expiration_time,
                }
            }
            Err(reason) => {
                debug!(event_id, ticket_count, %reason, "reservation rejected");
                metrics.record_bad_request();
                Response::BadRequest { id: event_id }
            }
        },
        Request::GetTickets {
            reservation_id,
            cookie,
        } => match ledger.redeem(reservation_id, &cookie, now) {
            Ok(reservation) => {
                trace!(reservation_id, "tickets redeemed");
                metrics.record_served();
                Response::Tickets {
                    reservation_id,
                    tickets: reservation.tickets.clone(),
                }
            }
            Err(reason) => {
                debug!(reservation_id, %reason, "redemption rejected");
                metrics.record_bad_request();
                Response::BadRequest { id: reservation_id }
            }
        },
    };

    Some(protocol::encode_response(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{MessageType, decode_response};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (Catalog, Ledger, Metrics, StdRng) {
        (
            Catalog::from_seed(vec![(b"Concert".to_vec(), 100), (b"Play".to_vec(), 2)]),
            Ledger::new(),
            Metrics::new(),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_get_events_lists_catalogue() {
        let (mut cat, mut ledger, metrics, mut rng) = setup();
        let reply = handle_datagram(&mut cat, &mut ledger, &metrics, &[1], 0, 5, &mut rng).unwrap();
        assert_eq!(reply[0], MessageType::Events.as_u8());
        let decoded = decode_response(&reply).unwrap();
        if let Response::Events(records) = decoded {
            assert_eq!(records.len(), 2);
        } else {
            panic!("expected Events");
        }
    }

    #[test]
    fn test_good_reservation_then_overbook_is_rejected() {
        let (mut cat, mut ledger, metrics, mut rng) = setup();
        let req = [3, 0, 0, 0, 1, 0, 2];
        let reply =
            handle_datagram(&mut cat, &mut ledger, &metrics, &req, 0, 5, &mut rng).unwrap();
        assert_eq!(reply.len(), protocol::RESERVATION_LEN);

        let overbook = [3, 0, 0, 0, 1, 0, 1];
        let reply =
            handle_datagram(&mut cat, &mut ledger, &metrics, &overbook, 0, 5, &mut rng).unwrap();
        assert_eq!(reply[0], MessageType::BadRequest.as_u8());
        let decoded = decode_response(&reply).unwrap();
        assert_eq!(decoded, Response::BadRequest { id: 1 });
    }

    #[test]
    fn test_malformed_datagram_produces_no_reply() {
        let (mut cat, mut ledger, metrics, mut rng) = setup();
        let reply = handle_datagram(&mut cat, &mut ledger, &metrics, &[3, 0], 0, 5, &mut rng);
        assert!(reply.is_none());
        assert_eq!(metrics.snapshot().malformed_dropped, 1);
    }

    #[test]
    fn test_unknown_type_byte_produces_no_reply() {
        let (mut cat, mut ledger, metrics, mut rng) = setup();
        let reply = handle_datagram(&mut cat, &mut ledger, &metrics, &[9], 0, 5, &mut rng);
        assert!(reply.is_none());
    }

    #[test]
    fn test_expiry_reclaims_seats_before_next_dispatch() {
        let (mut cat, mut ledger, metrics, mut rng) = setup();
        let req = [3, 0, 0, 0, 1, 0, 2];
        handle_datagram(&mut cat, &mut ledger, &metrics, &req, 0, 5, &mut rng).unwrap();
        assert_eq!(cat.get(1).unwrap().tickets_available, 0);

        // A request arriving after expiry triggers the sweep first.
        let reply =
            handle_datagram(&mut cat, &mut ledger, &metrics, &[1], 6, 5, &mut rng).unwrap();
        let decoded = decode_response(&reply).unwrap();
        if let Response::Events(records) = decoded {
            let play = records.iter().find(|r| r.event_id == 1).unwrap();
            assert_eq!(play.tickets_available, 2);
        } else {
            panic!("expected Events");
        }
        assert_eq!(metrics.snapshot().reservations_swept, 1);
    }
}
