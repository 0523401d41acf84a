//! Decoded request/response shapes.
//!
//! These mirror the wire layouts one-to-one: one variant per message type,
//! holding exactly the fields that type carries on the wire.

use super::types::{COOKIE_LEN, TICKET_LEN};

/// A single catalogue entry as carried inside an `EVENTS` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// The event's id.
    pub event_id: u32,
    /// Seats currently available.
    pub tickets_available: u16,
    /// Opaque description bytes (1-80 bytes, not necessarily UTF-8).
    pub description: Vec<u8>,
}

impl EventRecord {
    /// Size this record occupies inside an `EVENTS` reply: the fixed
    /// `event_id` + `tickets_available` + `description_length` fields plus
    /// the description bytes themselves.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        4 + 2 + 1 + self.description.len()
    }
}

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `GET_EVENTS`: list the catalogue.
    GetEvents,
    /// `GET_RESERVATION`: reserve tickets for an event.
    GetReservation {
        /// Target event.
        event_id: u32,
        /// Number of tickets requested.
        ticket_count: u16,
    },
    /// `GET_TICKETS`: redeem a reservation's tickets.
    GetTickets {
        /// Reservation to redeem.
        reservation_id: u32,
        /// The cookie presented for redemption.
        cookie: [u8; COOKIE_LEN],
    },
}

/// A reply the server sends back to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `EVENTS`: catalogue listing, in ascending event-id order.
    Events(Vec<EventRecord>),
    /// `RESERVATION`: a newly created reservation.
    Reservation {
        /// Assigned reservation id.
        reservation_id: u32,
        /// Echoed event id.
        event_id: u32,
        /// Echoed ticket count.
        ticket_count: u16,
        /// The reservation's secret cookie.
        cookie: [u8; COOKIE_LEN],
        /// Absolute expiry, in seconds.
        expiration_time: u64,
    },
    /// `TICKETS`: generated ticket codes for a redeemed reservation.
    Tickets {
        /// The redeemed reservation's id.
        reservation_id: u32,
        /// Ticket codes, in generation order.
        tickets: Vec<[u8; TICKET_LEN]>,
    },
    /// `BAD_REQUEST`: a semantic rejection, echoing the request's id field.
    BadRequest {
        /// The event-id (for a rejected `GET_RESERVATION`) or
        /// reservation-id (for a rejected `GET_TICKETS`).
        id: u32,
    },
}
