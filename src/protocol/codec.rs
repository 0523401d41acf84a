//! Encode/decode of the fixed-layout wire messages.
//!
//! # Format
//!
//! One leading type byte, then big-endian fixed-width fields, with
//! `EVENTS` and `TICKETS` the only variable-length shapes.

use super::cursor::{Reader, Writer, check_exact_len};
use super::error::WireError;
use super::message::{EventRecord, Request, Response};
use super::types::{
    BAD_REQUEST_LEN, COOKIE_LEN, GET_EVENTS_LEN, GET_RESERVATION_LEN, GET_TICKETS_LEN,
    MAX_DATAGRAM, MessageType, RESERVATION_LEN, TICKET_LEN,
};

/// Decode a client request from a received datagram.
///
/// Returns [`WireError`] when the type byte is unrecognized or the
/// datagram's length does not match that type's exact required length.
/// Both cases are the caller's cue to drop the datagram silently rather
/// than reply with `BAD_REQUEST`.
pub fn decode_request(buf: &[u8]) -> Result<Request, WireError> {
    let type_byte = *buf
        .first()
        .ok_or(WireError::UnknownType { type_byte: 0 })?;

    match MessageType::from_u8(type_byte) {
        Some(MessageType::GetEvents) => {
            check_exact_len(buf, type_byte, GET_EVENTS_LEN)?;
            Ok(Request::GetEvents)
        }
        Some(MessageType::GetReservation) => {
            check_exact_len(buf, type_byte, GET_RESERVATION_LEN)?;
            let mut r = Reader::new(&buf[1..]);
            let event_id = r.read_u32();
            let ticket_count = r.read_u16();
            Ok(Request::GetReservation {
                event_id,
                ticket_count,
            })
        }
        Some(MessageType::GetTickets) => {
            check_exact_len(buf, type_byte, GET_TICKETS_LEN)?;
            let mut r = Reader::new(&buf[1..]);
            let reservation_id = r.read_u32();
            let cookie: [u8; COOKIE_LEN] = r.read_array();
            Ok(Request::GetTickets {
                reservation_id,
                cookie,
            })
        }
        _ => Err(WireError::UnknownType { type_byte }),
    }
}

/// Encode a server reply.
///
/// `EVENTS` replies are bounded to [`MAX_DATAGRAM`] bytes: catalogue
/// entries are appended in the order given until the next entry would
/// overflow the limit, and the rest are silently omitted.
#[must_use]
pub fn encode_response(resp: &Response) -> Vec<u8> {
    match resp {
        Response::Events(records) => encode_events(records),
        Response::Reservation {
            reservation_id,
            event_id,
            ticket_count,
            cookie,
            expiration_time,
        } => {
            let mut w = Writer::with_capacity(RESERVATION_LEN);
            w.write_u8(MessageType::Reservation.as_u8());
            w.write_u32(*reservation_id);
            w.write_u32(*event_id);
            w.write_u16(*ticket_count);
            w.write_bytes(cookie);
            w.write_u64(*expiration_time);
            w.into_bytes()
        }
        Response::Tickets {
            reservation_id,
            tickets,
        } => {
            let mut w = Writer::with_capacity(7 + TICKET_LEN * tickets.len());
            w.write_u8(MessageType::Tickets.as_u8());
            w.write_u32(*reservation_id);
            w.write_u16(tickets.len() as u16);
            for ticket in tickets {
                w.write_bytes(ticket);
            }
            w.into_bytes()
        }
        Response::BadRequest { id } => {
            let mut w = Writer::with_capacity(BAD_REQUEST_LEN);
            w.write_u8(MessageType::BadRequest.as_u8());
            w.write_u32(*id);
            w.into_bytes()
        }
    }
}

fn encode_events(records: &[EventRecord]) -> Vec<u8> {
    let mut w = Writer::with_capacity(MAX_DATAGRAM.min(1 + records.len() * 16));
    w.write_u8(MessageType::Events.as_u8());
    for record in records {
        if w.len() + record.encoded_len() > MAX_DATAGRAM {
            break;
        }
        w.write_u32(record.event_id);
        w.write_u16(record.tickets_available);
        w.write_u8(record.description.len() as u8);
        w.write_bytes(&record.description);
    }
    w.into_bytes()
}

/// Decode a server reply. Only used by tests and any future client-side
/// tooling; the server itself never decodes its own responses.
pub fn decode_response(buf: &[u8]) -> Result<Response, WireError> {
    let type_byte = *buf
        .first()
        .ok_or(WireError::UnknownType { type_byte: 0 })?;

    match MessageType::from_u8(type_byte) {
        Some(MessageType::Events) => {
            let mut r = Reader::new(&buf[1..]);
            let mut records = Vec::new();
            while r.remaining() > 0 {
                let event_id = r.read_u32();
                let tickets_available = r.read_u16();
                let description_length = r.read_u8() as usize;
                let description = r.read_vec(description_length);
                records.push(EventRecord {
                    event_id,
                    tickets_available,
                    description,
                });
            }
            Ok(Response::Events(records))
        }
        Some(MessageType::Reservation) => {
            check_exact_len(buf, type_byte, RESERVATION_LEN)?;
            let mut r = Reader::new(&buf[1..]);
            let reservation_id = r.read_u32();
            let event_id = r.read_u32();
            let ticket_count = r.read_u16();
            let cookie: [u8; COOKIE_LEN] = r.read_array();
            let expiration_time = r.read_u64();
            Ok(Response::Reservation {
                reservation_id,
                event_id,
                ticket_count,
                cookie,
                expiration_time,
            })
        }
        Some(MessageType::Tickets) => {
            let mut r = Reader::new(&buf[1..]);
            let reservation_id = r.read_u32();
            let ticket_count = r.read_u16() as usize;
            let mut tickets = Vec::with_capacity(ticket_count);
            for _ in 0..ticket_count {
                tickets.push(r.read_array());
            }
            Ok(Response::Tickets {
                reservation_id,
                tickets,
            })
        }
        Some(MessageType::BadRequest) => {
            check_exact_len(buf, type_byte, BAD_REQUEST_LEN)?;
            let mut r = Reader::new(&buf[1..]);
            let id = r.read_u32();
            Ok(Response::BadRequest { id })
        }
        _ => Err(WireError::UnknownType { type_byte }),
    }
}
