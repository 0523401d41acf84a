//! Wire protocol: message types, the fixed-layout codec, and decode errors.

mod codec;
mod cursor;
mod error;
mod message;
mod types;

pub use codec::{decode_request, decode_response, encode_response};
pub use error::WireError;
pub use message::{EventRecord, Request, Response};
pub use types::{
    BAD_REQUEST_LEN, COOKIE_LEN, GET_EVENTS_LEN, GET_RESERVATION_LEN, GET_TICKETS_LEN,
    MAX_DATAGRAM, MessageType, RESERVATION_LEN, TICKET_LEN,
};
