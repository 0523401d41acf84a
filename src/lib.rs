//! ticketd - a UDP ticket reservation server.
//!
//! A single-endpoint, single-threaded server that answers a fixed-layout
//! binary protocol over UDP: list events, reserve tickets against one, and
//! redeem a reservation's cookie for ticket codes. See the wire layout in
//! [`protocol`] and the request lifecycle in [`handler`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ticketd::cli::parse_args;
//! use ticketd::seed::load_events;
//! use ticketd::catalog::Catalog;
//! use ticketd::server;
//!
//! let config = parse_args(std::env::args().skip(1))?;
//! let events = load_events(&config.seed_path)?;
//! let catalog = Catalog::from_seed(events);
//! server::run(config.port, catalog, config.timeout_seconds)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod cli;
pub mod handler;
pub mod ledger;
pub mod metrics;
pub mod protocol;
pub mod seed;
pub mod server;
