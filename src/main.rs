//! Binary entry point: parse arguments, load the seed file, run the server.

use ticketd::{cli, seed, server};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match cli::parse_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ticketd: {err}");
            std::process::exit(1);
        }
    };

    let events = match seed::load_events(&config.seed_path) {
        Ok(events) => events,
        Err(err) => {
            eprintln!("ticketd: {err}");
            std::process::exit(1);
        }
    };
    let catalog = ticketd::catalog::Catalog::from_seed(events);

    if let Err(err) = server::run(config.port, catalog, config.timeout_seconds) {
        eprintln!("ticketd: {err}");
        std::process::exit(1);
    }
}
