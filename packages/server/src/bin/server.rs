//! Room-based broadcast chat server.
//!
//! Clients connect over WebSocket, create or join rooms and exchange
//! messages that are fanned out to every member of the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-server
//! cargo run --bin hiroma-server -- --host 0.0.0.0 --port 3000
//! ```

use clap::Parser;
use hiroma_server::{config::ServerConfig, ui::Server};
use hiroma_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroma-server")]
#[command(about = "Room-based broadcast chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let server = Server::new(ServerConfig::default());
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
