//! Hosting Server Binary
//!
//! Runs the HTTP server for live Go Fish games.
//! Supports WebSocket subscriptions for snapshot broadcasts.

use clap::Parser;
use gofish::hosting::Lobby;
use gofish::hosting::Server;
use gofish::repository::InMemoryGameRepository;
use gofish::templates::DeckTemplateSource;
use gofish::templates::EnvVarTemplateSource;
use gofish::templates::FixedTemplateSource;
use std::sync::Arc;

#[derive(Parser)]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: String,
    /// Environment variable holding deck templates as JSON;
    /// the demo deck is served when unset.
    #[arg(long)]
    templates_var: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    gofish::log();
    gofish::kys();
    let templates: Arc<dyn DeckTemplateSource> = match args.templates_var {
        Some(ref var) => Arc::new(EnvVarTemplateSource::new(var)),
        None => Arc::new(FixedTemplateSource::demo()),
    };
    let lobby = Lobby::new(Arc::new(InMemoryGameRepository::default()));
    Server::run(&args.bind, lobby, templates).await.unwrap();
}
