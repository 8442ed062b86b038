//! Authoritative Go Fish card server with snapshot-synced clients.
//!
//! One process owns the authoritative state of every game; clients
//! mutate it through typed actions and receive a full-snapshot
//! broadcast after each mutation. The store is deliberately ephemeral:
//! any client can reseed a lost game from its own last snapshot via
//! the RESTORE action.
//!
//! ## Module Organization
//!
//! ### Core
//! - [`game`] — Pure state machine for one game (deck, players, turn)
//! - [`protocol`] — Wire types: client actions and server broadcasts
//!
//! ### Infrastructure
//! - [`repository`] — Game storage port and in-memory implementation
//! - [`templates`] — Deck template acquisition port
//!
//! ### Application
//! - [`hosting`] — HTTP/WebSocket server and per-game broadcast lobby
//! - [`client`] — Native client with membership cache and snapshot
//!   recovery

pub mod client;
pub mod game;
pub mod hosting;
pub mod protocol;
pub mod repository;
pub mod templates;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Card identifier, unique within one game, assigned at deck build time.
pub type CardId = u32;
/// Opaque player identifier (`player-<n>`), map key and turn-order key.
pub type PlayerId = String;
/// Opaque game identifier (`game-<n>`), repository key and channel name.
pub type GameId = String;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}
