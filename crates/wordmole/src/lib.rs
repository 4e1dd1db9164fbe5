//! wordmole — the room and game-state engine for a social-deduction
//! word game.
//!
//! Players gather in code-keyed rooms; at game start most receive a
//! secret word while the impostors get nothing but the category. Play
//! alternates clue rounds and plurality votes until the impostors are
//! all voted out or the round budget runs dry.
//!
//! The engine is transport-agnostic: a pub/sub socket layer feeds it
//! [`ClientAction`](wordmole_protocol::ClientAction)s and connection
//! drops, and it answers through an [`EventSink`]. All inputs — actions,
//! disconnects, fired timers — are consumed by one event loop, so room
//! state needs no locks.
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use wordmole::{BufferedSink, GameServer, InMemoryWordService};
//! use wordmole_room::RoomRegistry;
//! use wordmole_timer::TokioScheduler;
//!
//! let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
//! let registry = RoomRegistry::new(Box::new(TokioScheduler::new(timer_tx)));
//! let mut server = GameServer::new(
//!     registry,
//!     BufferedSink::new(),
//!     InMemoryWordService::with_defaults(),
//! );
//! // Event loop: select over decoded actions, disconnects, and timer_rx,
//! // calling handle_action / handle_disconnect / handle_timer.
//! # let _ = (&mut server, &mut timer_rx);
//! ```

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod sink;
pub mod words;

pub use error::{ActionError, EngineError};
pub use handlers::GameServer;
pub use sink::{BufferedSink, EventSink};
pub use words::{InMemoryWordService, WordPair, WordService, WordServiceError};

/// Installs the process-wide tracing subscriber, honoring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
