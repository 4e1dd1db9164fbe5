//! Action dispatch: one entry point per input source.
//!
//! The socket layer decodes frames into [`ClientAction`] and calls
//! [`GameServer::handle_action`]; the timer channel feeds
//! [`GameServer::handle_timer`](crate::handlers::GameServer::handle_timer);
//! connection drops go to
//! [`GameServer::handle_disconnect`](crate::handlers::GameServer::handle_disconnect).
//! All three run on the same event loop, so handlers never race.

use tracing::debug;

use wordmole_protocol::{ClientAction, PlayerId, RoomAck};

use crate::error::ActionError;
use crate::handlers::GameServer;
use crate::sink::EventSink;
use crate::words::WordService;

impl<S: EventSink, W: WordService> GameServer<S, W> {
    /// Routes one client action to its handler.
    ///
    /// `create-room` and `join-room` return the [`RoomAck`] the caller's
    /// callback delivers; every other action answers through broadcast
    /// events only. Errors carry the wire code via
    /// [`ActionError::code`].
    pub async fn handle_action(
        &mut self,
        sender: &PlayerId,
        action: ClientAction,
    ) -> Result<Option<RoomAck>, ActionError> {
        debug!(player = %sender, action = action_name(&action), "action received");
        match action {
            ClientAction::CreateRoom { name } => {
                Ok(Some(self.create_room(sender, name)))
            }
            ClientAction::JoinRoom {
                code,
                name,
                session_token,
            } => self.join_room(sender, code, name, session_token).map(Some),
            ClientAction::UpdateConfig { config } => {
                self.update_config(sender, config).map(|()| None)
            }
            ClientAction::StartGame => {
                self.start_game(sender).await.map(|()| None)
            }
            ClientAction::PlayerReady => {
                self.player_ready(sender);
                Ok(None)
            }
            ClientAction::SubmitClue { text } => {
                self.submit_clue(sender, text).map(|()| None)
            }
            ClientAction::SubmitVote { target_id } => {
                self.submit_vote(sender, target_id).map(|()| None)
            }
        }
    }
}

fn action_name(action: &ClientAction) -> &'static str {
    match action {
        ClientAction::CreateRoom { .. } => "create-room",
        ClientAction::JoinRoom { .. } => "join-room",
        ClientAction::UpdateConfig { .. } => "update-config",
        ClientAction::StartGame => "start-game",
        ClientAction::PlayerReady => "player-ready",
        ClientAction::SubmitClue { .. } => "submit-clue",
        ClientAction::SubmitVote { .. } => "submit-vote",
    }
}
