//! AFK markers. Volatile: cleared on restart and on the user's next message.

use crate::core::state::StateStore;
use crate::entities::UserId;

/// Message used when `afk` is run without one
pub const DEFAULT_AFK_MESSAGE: &str = "Not specified";

/// Marks `user_id` as AFK, replacing any previous message
pub async fn set(state: &StateStore, user_id: UserId, message: &str) {
    let message = if message.trim().is_empty() {
        DEFAULT_AFK_MESSAGE
    } else {
        message.trim()
    };
    state.afk.write().await.insert(user_id, message.to_string());
}

/// Clears the user's AFK marker, returning the message it carried
pub async fn clear(state: &StateStore, user_id: UserId) -> Option<String> {
    state.afk.write().await.remove(&user_id)
}

/// The user's AFK message, if they are AFK
pub async fn message(state: &StateStore, user_id: UserId) -> Option<String> {
    state.afk.read().await.get(&user_id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_set_then_clear() {
        let (_dir, state) = setup_test_state();
        set(&state, 1, "lunch").await;
        assert_eq!(message(&state, 1).await.as_deref(), Some("lunch"));

        assert_eq!(clear(&state, 1).await.as_deref(), Some("lunch"));
        assert_eq!(message(&state, 1).await, None);
        assert_eq!(clear(&state, 1).await, None);
    }

    #[tokio::test]
    async fn test_blank_message_uses_default() {
        let (_dir, state) = setup_test_state();
        set(&state, 2, "   ").await;
        assert_eq!(message(&state, 2).await.as_deref(), Some(DEFAULT_AFK_MESSAGE));
    }
}
