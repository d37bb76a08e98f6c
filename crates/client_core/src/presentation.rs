//! Hooks the controller uses to talk to whoever is displaying the list.

use async_trait::async_trait;
use tracing::info;

/// Blocking, user-visible message (an alert box, a status line, stderr).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Interactive yes/no step in front of destructive actions.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; for non-interactive callers that already asked.
pub struct AssumeYes;

#[async_trait]
impl Confirmer for AssumeYes {
    async fn confirm(&self, prompt: &str) -> bool {
        info!(%prompt, "confirmation assumed");
        true
    }
}
