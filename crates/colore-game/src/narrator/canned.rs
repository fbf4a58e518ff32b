//! Offline narrator that answers with canned story beats.

use std::sync::Mutex;

use async_trait::async_trait;
use colore_core::error::ProviderError;
use colore_core::generation::TextGenerator;
use colore_core::rng::DeterministicRng;

/// Story beats the offline narrator picks from.
pub const CANNED_REPLIES: [&str; 8] = [
    "The mysterious door creaks open, revealing a swirling vortex of colors beyond...",
    "Suddenly, a wise old owl perches nearby and speaks: 'That was quite clever!'",
    "The ground trembles slightly as your action sets something ancient into motion...",
    "A gentle breeze carries the scent of adventure and distant lands...",
    "The shadows dance as if responding to your bold move...",
    "In the distance, you hear the faint sound of laughter - or is it music?",
    "The very air seems to shimmer with possibility after what you've done...",
    "A small, glowing creature emerges from hiding, clearly intrigued by your actions...",
];

/// A narrator that needs no network. The prompt is ignored.
pub struct CannedNarrator {
    rng: Mutex<Box<dyn DeterministicRng>>,
}

impl CannedNarrator {
    /// Creates a narrator drawing beats with `rng`.
    #[must_use]
    pub fn new(rng: Box<dyn DeterministicRng>) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedNarrator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        let index = self
            .rng
            .lock()
            .map_err(|_| ProviderError::Unavailable("narrator rng poisoned".into()))?
            .pick_index(CANNED_REPLIES.len());
        Ok(CANNED_REPLIES[index].to_owned())
    }
}
