//! Prompt construction for the narrator.
//!
//! Only the story log is ever rendered into a prompt. The chat log is
//! private to the players.

use std::fmt::Write;

use crate::domain::message::Message;
use crate::domain::setup::GameSetup;

/// Instructions for starting a new adventure.
pub const OPENING_TEMPLATE: &str = "You're a narrator for a collaborative storytelling game. \
Start a new adventure with a magical, mysterious setting. Use vivid language but keep it \
short, no more than 4 sentences. End your description with a question that invites the \
player to act.";

/// Instructions for continuing the story after a player action.
pub const CONTINUATION_TEMPLATE: &str = "You are a narrator in a collaborative game. Your role \
is to respond to player actions with vivid, concise story beats. Keep your replies under 4-5 \
sentences. End with an open-ended question or invitation to act.";

fn push_setup(prompt: &mut String, setup: Option<&GameSetup>) {
    match setup {
        Some(GameSetup::Genre(genre)) => {
            let _ = write!(prompt, "\n\nGenre: {genre}");
        }
        Some(GameSetup::Custom(backstory)) => {
            let _ = write!(prompt, "\n\nBackstory: {backstory}");
        }
        None => {}
    }
}

/// Renders story messages as `Sender: content` lines.
#[must_use]
pub fn story_context(story_log: &[Message]) -> String {
    story_log
        .iter()
        .map(|m| format!("{}: {}", m.sender, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the prompt for the narrator's reply to the latest story beat.
#[must_use]
pub fn continuation_prompt(setup: Option<&GameSetup>, story_log: &[Message]) -> String {
    let mut prompt = CONTINUATION_TEMPLATE.to_owned();
    push_setup(&mut prompt, setup);
    let _ = write!(prompt, "\n\nStory Context:\n{}", story_context(story_log));
    prompt
}

/// Builds the prompt for the opening scene, optionally weaving in the first
/// player's action.
#[must_use]
pub fn opening_prompt(setup: Option<&GameSetup>, first_action: Option<&str>) -> String {
    let mut prompt = OPENING_TEMPLATE.to_owned();
    push_setup(&mut prompt, setup);
    if let Some(action) = first_action.map(str::trim).filter(|a| !a.is_empty()) {
        let _ = write!(
            prompt,
            "\n\nThe first player decides to: {action}\n\nNow create an opening that sets \
             the scene and incorporates this action."
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::{Channel, NARRATOR};
    use chrono::Utc;

    fn story(sender: &str, content: &str) -> Message {
        Message {
            sender: sender.to_owned(),
            content: content.to_owned(),
            channel: Channel::Story,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_continuation_prompt_lists_story_in_order() {
        let log = vec![story("Alice", "open the door"), story(NARRATOR, "It creaks.")];

        let prompt = continuation_prompt(None, &log);

        assert!(prompt.starts_with(CONTINUATION_TEMPLATE));
        assert!(prompt.ends_with("Story Context:\nAlice: open the door\nAI Narrator: It creaks."));
    }

    #[test]
    fn test_continuation_prompt_includes_genre_or_backstory() {
        let genre = continuation_prompt(Some(&GameSetup::Genre("Mystery".into())), &[]);
        let custom = continuation_prompt(Some(&GameSetup::Custom("On a ghost ship".into())), &[]);

        assert!(genre.contains("Genre: Mystery"));
        assert!(custom.contains("Backstory: On a ghost ship"));
        assert!(!custom.contains("Genre:"));
    }

    #[test]
    fn test_opening_prompt_weaves_in_first_action() {
        let with_action = opening_prompt(None, Some("light a torch"));
        let without = opening_prompt(None, Some("   "));

        assert!(with_action.contains("The first player decides to: light a torch"));
        assert_eq!(without, OPENING_TEMPLATE);
    }
}
