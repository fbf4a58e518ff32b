//! Line command parsing.

use colore_game::domain::setup::{MAX_BACKSTORY_CHARS, MAX_TITLE_CHARS};
use colore_translation::domain::language::find_language;

use crate::error::CommandError;

const ADD_USAGE: &str = "/add NAME";
const REMOVE_USAGE: &str = "/remove NUMBER";
const CUSTOM_USAGE: &str = "/custom BACKSTORY [| TITLE]";
const CHAT_USAGE: &str = "/chat NAME: MESSAGE";
const TRANSLATE_USAGE: &str = "/translate [LANG] TEXT";

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a player to the roster.
    AddPlayer(String),
    /// Remove the player with this 1-based number.
    RemovePlayer(usize),
    /// Choose a genre; with no name, list the catalogue.
    Genre(Option<String>),
    /// Use a custom backstory, optionally titled.
    Custom {
        /// The backstory.
        backstory: String,
        /// Optional story title.
        title: Option<String>,
    },
    /// Begin the story.
    Start,
    /// Post to the private player chat.
    Chat {
        /// Who is speaking.
        sender: String,
        /// What they said.
        text: String,
    },
    /// Switch narration on or off.
    ToggleNarrate,
    /// Switch between the dark and light themes.
    ToggleTheme,
    /// Pause narration.
    Pause,
    /// Resume narration.
    Resume,
    /// Silence narration.
    Stop,
    /// Clear the game and return to the lobby.
    Reset,
    /// Translate some text. Without a language, the last one used is taken.
    Translate {
        /// Target language code.
        lang: Option<String>,
        /// Text to translate.
        text: String,
    },
    /// Show the roster and whose turn it is.
    Players,
    /// Show the story and chat logs.
    Log,
    /// Show the command list.
    Help,
    /// Leave.
    Quit,
    /// The current player's story action.
    Action(String),
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` for unknown commands, missing arguments and
    /// bad player numbers.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(body) = line.strip_prefix('/') else {
            return Ok(Some(Self::Action(line.to_owned())));
        };

        let (name, rest) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(name, rest)| (name, rest.trim()));

        let command = match name.to_ascii_lowercase().as_str() {
            "add" => Self::AddPlayer(required(rest, ADD_USAGE)?.to_owned()),
            "remove" => {
                let arg = required(rest, REMOVE_USAGE)?;
                match arg.parse::<usize>() {
                    Ok(number) if number > 0 => Self::RemovePlayer(number),
                    _ => return Err(CommandError::InvalidNumber(arg.to_owned())),
                }
            }
            "genre" => Self::Genre((!rest.is_empty()).then(|| rest.to_owned())),
            "custom" => parse_custom(rest)?,
            "start" => Self::Start,
            "chat" => parse_chat(rest)?,
            "narrate" => Self::ToggleNarrate,
            "theme" => Self::ToggleTheme,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "stop" => Self::Stop,
            "reset" => Self::Reset,
            "translate" => parse_translate(rest)?,
            "players" => Self::Players,
            "log" => Self::Log,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_owned())),
        };
        Ok(Some(command))
    }

    /// Whether this line stands for text typed into the story or chat input.
    #[must_use]
    pub fn is_typed_text(&self) -> bool {
        matches!(self, Self::Action(_) | Self::Chat { .. })
    }
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest)
    }
}

fn within<'a>(value: &'a str, field: &'static str, max: usize) -> Result<&'a str, CommandError> {
    if value.chars().count() > max {
        Err(CommandError::TooLong { field, max })
    } else {
        Ok(value)
    }
}

fn parse_custom(rest: &str) -> Result<Command, CommandError> {
    let (backstory, title) = rest.split_once('|').unwrap_or((rest, ""));
    let backstory = within(
        required(backstory.trim(), CUSTOM_USAGE)?,
        "backstory",
        MAX_BACKSTORY_CHARS,
    )?;
    let title = within(title.trim(), "title", MAX_TITLE_CHARS)?;
    Ok(Command::Custom {
        backstory: backstory.to_owned(),
        title: (!title.is_empty()).then(|| title.to_owned()),
    })
}

fn parse_chat(rest: &str) -> Result<Command, CommandError> {
    let (sender, text) = rest
        .split_once(':')
        .ok_or(CommandError::Usage(CHAT_USAGE))?;
    let sender = required(sender.trim(), CHAT_USAGE)?;
    let text = required(text.trim(), CHAT_USAGE)?;
    Ok(Command::Chat {
        sender: sender.to_owned(),
        text: text.to_owned(),
    })
}

fn parse_translate(rest: &str) -> Result<Command, CommandError> {
    let rest = required(rest, TRANSLATE_USAGE)?;
    if let Some((first, text)) = rest.split_once(char::is_whitespace) {
        if let Some(language) = find_language(first) {
            return Ok(Command::Translate {
                lang: Some(language.code.to_owned()),
                text: required(text.trim(), TRANSLATE_USAGE)?.to_owned(),
            });
        }
    } else if find_language(rest).is_some() {
        return Err(CommandError::Usage(TRANSLATE_USAGE));
    }
    Ok(Command::Translate {
        lang: None,
        text: rest.to_owned(),
    })
}
