//! Line-oriented command reader
//!
//! Turns one line of user input into an [`AppEvent`]. List positions typed by
//! the user are 1-based; events carry 0-based indexes.

use crate::events::AppEvent;
use cadence_core::Theme;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(AppEvent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("`{verb}` needs {what}")]
    MissingArgument { verb: String, what: &'static str },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
search <query> (s)     search with the selected engine
engine <name>          gaama | wynk | jiosaavn
recent <n>             run the n-th recent search again
play <n>               play the n-th result (replaces the queue)
add <n>                add the n-th result to the queue
like <n>               like/unlike the n-th result
p | toggle             play/pause
next (n) | prev (b)    skip
seek <seconds>         jump to a position
ff | rw                seek forward / back
shuffle | repeat       toggle shuffle / cycle repeat
vol <0-100> | vol+ | vol- | mute
love                   like/unlike the playing track
jump <n> | remove <n>  queue row actions
clear                  clear the queue (keeps the playing track)
save [name]            save the queue as a playlist
new <name>             create a playlist
addto <playlist>       add the playing track to a playlist
view <playlist>        show a playlist
theme [dark|light]     set or toggle the theme
clear-cache            drop caches and reset preferences
help | quit";

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let verb_lc = verb.to_lowercase();

    let event = match verb_lc.as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" | "q" => return Ok(Some(Command::Quit)),

        "search" | "s" => AppEvent::Search(required(verb, rest, "a query")?.to_string()),
        "engine" => AppEvent::SelectEngine(required(verb, rest, "an engine name")?.to_string()),
        "recent" => AppEvent::ReplaySearch(position(verb, rest)?),
        "play" => AppEvent::PlayResult(position(verb, rest)?),
        "add" => AppEvent::EnqueueResult(position(verb, rest)?),
        "like" => AppEvent::LikeResult(position(verb, rest)?),

        "p" | "toggle" | "pause" => AppEvent::TogglePlay,
        "next" | "n" => AppEvent::Next,
        "prev" | "b" => AppEvent::Previous,
        "seek" => AppEvent::SeekTo(seconds(verb, rest)?),
        "ff" => AppEvent::SeekForward,
        "rw" => AppEvent::SeekBackward,
        "shuffle" => AppEvent::ToggleShuffle,
        "repeat" => AppEvent::CycleRepeat,
        "vol" => AppEvent::SetVolume(number::<i32>(verb, rest, "a level")?),
        "vol+" => AppEvent::VolumeUp,
        "vol-" => AppEvent::VolumeDown,
        "mute" => AppEvent::ToggleMute,
        "love" => AppEvent::LikeCurrent,

        "jump" => AppEvent::JumpTo(position(verb, rest)?),
        "remove" | "rm" => AppEvent::RemoveFromQueue(position(verb, rest)?),
        "clear" => AppEvent::ClearQueue,
        "save" => AppEvent::SaveQueueAsPlaylist(rest.to_string()),

        "new" => AppEvent::CreatePlaylist(required(verb, rest, "a playlist name")?.to_string()),
        "addto" => {
            AppEvent::AddCurrentToPlaylist(required(verb, rest, "a playlist name")?.to_string())
        }
        "view" => AppEvent::ViewPlaylist(required(verb, rest, "a playlist name")?.to_string()),

        "theme" if rest.is_empty() => AppEvent::ToggleTheme,
        "theme" => AppEvent::SetTheme(
            rest.parse::<Theme>()
                .map_err(|_| CommandError::MissingArgument {
                    verb: verb.to_string(),
                    what: "`dark` or `light`",
                })?,
        ),
        "clear-cache" => AppEvent::ClearCache,

        _ => return Err(CommandError::Unknown(verb.to_string())),
    };

    Ok(Some(Command::Event(event)))
}

fn required<'a>(verb: &str, rest: &'a str, what: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument {
            verb: verb.to_string(),
            what,
        })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(
    verb: &str,
    rest: &str,
    what: &'static str,
) -> Result<T, CommandError> {
    required(verb, rest, what)?
        .parse()
        .map_err(|_| CommandError::InvalidNumber(rest.to_string()))
}

fn seconds(verb: &str, rest: &str) -> Result<f64, CommandError> {
    let value = number::<f64>(verb, rest, "a position in seconds")?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandError::InvalidNumber(rest.to_string()))
    }
}

/// 1-based list position to 0-based index
fn position(verb: &str, rest: &str) -> Result<usize, CommandError> {
    match number::<usize>(verb, rest, "a list position")? {
        0 => Err(CommandError::InvalidNumber(rest.to_string())),
        n => Ok(n - 1),
    }
}
