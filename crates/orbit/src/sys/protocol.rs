//! Line protocol spoken over the control socket.
//!
//! One command per line, words split like a shell would so messages and process names can be
//! quoted: `show`, `show 640 400`, `move 10 20`, `focus "my app"`, `resolve 3 yes`.

use crate::events::AppEvent;
use crate::menu::{ConfirmHandle, Point};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

pub const SOCKET_NAME: &str = "orbit.sock";
const FALLBACK_SOCKET_PATH: &str = "/tmp/orbit.sock";

/// `$XDG_RUNTIME_DIR/orbit.sock`, or a fixed path under `/tmp` without a runtime dir.
pub fn socket_path() -> PathBuf {
    directories::BaseDirs::new()
        .and_then(|dirs| dirs.runtime_dir().map(|dir| dir.join(SOCKET_NAME)))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SOCKET_PATH))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Show,
    Hide,
    Move,
    Down,
    Up,
    Cancel,
    Back,
    Focus,
    Confirm,
    Resolve,
    Dismiss,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' expects {expected}")]
    Arguments {
        verb: &'static str,
        expected: &'static str,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("expected yes or no, got '{0}'")]
    InvalidAnswer(String),
    #[error("unbalanced quotes")]
    Quoting(#[from] shell_words::ParseError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show(Option<Point>),
    Hide,
    Move(Point),
    Down(Point),
    Up(Point),
    Cancel,
    Back,
    Focus(String),
    Confirm(String),
    Resolve(ConfirmHandle, bool),
    Dismiss(ConfirmHandle),
}

fn number<T: FromStr>(word: &str) -> Result<T, ProtocolError> {
    word.parse()
        .map_err(|_| ProtocolError::InvalidNumber(word.to_string()))
}

fn point(verb: &'static str, args: &[String]) -> Result<Point, ProtocolError> {
    match args {
        [x, y] => Ok(Point::new(number(x)?, number(y)?)),
        _ => Err(ProtocolError::Arguments {
            verb,
            expected: "x and y",
        }),
    }
}

fn handle(verb: &'static str, args: &[String]) -> Result<ConfirmHandle, ProtocolError> {
    match args.first() {
        Some(word) => number::<u64>(word).map(ConfirmHandle::from),
        None => Err(ProtocolError::Arguments {
            verb,
            expected: "a confirmation handle",
        }),
    }
}

fn text(verb: &'static str, args: &[String]) -> Result<String, ProtocolError> {
    if args.is_empty() {
        return Err(ProtocolError::Arguments {
            verb,
            expected: "text",
        });
    }
    Ok(args.join(" "))
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = shell_words::split(line)?;
        let (verb, args) = words.split_first().ok_or(ProtocolError::Empty)?;
        let verb =
            Verb::from_str(verb).map_err(|_| ProtocolError::UnknownVerb(verb.to_string()))?;

        Ok(match verb {
            Verb::Show if args.is_empty() => Command::Show(None),
            Verb::Show => Command::Show(Some(point("show", args)?)),
            Verb::Hide => Command::Hide,
            Verb::Move => Command::Move(point("move", args)?),
            Verb::Down => Command::Down(point("down", args)?),
            Verb::Up => Command::Up(point("up", args)?),
            Verb::Cancel => Command::Cancel,
            Verb::Back => Command::Back,
            Verb::Focus => Command::Focus(text("focus", args)?),
            Verb::Confirm => Command::Confirm(text("confirm", args)?),
            Verb::Resolve => {
                let handle = handle("resolve", args)?;
                let accepted = match args.get(1).map(|a| a.to_ascii_lowercase()).as_deref() {
                    Some("yes" | "y" | "true") => true,
                    Some("no" | "n" | "false") => false,
                    Some(_) => return Err(ProtocolError::InvalidAnswer(args[1].clone())),
                    None => {
                        return Err(ProtocolError::Arguments {
                            verb: "resolve",
                            expected: "a handle and yes or no",
                        });
                    }
                };
                Command::Resolve(handle, accepted)
            }
            Verb::Dismiss => Command::Dismiss(handle("dismiss", args)?),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Show(None) => write!(f, "{}", Verb::Show),
            Command::Show(Some(p)) => write!(f, "{} {} {}", Verb::Show, p.x, p.y),
            Command::Hide => write!(f, "{}", Verb::Hide),
            Command::Move(p) => write!(f, "{} {} {}", Verb::Move, p.x, p.y),
            Command::Down(p) => write!(f, "{} {} {}", Verb::Down, p.x, p.y),
            Command::Up(p) => write!(f, "{} {} {}", Verb::Up, p.x, p.y),
            Command::Cancel => write!(f, "{}", Verb::Cancel),
            Command::Back => write!(f, "{}", Verb::Back),
            Command::Focus(process) => {
                write!(f, "{} {}", Verb::Focus, shell_words::quote(process))
            }
            Command::Confirm(message) => {
                write!(f, "{} {}", Verb::Confirm, shell_words::quote(message))
            }
            Command::Resolve(handle, accepted) => write!(
                f,
                "{} {} {}",
                Verb::Resolve,
                handle,
                if *accepted { "yes" } else { "no" }
            ),
            Command::Dismiss(handle) => write!(f, "{} {}", Verb::Dismiss, handle),
        }
    }
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Show(at) => AppEvent::Show(at),
            Command::Hide => AppEvent::Hide,
            Command::Move(p) => AppEvent::PointerMove(p),
            Command::Down(p) => AppEvent::PointerDown(p),
            Command::Up(p) => AppEvent::PointerUp(p),
            Command::Cancel => AppEvent::CancelDrag,
            Command::Back => AppEvent::Back,
            Command::Focus(process) => AppEvent::Foreground(process),
            Command::Confirm(message) => AppEvent::Confirm(message),
            Command::Resolve(handle, accepted) => AppEvent::Resolve(handle, accepted),
            Command::Dismiss(handle) => AppEvent::Dismiss(handle),
        }
    }
}
