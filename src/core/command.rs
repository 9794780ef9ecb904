//! Slash command parsing: the terminal stand-ins for the buttons a GUI
//! client would have. Command input never reaches the wire.

use std::path::PathBuf;

pub const HELP_TEXT: &str = "\
Commands:
  /upload <path> [path ...]   upload documents to the assistant's store
  /forget                     delete every stored document (asks first)
  /reconnect                  drop the link and dial the server again
  /help                       show this text
  /quit                       exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload(Vec<PathBuf>),
    Forget,
    Reconnect,
    Help,
    Quit,
}

/// Parse a `/command` line. Malformed input yields a usage string to show
/// in the transcript.
pub fn parse(input: &str) -> Result<Command, String> {
    let input = input.trim();
    let (name, args) = input.split_once(' ').unwrap_or((input, ""));
    let args = args.trim();

    match name {
        "/upload" => {
            if args.is_empty() {
                Err(String::from("Usage: /upload <path> [path ...]"))
            } else {
                Ok(Command::Upload(
                    args.split_whitespace().map(PathBuf::from).collect(),
                ))
            }
        }
        "/forget" => Ok(Command::Forget),
        "/reconnect" => Ok(Command::Reconnect),
        "/help" => Ok(Command::Help),
        "/quit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {other}. Type /help for the list.")),
    }
}
