pub mod dbsize;
pub mod del;
pub mod echo;
pub mod executable;
pub mod exists;
pub mod get;
pub mod keys;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod ping;
pub mod pttl;
pub mod rpop;
pub mod rpush;
pub mod set;
pub mod ttl;
pub mod type_;

use bytes::Bytes;
use std::{str, vec};
use thiserror::Error as ThisError;
use tracing::debug;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::{Store, StoreError};

use dbsize::DBSize;
use del::Del;
use echo::Echo;
use exists::Exists;
use get::Get;
use keys::Keys;
use llen::Llen;
use lpop::Lpop;
use lpush::Lpush;
use lrange::Lrange;
use ping::Ping;
use pttl::Pttl;
use rpop::Rpop;
use rpush::Rpush;
use set::Set;
use ttl::Ttl;
use type_::Type;

#[derive(Debug, PartialEq)]
pub enum Command {
    DBsize(DBSize),
    Del(Del),
    Exists(Exists),
    Get(Get),
    Keys(Keys),
    Pttl(Pttl),
    Set(Set),
    Ttl(Ttl),
    Type(Type),

    Llen(Llen),
    Lpop(Lpop),
    Lpush(Lpush),
    Lrange(Lrange),
    Rpop(Rpop),
    Rpush(Rpush),

    Echo(Echo),
    Ping(Ping),
}

impl Executable for Command {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match self {
            Command::DBsize(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::Echo(cmd) => cmd.exec(store),
            Command::Exists(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Keys(cmd) => cmd.exec(store),
            Command::Llen(cmd) => cmd.exec(store),
            Command::Lpop(cmd) => cmd.exec(store),
            Command::Lpush(cmd) => cmd.exec(store),
            Command::Lrange(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
            Command::Pttl(cmd) => cmd.exec(store),
            Command::Rpop(cmd) => cmd.exec(store),
            Command::Rpush(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Ttl(cmd) => cmd.exec(store),
            Command::Type(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Vec<Bytes>> for Command {
    type Error = CommandError;

    fn try_from(args: Vec<Bytes>) -> Result<Self, Self::Error> {
        let parser = &mut CommandParser::new(args)?;
        let command_name = parser.command_name().to_string();

        match &command_name[..] {
            "dbsize" => DBSize::try_from(parser).map(Command::DBsize),
            "del" => Del::try_from(parser).map(Command::Del),
            "echo" => Echo::try_from(parser).map(Command::Echo),
            "exists" => Exists::try_from(parser).map(Command::Exists),
            "get" => Get::try_from(parser).map(Command::Get),
            "keys" => Keys::try_from(parser).map(Command::Keys),
            "llen" => Llen::try_from(parser).map(Command::Llen),
            "lpop" => Lpop::try_from(parser).map(Command::Lpop),
            "lpush" => Lpush::try_from(parser).map(Command::Lpush),
            "lrange" => Lrange::try_from(parser).map(Command::Lrange),
            "ping" => Ping::try_from(parser).map(Command::Ping),
            "pttl" => Pttl::try_from(parser).map(Command::Pttl),
            "rpop" => Rpop::try_from(parser).map(Command::Rpop),
            "rpush" => Rpush::try_from(parser).map(Command::Rpush),
            "set" => Set::try_from(parser).map(Command::Set),
            "ttl" => Ttl::try_from(parser).map(Command::Ttl),
            "type" => Type::try_from(parser).map(Command::Type),
            _ => Err(CommandError::UnknownCommand {
                command: parser.name.clone(),
            }),
        }
    }
}

/// Parses and runs one command against the store. Every failure is turned into an error reply,
/// none of them is fatal for the connection.
pub fn execute(args: Vec<Bytes>, store: &Store) -> Frame {
    let res = Command::try_from(args).and_then(|cmd| {
        debug!(command = ?cmd, "executing command");
        cmd.exec(store.clone())
    });

    res.unwrap_or_else(|err| {
        debug!(error = %err, "command failed");
        Frame::Error(err.to_string())
    })
}

/// Number of arguments a command accepts, the command name included.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

pub(crate) struct CommandParser {
    /// Command name as sent by the client, used in error messages.
    name: String,
    /// Lowercased name, used for matching.
    command_name: String,
    /// Total number of arguments, command name included.
    len: usize,
    parts: vec::IntoIter<Bytes>,
}

impl CommandParser {
    fn new(args: Vec<Bytes>) -> Result<CommandParser, CommandError> {
        let len = args.len();
        let mut parts = args.into_iter();
        let name = parts.next().ok_or(CommandError::EmptyCommand)?;
        let name = String::from_utf8_lossy(&name).into_owned();

        Ok(CommandParser {
            command_name: name.to_lowercase(),
            name,
            len,
            parts,
        })
    }

    fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Validates the argument count before anything else is parsed.
    fn check_arity(&self, arity: Arity) -> Result<(), CommandError> {
        let valid = match arity {
            Arity::Exact(n) => self.len == n,
            Arity::AtLeast(n) => self.len >= n,
            Arity::Between(min, max) => (min..=max).contains(&self.len),
        };

        if valid {
            Ok(())
        } else {
            Err(CommandError::WrongArity {
                command: self.command_name.clone(),
            })
        }
    }

    fn has_remaining(&self) -> bool {
        self.parts.len() > 0
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandError> {
        self.parts.next().ok_or_else(|| CommandError::WrongArity {
            command: self.command_name.clone(),
        })
    }

    fn next_string(&mut self) -> Result<String, CommandError> {
        let bytes = self.next_bytes()?;
        str::from_utf8(&bytes[..])
            .map(|s| s.to_string())
            .map_err(CommandError::InvalidUTF8String)
    }

    fn next_integer(&mut self) -> Result<i64, CommandError> {
        let bytes = self.next_bytes()?;
        str::from_utf8(&bytes[..])
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(CommandError::NotAnInteger)
    }

    /// Collects every remaining argument as a string.
    fn remaining_strings(&mut self) -> Result<Vec<String>, CommandError> {
        let mut strings = Vec::with_capacity(self.parts.len());
        while self.has_remaining() {
            strings.push(self.next_string()?);
        }
        Ok(strings)
    }

    /// Optional pop count, non-negative when present.
    fn next_count(&mut self) -> Result<Option<usize>, CommandError> {
        if !self.has_remaining() {
            return Ok(None);
        }

        let count = self.next_integer()?;
        usize::try_from(count)
            .map(Some)
            .map_err(|_| CommandError::NotPositive)
    }
}

/// Shapes the result of `LPOP`/`RPOP`. Without a count the reply is a single bulk string (or
/// null), with a count it is an array, and a null array when the key does not exist.
pub(crate) fn pop_reply(popped: Option<Vec<Bytes>>, count: Option<usize>) -> Frame {
    match (popped, count) {
        (None, Some(_)) => Frame::NullArray,
        (Some(values), Some(_)) => Frame::bulks(values),
        (popped, None) => popped
            .and_then(|values| values.into_iter().next())
            .map_or(Frame::NullBulkString, Frame::Bulk),
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("ERR empty command")]
    EmptyCommand,
    #[error("ERR unknown command '{command}'")]
    UnknownCommand { command: String },
    #[error("ERR wrong number of arguments for '{command}' command")]
    WrongArity { command: String },
    #[error("ERR syntax error")]
    Syntax,
    #[error("ERR invalid expire time in '{command}' command ({option})")]
    InvalidExpireTime { command: String, option: String },
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,
    #[error("ERR value is out of range, must be positive")]
    NotPositive,
    #[error("ERR invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
