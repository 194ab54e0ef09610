use std::{io, mem, str};

use bytes::{Buf, Bytes, BytesMut};
use thiserror::Error as ThisError;
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::{DataType, Frame};

/// Default upper bound for a single bulk string, the same limit Redis applies (512 MiB).
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Header lines are short decimal integers, anything longer without a terminator is garbage.
const MAX_HEADER_LEN: usize = 64 * 1024;

#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Protocol error: expected '{expected}', got '{}'", .actual.escape_ascii())]
    InvalidMarker { expected: char, actual: u8 },
    #[error("Protocol error: invalid {what} '{line}'")]
    InvalidInteger { what: &'static str, line: String },
    #[error("Protocol error: invalid bulk length {len}, limit is {max}")]
    BulkTooLarge { len: usize, max: usize },
    #[error("Protocol error: too big {what} line")]
    HeaderTooLong { what: &'static str },
    #[error("Protocol error: unexpected end of stream")]
    UnexpectedEof,
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Decoding progress, kept between calls so a frame split across reads is never parsed twice.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    ReadArrayHeader,
    ReadBulkHeader,
    ReadBulkBody { len: usize },
    ReadTrailer,
    Done,
}

/// Turns the request byte stream into commands (`*<n>` arrays of `$<len>` bulk strings) and
/// encodes reply frames on the way back.
#[derive(Debug)]
pub struct CommandCodec {
    state: State,
    remaining: usize,
    args: Vec<Bytes>,
    max_bulk_len: usize,
}

impl CommandCodec {
    pub fn new(max_bulk_len: usize) -> CommandCodec {
        CommandCodec {
            state: State::ReadArrayHeader,
            remaining: 0,
            args: Vec::new(),
            max_bulk_len,
        }
    }

    fn reset(&mut self) {
        self.state = State::ReadArrayHeader;
        self.remaining = 0;
        self.args.clear();
    }

    fn decode_command(&mut self, src: &mut BytesMut) -> Result<Option<Vec<Bytes>>, ProtocolError> {
        loop {
            match self.state {
                State::ReadArrayHeader => {
                    let Some(count) = read_header(src, DataType::Array, "multibulk length")? else {
                        return Ok(None);
                    };

                    self.remaining = count;
                    // The count comes from the client, don't trust it for the allocation.
                    self.args = Vec::with_capacity(count.min(1024));
                    self.state = if count == 0 {
                        State::Done
                    } else {
                        State::ReadBulkHeader
                    };
                }
                State::ReadBulkHeader => {
                    let Some(len) = read_header(src, DataType::BulkString, "bulk length")? else {
                        return Ok(None);
                    };

                    if len > self.max_bulk_len {
                        return Err(ProtocolError::BulkTooLarge {
                            len,
                            max: self.max_bulk_len,
                        });
                    }

                    self.state = State::ReadBulkBody { len };
                }
                State::ReadBulkBody { len } => {
                    if src.len() < len {
                        return Ok(None);
                    }

                    self.args.push(src.split_to(len).freeze());
                    self.state = State::ReadTrailer;
                }
                // The two trailing octets are skipped without checking that they are CRLF.
                State::ReadTrailer => {
                    if src.len() < 2 {
                        return Ok(None);
                    }

                    src.advance(2);
                    self.remaining -= 1;
                    self.state = if self.remaining == 0 {
                        State::Done
                    } else {
                        State::ReadBulkHeader
                    };
                }
                State::Done => {
                    self.state = State::ReadArrayHeader;
                    return Ok(Some(mem::take(&mut self.args)));
                }
            }
        }
    }
}

impl Default for CommandCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BULK_LEN)
    }
}

impl Decoder for CommandCodec {
    type Item = Vec<Bytes>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.decode_command(src).map_err(|err| {
            self.reset();
            err
        })
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(command) => Ok(Some(command)),
            // The peer hung up between two commands, that is a regular disconnect.
            None if src.is_empty() && self.state == State::ReadArrayHeader => Ok(None),
            None => {
                self.reset();
                Err(ProtocolError::UnexpectedEof)
            }
        }
    }
}

impl Encoder<Frame> for CommandCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        frame.write_to(dst);
        Ok(())
    }
}

/// Reads `<marker><non-negative integer>\r\n` from the front of `src`. Nothing is consumed until
/// the whole line is available.
fn read_header(
    src: &mut BytesMut,
    marker: DataType,
    what: &'static str,
) -> Result<Option<usize>, ProtocolError> {
    let Some(&first_byte) = src.first() else {
        return Ok(None);
    };

    let expected = u8::from(marker);
    if first_byte != expected {
        return Err(ProtocolError::InvalidMarker {
            expected: char::from(expected),
            actual: first_byte,
        });
    }

    let Some(newline) = src.iter().position(|&b| b == b'\n') else {
        if src.len() > MAX_HEADER_LEN {
            return Err(ProtocolError::HeaderTooLong { what });
        }
        return Ok(None);
    };

    let line = src.split_to(newline + 1);
    let invalid = || ProtocolError::InvalidInteger {
        what,
        line: String::from_utf8_lossy(&line[1..]).trim_end().to_string(),
    };

    let digits = line[1..].strip_suffix(b"\r\n").ok_or_else(invalid)?;
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let value = str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(invalid)?;

    Ok(Some(value))
}
