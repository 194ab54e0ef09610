use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns `message` as a bulk string.
///
/// Ref: <https://redis.io/docs/latest/commands/echo>
#[derive(Debug, PartialEq)]
pub struct Echo {
    pub message: Bytes,
}

impl Executable for Echo {
    fn exec(self, _store: Store) -> Result<Frame, CommandError> {
        Ok(Frame::Bulk(self.message))
    }
}

impl TryFrom<&mut CommandParser> for Echo {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Exact(2))?;
        let message = parser.next_bytes()?;
        Ok(Self { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn binary_message() {
        let cmd = Command::try_from(vec![
            Bytes::from("ECHO"),
            Bytes::from_static(b"hello\r\n\0world"),
        ])
        .unwrap();

        let res = cmd.exec(Store::new()).unwrap();

        assert_eq!(res, Frame::Bulk(Bytes::from_static(b"hello\r\n\0world")));
    }

    #[test]
    fn missing_message() {
        let err = Command::try_from(vec![Bytes::from("ECHO")]).unwrap_err();

        assert_eq!(
            err.to_string(),
            "ERR wrong number of arguments for 'echo' command"
        );
    }
}
