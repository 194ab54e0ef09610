use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Insert all the specified values at the tail of the list stored at `key`. If `key` does not
/// exist, it is created as an empty list before performing the push operation.
///
/// Returns the length of the list after the push operation.
///
/// Ref: <https://redis.io/docs/latest/commands/rpush/>
#[derive(Debug, PartialEq)]
pub struct Rpush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for Rpush {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let len = store.lock().rpush(&self.key, self.values)?;
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Rpush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::AtLeast(2))?;
        let key = parser.next_string()?;
        let values = parser.parts.by_ref().collect();
        Ok(Self { key, values })
    }
}
