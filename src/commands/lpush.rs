use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Insert all the specified values at the head of the list stored at `key`. Elements are inserted
/// one after the other, so `LPUSH mylist a b c` results in a list containing `c` as first element,
/// `b` as second element and `a` as third element.
///
/// Returns the length of the list after the push operation.
///
/// Ref: <https://redis.io/docs/latest/commands/lpush/>
#[derive(Debug, PartialEq)]
pub struct Lpush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for Lpush {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let len = store.lock().lpush(&self.key, self.values)?;
        Ok(Frame::Integer(len as i64))
    }
}

impl TryFrom<&mut CommandParser> for Lpush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::AtLeast(2))?;
        let key = parser.next_string()?;
        let values = parser.parts.by_ref().collect();
        Ok(Self { key, values })
    }
}
