use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the specified elements of the list stored at `key`. The offsets `start` and `stop` are
/// zero-based indexes and both inclusive. Negative offsets count from the end of the list.
///
/// A missing key behaves like an empty list.
///
/// Ref: <https://redis.io/docs/latest/commands/lrange/>
#[derive(Debug, PartialEq)]
pub struct Lrange {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

impl Executable for Lrange {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let values = store.lock().lrange(&self.key, self.start, self.stop)?;
        Ok(Frame::bulks(values))
    }
}

impl TryFrom<&mut CommandParser> for Lrange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Exact(4))?;
        let key = parser.next_string()?;
        let start = parser.next_integer()?;
        let stop = parser.next_integer()?;

        Ok(Self { key, start, stop })
    }
}
