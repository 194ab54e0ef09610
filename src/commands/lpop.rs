use crate::commands::executable::Executable;
use crate::commands::{pop_reply, Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Removes and returns the first elements of the list stored at `key`.
///
/// By default, the command pops a single element from the beginning of the list. When provided
/// with the optional `count` argument, the reply will consist of up to `count` elements.
///
/// Ref: <https://redis.io/docs/latest/commands/lpop/>
#[derive(Debug, PartialEq)]
pub struct Lpop {
    pub key: String,
    pub count: Option<usize>,
}

impl Executable for Lpop {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let popped = store.lock().lpop(&self.key, self.count.unwrap_or(1))?;
        Ok(pop_reply(popped, self.count))
    }
}

impl TryFrom<&mut CommandParser> for Lpop {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Between(2, 3))?;
        let key = parser.next_string()?;
        let count = parser.next_count()?;

        Ok(Self { key, count })
    }
}
