use crate::commands::executable::Executable;
use crate::commands::{pop_reply, Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Removes and returns the last elements of the list stored at `key`. Replies follow the same
/// rules as LPOP.
///
/// Ref: <https://redis.io/docs/latest/commands/rpop/>
#[derive(Debug, PartialEq)]
pub struct Rpop {
    pub key: String,
    pub count: Option<usize>,
}

impl Executable for Rpop {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let popped = store.lock().rpop(&self.key, self.count.unwrap_or(1))?;
        Ok(pop_reply(popped, self.count))
    }
}

impl TryFrom<&mut CommandParser> for Rpop {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Between(2, 3))?;
        let key = parser.next_string()?;
        let count = parser.next_count()?;

        Ok(Self { key, count })
    }
}
