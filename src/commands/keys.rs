use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

// https://redis.io/commands/keys
#[derive(Debug, PartialEq)]
pub struct Keys {
    pub pattern: String,
}

impl Executable for Keys {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let keys = store.lock().keys(&self.pattern);

        Ok(Frame::bulks(keys.into_iter().map(Bytes::from)))
    }
}

impl TryFrom<&mut CommandParser> for Keys {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Exact(2))?;
        let pattern = parser.next_string()?;
        Ok(Self { pattern })
    }
}
