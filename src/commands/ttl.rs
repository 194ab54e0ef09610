use crate::commands::executable::Executable;
use crate::commands::{Arity, CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::{KeyTtl, Store};

/// TTL returns the remaining time to live of a key that has a timeout. This introspection
/// capability allows a Redis client to check how many seconds a given key will continue to be part
/// of the dataset.
///
/// Returns `-2` if the key does not exist and `-1` if the key exists but has no associated expire.
///
/// Ref: <https://redis.io/docs/latest/commands/ttl>
#[derive(Debug, PartialEq)]
pub struct Ttl {
    pub key: String,
}

impl Executable for Ttl {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let ttl = match store.lock().ttl(&self.key) {
            KeyTtl::Missing => -2,
            KeyTtl::Persistent => -1,
            KeyTtl::Expires(remaining) => remaining.as_secs() as i64,
        };
        Ok(Frame::Integer(ttl))
    }
}

impl TryFrom<&mut CommandParser> for Ttl {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity(Arity::Exact(2))?;
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
