//! Request dispatch.
//!
//! Queue harnesses drive a PIFO with a stream of `(command, value)` pairs,
//! where the command is encoded as 0 = pop, 1 = peek, 2 = push and the value
//! is only meaningful for pushes. [`Request`] is the decoded form and
//! [`Pifo::handle`] services exactly one of them.

use crate::error::QueueResult;
use crate::pifo::Pifo;
use crate::sub_queue::SubQueue;

/// Request command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Remove and return the next value.
    Pop,
    /// Return the next value without removing it.
    Peek,
    /// Enqueue a value.
    Push,
}

impl Command {
    /// Returns all commands.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Pop, Self::Peek, Self::Push]
    }

    /// Returns the numeric code for this command.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Pop => 0,
            Self::Peek => 1,
            Self::Push => 2,
        }
    }

    /// Decodes a numeric command code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Pop),
            1 => Some(Self::Peek),
            2 => Some(Self::Push),
            _ => None,
        }
    }
}

/// A single queue request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<V> {
    /// Remove and return the next value.
    Pop,
    /// Return the next value without removing it.
    Peek,
    /// Enqueue a value.
    Push(V),
}

impl<V> Request<V> {
    /// Builds a request from a command and an operand.
    ///
    /// The operand is ignored for pops and peeks.
    #[must_use]
    pub fn from_parts(command: Command, value: V) -> Self {
        match command {
            Command::Pop => Self::Pop,
            Command::Peek => Self::Peek,
            Command::Push => Self::Push(value),
        }
    }

    /// Returns the command of this request.
    #[must_use]
    pub const fn command(&self) -> Command {
        match self {
            Self::Pop => Command::Pop,
            Self::Peek => Command::Peek,
            Self::Push(_) => Command::Push,
        }
    }
}

impl<V, Q0, Q1> Pifo<V, Q0, Q1>
where
    V: Copy + Ord,
    Q0: SubQueue<V>,
    Q1: SubQueue<V>,
{
    /// Services one request.
    ///
    /// Returns the answer for pops and peeks, and `None` for pushes.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying push, pop or peek returns.
    pub fn handle(&mut self, request: Request<V>) -> QueueResult<Option<V>> {
        match request {
            Request::Pop => self.pop().map(Some),
            Request::Peek => self.peek().map(Some),
            Request::Push(value) => self.push(value).map(|()| None),
        }
    }
}
