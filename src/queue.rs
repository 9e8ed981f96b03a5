//! Command queue between the messaging layer and the tick loop.
//!
//! Messages are decoded wherever the network stack runs; the resulting
//! commands wait here until the next render tick drains them. Access is
//! guarded by `critical-section`, so senders may live in interrupt handlers
//! or on another core.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::command::LightCommand;

/// Error returned when the queue is full, carrying the rejected command.
#[derive(Debug, Clone)]
pub struct TrySendError(pub LightCommand);

/// Error returned when the queue is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Bounded queue of commands.
///
/// SIZE is the number of commands the queue holds.
pub struct CommandQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<LightCommand, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for the messaging side.
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { queue: self }
    }

    /// Handle for the tick loop.
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { queue: self }
    }

    pub fn try_send(&self, command: LightCommand) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(TrySendError)
        })
    }

    pub fn try_receive(&self) -> Result<LightCommand, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Queue a command, handing it back if the queue is full.
    pub fn try_send(&self, command: LightCommand) -> Result<(), TrySendError> {
        self.queue.try_send(command)
    }
}

#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Result<LightCommand, TryReceiveError> {
        self.queue.try_receive()
    }
}
