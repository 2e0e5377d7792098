//! Awaitable placeholders for results which get resolved on some later tick.
//!
//! Pairs of a `Completer`, kept by the physics engine, and a `PendingResult`,
//! handed to the caller. Every pending result is eventually resolved:
//! explicitly by the completer, by the completer being dropped, or by the
//! caller cancelling it, the latter two resolving it as cancelled.

use std::{
    future::Future,
    pin::Pin,
    task::{
        Context,
        Poll,
    },
};
use tokio::sync::oneshot::{
    self,
    error::TryRecvError,
};


/// The waiting side gave up on, or the resolving side dropped, a pending result.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cancelled;

/// Create a linked completer and pending result.
pub fn pending<T, E>() -> (Completer<T, E>, PendingResult<T, E>) {
    let (send, recv) = oneshot::channel();
    (Completer { send }, PendingResult { recv })
}

/// Resolving side of a pending result.
#[derive(Debug)]
pub struct Completer<T, E> {
    send: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Completer<T, E> {
    pub fn resolve(self, value: T) {
        let _ = self.send.send(Ok(value));
    }

    pub fn fail(self, error: E) {
        let _ = self.send.send(Err(error));
    }

    /// Whether the waiting side cancelled or dropped its pending result.
    pub fn is_cancelled(&self) -> bool {
        self.send.is_closed()
    }
}

/// Waiting side of a pending result. Resolves to `Err(Cancelled.into())` if
/// cancelled.
#[derive(Debug)]
pub struct PendingResult<T, E> {
    recv: oneshot::Receiver<Result<T, E>>,
}

impl<T, E: From<Cancelled>> PendingResult<T, E> {
    /// Pending result which is already resolved.
    pub fn ready(result: Result<T, E>) -> Self {
        let (completer, pending) = pending();
        match result {
            Ok(value) => completer.resolve(value),
            Err(error) => completer.fail(error),
        }
        pending
    }

    /// Cancel from the waiting side. Unless it was already resolved, it will
    /// resolve as cancelled.
    pub fn cancel(&mut self) {
        self.recv.close();
    }

    /// Take the result without waiting, if it has been resolved.
    ///
    /// Once this has returned `Some`, later calls resolve as cancelled.
    pub fn try_take(&mut self) -> Option<Result<T, E>> {
        match self.recv.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(Cancelled.into())),
        }
    }
}

impl<T, E: From<Cancelled>> Future for PendingResult<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        Pin::new(&mut self.recv)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(Cancelled.into())))
    }
}


#[cfg(test)]
#[derive(Debug, PartialEq)]
enum TestError {
    Cancelled,
    Failed,
}

#[cfg(test)]
impl From<Cancelled> for TestError {
    fn from(_: Cancelled) -> Self {
        TestError::Cancelled
    }
}

#[test]
fn test_resolve_and_fail() {
    let (completer, mut result) = pending::<u32, TestError>();
    assert_eq!(result.try_take(), None);
    completer.resolve(7);
    assert_eq!(result.try_take(), Some(Ok(7)));

    let (completer, mut result) = pending::<u32, TestError>();
    completer.fail(TestError::Failed);
    assert_eq!(result.try_take(), Some(Err(TestError::Failed)));
}

#[test]
fn test_dropped_completer_cancels() {
    let (completer, mut result) = pending::<(), TestError>();
    drop(completer);
    assert_eq!(result.try_take(), Some(Err(TestError::Cancelled)));
}

#[test]
fn test_cancel_is_visible_to_completer() {
    let (completer, mut result) = pending::<(), TestError>();
    assert!(!completer.is_cancelled());
    result.cancel();
    assert!(completer.is_cancelled());
    completer.resolve(());
    assert_eq!(result.try_take(), Some(Err(TestError::Cancelled)));
}

#[test]
fn test_cancel_after_resolve_keeps_value() {
    let (completer, mut result) = pending::<u32, TestError>();
    completer.resolve(3);
    result.cancel();
    assert_eq!(result.try_take(), Some(Ok(3)));
}

#[tokio::test]
async fn test_await() {
    let (completer, result) = pending::<u32, TestError>();
    tokio::spawn(async move {
        completer.resolve(5);
    });
    assert_eq!(result.await, Ok(5));

    assert_eq!(PendingResult::<u32, TestError>::ready(Err(TestError::Failed)).await, Err(TestError::Failed));
}
