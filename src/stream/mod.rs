//! Push-based event streams.
//!
//! A small, single-threaded stream runtime in the spirit of the reactive
//! primitives the components are built from. Every emission is delivered
//! synchronously to the current listeners in subscription order; there is no
//! scheduler and nothing ever blocks.
//!
//! # Lifecycle
//!
//! Streams built with [`Stream::create`] are lazy: the producer starts when the
//! first listener subscribes and stops (running its [`Cleanup`]) when the last
//! listener leaves. A stream that delivers `Complete` or `Error` is ended for
//! good: its listeners are dropped, its producer is released and late
//! subscribers only see `Complete`.
//!
//! ```ignore
//! let clicks = Subject::new();
//! let labels = clicks.stream().map(|n: u32| format!("click {n}"));
//!
//! let sub = labels.subscribe(|emission| println!("{emission:?}"));
//! clicks.next(1); // Next("click 1")
//! drop(sub);      // producer stops, upstream subscription released
//! ```
//!
//! # Memory
//!
//! Remembered streams (see [`Stream::remember`] and [`Stream::fold`]) replay
//! their latest value to each new listener. The memory is cleared whenever the
//! producer stops.

mod operators;
mod proxy;

pub use proxy::ProxyStream;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::FolderError;

/// Cleanup function returned by producers and subscriptions.
pub type Cleanup = Box<dyn FnOnce()>;

pub(crate) fn noop() -> Cleanup {
    Box::new(|| {})
}

/// One signal delivered to a listener.
#[derive(Clone, Debug, PartialEq)]
pub enum Emission<T> {
    Next(T),
    Error(FolderError),
    Complete,
}

impl<T> Emission<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Next(_))
    }
}

// =============================================================================
// Core
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Ended,
}

type Producer<T> = Box<dyn FnMut(Sink<T>) -> Cleanup>;

struct ListenerSlot<T: 'static> {
    id: u64,
    active: Cell<bool>,
    callback: RefCell<Box<dyn FnMut(Emission<T>)>>,
    pending: RefCell<VecDeque<Emission<T>>>,
}

impl<T: 'static> ListenerSlot<T> {
    /// Call the listener. An emission that arrives while the listener is
    /// still running is queued and delivered as soon as that call returns.
    fn deliver(&self, emission: Emission<T>) {
        if !self.active.get() {
            return;
        }
        let Ok(mut callback) = self.callback.try_borrow_mut() else {
            trace!(listener = self.id, "re-entrant emission queued");
            self.pending.borrow_mut().push_back(emission);
            return;
        };

        let mut next = Some(emission);
        while let Some(emission) = next.take() {
            if !self.active.get() {
                break;
            }
            let terminal = emission.is_terminal();
            (&mut *callback)(emission);
            if terminal {
                self.active.set(false);
            }
            next = self.pending.borrow_mut().pop_front();
        }
    }
}

struct StreamCore<T: 'static> {
    listeners: RefCell<Vec<Rc<ListenerSlot<T>>>>,
    producer: RefCell<Option<Producer<T>>>,
    teardown: RefCell<Option<Cleanup>>,
    phase: Cell<Phase>,
    remember: bool,
    memory: RefCell<Option<T>>,
    next_listener: Cell<u64>,
}

impl<T: Clone + 'static> StreamCore<T> {
    fn new(producer: Option<Producer<T>>, remember: bool) -> Rc<Self> {
        Rc::new(Self {
            listeners: RefCell::new(Vec::new()),
            producer: RefCell::new(producer),
            teardown: RefCell::new(None),
            phase: Cell::new(Phase::Idle),
            remember,
            memory: RefCell::new(None),
            next_listener: Cell::new(0),
        })
    }

    fn add_listener(self: &Rc<Self>, mut callback: Box<dyn FnMut(Emission<T>)>) -> Option<u64> {
        if self.phase.get() == Phase::Ended {
            callback(Emission::Complete);
            return None;
        }

        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        let slot = Rc::new(ListenerSlot {
            id,
            active: Cell::new(true),
            callback: RefCell::new(callback),
            pending: RefCell::new(VecDeque::new()),
        });
        self.listeners.borrow_mut().push(Rc::clone(&slot));

        if self.remember {
            let last = self.memory.borrow().clone();
            if let Some(value) = last {
                slot.deliver(Emission::Next(value));
            }
        }

        if self.phase.get() == Phase::Idle {
            self.start();
        }
        Some(id)
    }

    fn remove_listener(self: &Rc<Self>, id: u64) {
        let now_empty = {
            let mut listeners = self.listeners.borrow_mut();
            if let Some(position) = listeners.iter().position(|slot| slot.id == id) {
                let slot = listeners.remove(position);
                slot.active.set(false);
            }
            listeners.is_empty()
        };
        if now_empty && self.phase.get() == Phase::Running {
            self.stop();
        }
    }

    fn start(self: &Rc<Self>) {
        let producer = self.producer.borrow_mut().take();
        let Some(mut producer) = producer else { return };

        self.phase.set(Phase::Running);
        let teardown = producer(Sink { core: Rc::downgrade(self) });

        // The producer may have stopped or ended the stream while starting.
        match self.phase.get() {
            Phase::Running => {
                *self.teardown.borrow_mut() = Some(teardown);
                *self.producer.borrow_mut() = Some(producer);
            }
            Phase::Idle => {
                *self.producer.borrow_mut() = Some(producer);
                teardown();
            }
            Phase::Ended => {
                drop(producer);
                teardown();
            }
        }
    }

    fn stop(&self) {
        self.phase.set(Phase::Idle);
        let memory = self.memory.borrow_mut().take();
        drop(memory);
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    fn emit(self: &Rc<Self>, emission: Emission<T>) {
        if self.phase.get() == Phase::Ended {
            return;
        }
        let terminal = emission.is_terminal();
        if terminal {
            self.phase.set(Phase::Ended);
        }
        if self.remember {
            if let Emission::Next(value) = &emission {
                let previous = self.memory.replace(Some(value.clone()));
                drop(previous);
            }
        }

        // Snapshot so listeners may subscribe/unsubscribe while we deliver.
        let listeners: Vec<Rc<ListenerSlot<T>>> = self.listeners.borrow().clone();
        for slot in listeners {
            slot.deliver(emission.clone());
        }

        if terminal {
            self.finish();
        }
    }

    fn finish(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for slot in &listeners {
            slot.active.set(false);
        }
        drop(listeners);

        let producer = self.producer.borrow_mut().take();
        drop(producer);
        let memory = self.memory.borrow_mut().take();
        drop(memory);

        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }
}

// =============================================================================
// Stream
// =============================================================================

/// A multicast, push-based stream of `T`.
///
/// Cloning a `Stream` yields another handle to the same stream.
pub struct Stream<T: 'static> {
    core: Rc<StreamCore<T>>,
}

impl<T: 'static> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self { core: Rc::clone(&self.core) }
    }
}

impl<T: 'static> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("phase", &self.core.phase.get())
            .field("listeners", &self.core.listeners.borrow().len())
            .field("remember", &self.core.remember)
            .finish()
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Create a lazy stream from a producer.
    ///
    /// The producer runs each time the stream goes from zero to one listener
    /// and returns the cleanup to run when it goes back to zero.
    pub fn create(producer: impl FnMut(Sink<T>) -> Cleanup + 'static) -> Self {
        Self { core: StreamCore::new(Some(Box::new(producer)), false) }
    }

    /// Like [`Stream::create`], but the stream replays its latest value to
    /// new listeners.
    pub fn create_remembered(producer: impl FnMut(Sink<T>) -> Cleanup + 'static) -> Self {
        Self { core: StreamCore::new(Some(Box::new(producer)), true) }
    }

    /// A stream that never emits and never ends.
    pub fn never() -> Self {
        Self { core: StreamCore::new(None, false) }
    }

    /// Add a listener. The returned [`Subscription`] removes it when dropped.
    pub fn subscribe(&self, listener: impl FnMut(Emission<T>) + 'static) -> Subscription {
        match self.core.add_listener(Box::new(listener)) {
            Some(id) => {
                let core = Rc::clone(&self.core);
                Subscription::new(move || core.remove_listener(id))
            }
            None => Subscription::empty(),
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.core.listeners.borrow().len()
    }

    /// Whether the producer is currently running.
    pub fn is_running(&self) -> bool {
        self.core.phase.get() == Phase::Running
    }

    /// Whether the stream has completed or failed.
    pub fn is_ended(&self) -> bool {
        self.core.phase.get() == Phase::Ended
    }

    /// Latest remembered value, if this is a remembered stream that holds one.
    pub fn last(&self) -> Option<T> {
        self.core.memory.borrow().clone()
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Emitting end handed to producers.
///
/// Holds the stream weakly, so an abandoned stream is not kept alive by
/// its upstream listeners.
pub struct Sink<T: 'static> {
    core: Weak<StreamCore<T>>,
}

impl<T: 'static> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self { core: Weak::clone(&self.core) }
    }
}

impl<T: Clone + 'static> Sink<T> {
    pub fn send(&self, emission: Emission<T>) {
        if let Some(core) = self.core.upgrade() {
            core.emit(emission);
        }
    }

    pub fn next(&self, value: T) {
        self.send(Emission::Next(value));
    }

    pub fn error(&self, error: FolderError) {
        self.send(Emission::Error(error));
    }

    pub fn complete(&self) {
        self.send(Emission::Complete);
    }

    /// True once the stream is gone or ended.
    pub fn is_closed(&self) -> bool {
        self.core
            .upgrade()
            .map_or(true, |core| core.phase.get() == Phase::Ended)
    }
}

// =============================================================================
// Subject
// =============================================================================

/// A hot stream fed imperatively.
///
/// Used for interaction sources and kill switches.
pub struct Subject<T: 'static> {
    stream: Stream<T>,
}

impl<T: 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self { stream: self.stream.clone() }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new() -> Self {
        Self { stream: Stream::never() }
    }

    pub fn stream(&self) -> Stream<T> {
        self.stream.clone()
    }

    pub fn next(&self, value: T) {
        self.stream.core.emit(Emission::Next(value));
    }

    pub fn error(&self, error: FolderError) {
        self.stream.core.emit(Emission::Error(error));
    }

    pub fn complete(&self) {
        self.stream.core.emit(Emission::Complete);
    }

    pub fn listener_count(&self) -> usize {
        self.stream.listener_count()
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle for an attached listener. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Cleanup>,
}

impl Subscription {
    fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Turn the subscription into a producer cleanup.
    pub fn into_cleanup(self) -> Cleanup {
        Box::new(move || drop(self))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.release.is_some())
            .finish()
    }
}

// =============================================================================
// Test helpers
// =============================================================================
