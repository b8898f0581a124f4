//! Stream operators.
//!
//! Every operator returns a lazy stream whose producer subscribes to its
//! inputs on start and releases them on stop. Errors are forwarded and end the
//! output stream.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Cleanup, Emission, Sink, Stream, Subscription, noop};
use crate::error::FolderError;

fn forward<T: Clone + 'static>(sink: Sink<T>) -> impl FnMut(Emission<T>) + 'static {
    move |emission| sink.send(emission)
}

impl<T: Clone + 'static> Stream<T> {
    pub fn map<U, F>(&self, f: F) -> Stream<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + 'static,
    {
        let upstream = self.clone();
        let f = Rc::new(f);
        Stream::create(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            upstream
                .subscribe(move |emission| match emission {
                    Emission::Next(value) => sink.next(f(value)),
                    Emission::Error(err) => sink.error(err),
                    Emission::Complete => sink.complete(),
                })
                .into_cleanup()
        })
    }

    pub fn map_to<U: Clone + 'static>(&self, value: U) -> Stream<U> {
        self.map(move |_| value.clone())
    }

    pub fn filter<P>(&self, predicate: P) -> Stream<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        Stream::create(move |sink: Sink<T>| {
            let predicate = Rc::clone(&predicate);
            upstream
                .subscribe(move |emission| match emission {
                    Emission::Next(value) => {
                        if predicate(&value) {
                            sink.next(value);
                        }
                    }
                    other => sink.send(other),
                })
                .into_cleanup()
        })
    }

    /// Emit the first `count` values, then complete.
    pub fn take(&self, count: usize) -> Stream<T> {
        let upstream = self.clone();
        Stream::create(move |sink: Sink<T>| {
            if count == 0 {
                sink.complete();
                return noop();
            }
            let mut remaining = count;
            upstream
                .subscribe(move |emission| match emission {
                    Emission::Next(value) => {
                        remaining -= 1;
                        sink.next(value);
                        if remaining == 0 {
                            sink.complete();
                        }
                    }
                    other => sink.send(other),
                })
                .into_cleanup()
        })
    }

    /// Emit every value and complete right after the first one matching
    /// `predicate` has been delivered.
    pub fn end_after<P>(&self, predicate: P) -> Stream<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        Stream::create(move |sink: Sink<T>| {
            let predicate = Rc::clone(&predicate);
            upstream
                .subscribe(move |emission| match emission {
                    Emission::Next(value) => {
                        let last = predicate(&value);
                        sink.next(value);
                        if last {
                            sink.complete();
                        }
                    }
                    other => sink.send(other),
                })
                .into_cleanup()
        })
    }

    /// Mirror this stream until `other` emits or completes.
    pub fn end_when<V: Clone + 'static>(&self, other: &Stream<V>) -> Stream<T> {
        let upstream = self.clone();
        let other = other.clone();
        Stream::create(move |sink: Sink<T>| {
            let stopper = sink.clone();
            let stop = other.subscribe(move |emission| match emission {
                Emission::Next(_) | Emission::Complete => stopper.complete(),
                Emission::Error(err) => stopper.error(err),
            });
            if sink.is_closed() {
                return stop.into_cleanup();
            }
            let mirror = upstream.subscribe(forward(sink));
            Box::new(move || {
                drop(mirror);
                drop(stop);
            })
        })
    }

    /// Accumulate values into a remembered stream. The seed is emitted first.
    pub fn fold<A, F>(&self, seed: A, f: F) -> Stream<A>
    where
        A: Clone + 'static,
        F: Fn(A, T) -> A + 'static,
    {
        self.try_fold(seed, move |acc, value| Ok(f(acc, value)))
    }

    /// Fallible [`Stream::fold`]: an `Err` from the reducer ends the stream
    /// with that error.
    pub fn try_fold<A, F>(&self, seed: A, f: F) -> Stream<A>
    where
        A: Clone + 'static,
        F: Fn(A, T) -> Result<A, FolderError> + 'static,
    {
        let upstream = self.clone();
        let f = Rc::new(f);
        Stream::create_remembered(move |sink: Sink<A>| {
            sink.next(seed.clone());
            if sink.is_closed() {
                return noop();
            }
            let f = Rc::clone(&f);
            let mut acc = Some(seed.clone());
            upstream
                .subscribe(move |emission| match emission {
                    Emission::Next(value) => {
                        let Some(current) = acc.take() else { return };
                        match f(current, value) {
                            Ok(next) => {
                                acc = Some(next.clone());
                                sink.next(next);
                            }
                            Err(err) => sink.error(err),
                        }
                    }
                    Emission::Error(err) => sink.error(err),
                    Emission::Complete => sink.complete(),
                })
                .into_cleanup()
        })
    }

    /// Replay the latest value to each new listener.
    pub fn remember(&self) -> Stream<T> {
        let upstream = self.clone();
        Stream::create_remembered(move |sink: Sink<T>| upstream.subscribe(forward(sink)).into_cleanup())
    }

    /// Interleave several streams. Completes once every input completed;
    /// an empty merge never emits.
    pub fn merge(streams: Vec<Stream<T>>) -> Stream<T> {
        Stream::create(move |sink: Sink<T>| {
            let open = Rc::new(Cell::new(streams.len()));
            let mut subscriptions = Vec::with_capacity(streams.len());
            for stream in &streams {
                if sink.is_closed() {
                    break;
                }
                let sink = sink.clone();
                let open = Rc::clone(&open);
                subscriptions.push(stream.subscribe(move |emission| match emission {
                    Emission::Next(value) => sink.next(value),
                    Emission::Error(err) => sink.error(err),
                    Emission::Complete => {
                        open.set(open.get().saturating_sub(1));
                        if open.get() == 0 {
                            sink.complete();
                        }
                    }
                }));
            }
            release_all(subscriptions)
        })
    }

    /// Latest value of every input, emitted whenever any input emits once all
    /// have emitted at least once. An empty combine emits `vec![]` on start.
    pub fn combine(streams: Vec<Stream<T>>) -> Stream<Vec<T>> {
        Stream::create(move |sink: Sink<Vec<T>>| {
            if streams.is_empty() {
                sink.next(Vec::new());
                return noop();
            }
            let latest: Rc<RefCell<Vec<Option<T>>>> = Rc::new(RefCell::new(vec![None; streams.len()]));
            let open = Rc::new(Cell::new(streams.len()));
            let mut subscriptions = Vec::with_capacity(streams.len());
            for (index, stream) in streams.iter().enumerate() {
                if sink.is_closed() {
                    break;
                }
                let sink = sink.clone();
                let latest = Rc::clone(&latest);
                let open = Rc::clone(&open);
                subscriptions.push(stream.subscribe(move |emission| match emission {
                    Emission::Next(value) => {
                        let ready = {
                            let mut slots = latest.borrow_mut();
                            slots[index] = Some(value);
                            slots.iter().cloned().collect::<Option<Vec<T>>>()
                        };
                        if let Some(values) = ready {
                            sink.next(values);
                        }
                    }
                    Emission::Error(err) => sink.error(err),
                    Emission::Complete => {
                        open.set(open.get().saturating_sub(1));
                        if open.get() == 0 {
                            sink.complete();
                        }
                    }
                }));
            }
            release_all(subscriptions)
        })
    }
}

impl<T: Clone + 'static> Stream<Stream<T>> {
    /// Follow the most recent inner stream.
    ///
    /// The new inner stream is attached before the previous one is released.
    /// Inner completions are ignored; the output completes with the outer
    /// stream.
    pub fn flatten(&self) -> Stream<T> {
        let outer = self.clone();
        Stream::create(move |sink: Sink<T>| {
            let current: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
            let slot = Rc::clone(&current);
            let outer_sink = sink.clone();
            let outer_subscription = outer.subscribe(move |emission| match emission {
                Emission::Next(inner) => {
                    let inner_sink = outer_sink.clone();
                    let subscription = inner.subscribe(move |emission| match emission {
                        Emission::Complete => {}
                        other => inner_sink.send(other),
                    });
                    let previous = slot.replace(Some(subscription));
                    drop(previous);
                }
                Emission::Error(err) => outer_sink.error(err),
                Emission::Complete => outer_sink.complete(),
            });
            Box::new(move || {
                drop(outer_subscription);
                let inner = current.take();
                drop(inner);
            })
        })
    }
}

fn release_all(subscriptions: Vec<Subscription>) -> Cleanup {
    Box::new(move || drop(subscriptions))
}
