//! Proxy streams - consumers first, producer later.
//!
//! A [`ProxyStream`] can be subscribed to before the stream it stands for can
//! be built. Once that source exists, [`ProxyStream::imitate`] binds it and
//! every emission from the source flows through the proxy. This is what lets a
//! folder's intent listen to its children's actions even though the children
//! only come into existence while processing that same intent.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::{Sink, Stream, Subscription};
use crate::error::FolderError;

struct ProxyState<T: 'static> {
    target: Option<Stream<T>>,
    sink: Option<Sink<T>>,
    link: Option<Subscription>,
}

/// Placeholder stream bound to its real source after construction.
pub struct ProxyStream<T: 'static> {
    stream: Stream<T>,
    state: Rc<RefCell<ProxyState<T>>>,
}

impl<T: Clone + 'static> Default for ProxyStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> ProxyStream<T> {
    pub fn new() -> Self {
        let state = Rc::new(RefCell::new(ProxyState { target: None, sink: None, link: None }));
        let producer_state = Rc::clone(&state);
        let stream = Stream::create(move |sink: Sink<T>| {
            producer_state.borrow_mut().sink = Some(sink);
            connect(&producer_state);

            let state = Rc::clone(&producer_state);
            Box::new(move || {
                let link = {
                    let mut state = state.borrow_mut();
                    state.sink = None;
                    state.link.take()
                };
                drop(link);
            })
        });
        Self { stream, state }
    }

    /// The placeholder side. Safe to subscribe before [`imitate`](Self::imitate).
    pub fn stream(&self) -> Stream<T> {
        self.stream.clone()
    }

    /// Bind the real source. A proxy imitates exactly one source.
    pub fn imitate(&self, target: &Stream<T>) -> Result<(), FolderError> {
        {
            let mut state = self.state.borrow_mut();
            if state.target.is_some() {
                return Err(FolderError::ProxyAlreadyBound);
            }
            state.target = Some(target.clone());
        }
        connect(&self.state);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.state.borrow().target.is_some()
    }
}

/// Attach the source once both the source and a running proxy exist.
fn connect<T: Clone + 'static>(state: &Rc<RefCell<ProxyState<T>>>) {
    let (target, sink) = {
        let state = state.borrow();
        if state.link.is_some() {
            return;
        }
        match (&state.target, &state.sink) {
            (Some(target), Some(sink)) => (target.clone(), sink.clone()),
            _ => return,
        }
    };

    trace!("proxy bound to source");
    let link = target.subscribe(move |emission| sink.send(emission));
    let previous = state.borrow_mut().link.replace(link);
    drop(previous);
}

#[cfg(test)]
mod tests {
    use super::super::testing::Recorder;
    use super::super::Subject;
    use super::*;

    #[test]
    fn test_subscribe_before_imitate() {
        let proxy: ProxyStream<u32> = ProxyStream::new();
        let recorder = Recorder::attach(&proxy.stream());

        let source = Subject::new();
        proxy.imitate(&source.stream()).unwrap();
        source.next(4);

        assert_eq!(recorder.values(), vec![4]);
        assert!(proxy.is_bound());
    }

    #[test]
    fn test_imitate_twice_is_rejected() {
        let proxy: ProxyStream<u32> = ProxyStream::new();
        let source: Subject<u32> = Subject::new();

        assert!(proxy.imitate(&source.stream()).is_ok());
        assert_eq!(proxy.imitate(&source.stream()), Err(FolderError::ProxyAlreadyBound));
    }

    #[test]
    fn test_source_released_when_proxy_stops() {
        let proxy: ProxyStream<u32> = ProxyStream::new();
        let source: Subject<u32> = Subject::new();
        proxy.imitate(&source.stream()).unwrap();

        let recorder = Recorder::attach(&proxy.stream());
        assert_eq!(source.listener_count(), 1);
        drop(recorder);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_cycle_through_proxy() {
        // counter = fold(merge(clicks, echo)), echo = counter mapped back in
        let proxy: ProxyStream<u32> = ProxyStream::new();
        let clicks: Subject<u32> = Subject::new();
        let counter = Stream::merge(vec![clicks.stream(), proxy.stream()]).fold(0, |acc, n| acc + n);
        proxy.imitate(&counter.filter(|n| *n == 1).map_to(10)).unwrap();

        let recorder = Recorder::attach(&counter);
        clicks.next(1);

        assert_eq!(recorder.values(), vec![0, 1, 11], "feedback arrives in the same pass");
    }
}
