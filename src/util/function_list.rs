//! A prioritized list of functions, run in order over a shared argument.
//!
//! This is how the input and output jax run their pre- and post-filters. A filter may
//!   - let the chain go on ([`FilterResult::Continue`]),
//!   - stop it ([`FilterResult::Stop`]), which makes the whole chain report `false`,
//!   - or report that it is waiting on a resource ([`FilterResult::Pending`]).
//!
//! [`FunctionList::execute`] ignores pending results. [`FunctionList::async_execute`] suspends on
//! them, returning an [`Execution::Pending`] that records where to pick up. Once the resource is
//! available the caller continues with [`FunctionList::resume`].

use crate::error::{Error, ResourceRequest, Result};
use super::prioritized::{PrioritizedList, ItemId, DEFAULT_PRIORITY};

/// What a filter function tells the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    Continue,
    Stop,
    Pending(ResourceRequest),
}

impl From<bool> for FilterResult {
    fn from(go_on: bool) -> Self {
        if go_on { FilterResult::Continue } else { FilterResult::Stop }
    }
}

impl From<()> for FilterResult {
    fn from(_: ()) -> Self {
        FilterResult::Continue
    }
}

/// State of a (possibly suspended) run of the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    /// Every function ran (`true`), or one of them stopped the chain (`false`)
    Done(bool),
    /// Waiting on `request`; call [`FunctionList::resume`] with `next` once it is loaded
    Pending { next: usize, request: ResourceRequest },
}

type Filter<A> = Box<dyn Fn(&mut A) -> FilterResult>;

/// Functions sorted by priority
pub struct FunctionList<A> {
    functions: PrioritizedList<Filter<A>>,
}

impl<A> Default for FunctionList<A> {
    fn default() -> Self {
        Self { functions: PrioritizedList::new() }
    }
}

impl<A> std::fmt::Debug for FunctionList<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionList({} functions)", self.functions.len())
    }
}

impl<A> FunctionList<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter at the given priority
    pub fn add<F, R>(&mut self, function: F, priority: i32) -> ItemId
    where
        F: Fn(&mut A) -> R + 'static,
        R: Into<FilterResult>,
    {
        self.functions.add(Box::new(move |args: &mut A| function(args).into()), priority)
    }

    /// Add a filter at [`DEFAULT_PRIORITY`]
    pub fn push<F, R>(&mut self, function: F) -> ItemId
    where
        F: Fn(&mut A) -> R + 'static,
        R: Into<FilterResult>,
    {
        self.add(function, DEFAULT_PRIORITY)
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.functions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Run every function in order. Returns `false` as soon as one of them stops the chain.
    pub fn execute(&self, args: &mut A) -> bool {
        for function in self.functions.iter() {
            if function(args) == FilterResult::Stop {
                return false;
            }
        }
        true
    }

    /// Run every function in order, suspending on the first pending result.
    pub fn async_execute(&self, args: &mut A) -> Execution {
        self.resume(args, 0)
    }

    /// Continue a suspended run, starting with function number `next`.
    pub fn resume(&self, args: &mut A, next: usize) -> Execution {
        let mut i = next;
        while let Some(function) = self.functions.get(i) {
            match function(args) {
                FilterResult::Continue         => (),
                FilterResult::Stop             => return Execution::Done(false),
                FilterResult::Pending(request) => return Execution::Pending { next: i + 1, request },
            }
            i += 1;
        }
        Execution::Done(true)
    }

    /// Drive [`FunctionList::async_execute`] to completion, calling `resolve` for every pending
    /// resource. A failure to resolve fails the whole run.
    pub fn async_execute_with<R>(&self, args: &mut A, mut resolve: R) -> Result<bool>
    where
        R: FnMut(&ResourceRequest) -> Result<()>,
    {
        let mut state = self.async_execute(args);
        loop {
            match state {
                Execution::Done(value) => return Ok(value),
                Execution::Pending { next, request } => {
                    resolve(&request).map_err(|err| match err {
                        Error::Retry(request) => Error::ResourceFailed(request),
                        other => other,
                    })?;
                    state = self.resume(args, next);
                },
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_stops_on_false() {
        let mut list: FunctionList<Vec<&'static str>> = FunctionList::new();
        list.add(|log: &mut Vec<_>| log.push("second"), 10);
        list.add(|log: &mut Vec<_>| { log.push("first"); true }, 1);
        list.add(|log: &mut Vec<_>| { log.push("stop"); false }, 20);
        list.add(|log: &mut Vec<_>| log.push("never"), 30);

        let mut log = vec![];
        assert!(!list.execute(&mut log));
        assert_eq!(log, vec!["first", "second", "stop"]);
    }

    #[test]
    fn async_execute_suspends_and_resumes() {
        let mut list: FunctionList<Vec<u32>> = FunctionList::new();
        list.push(|v: &mut Vec<u32>| v.push(1));
        list.push(|v: &mut Vec<u32>| {
            v.push(2);
            FilterResult::Pending(ResourceRequest::Named("font".into()))
        });
        list.push(|v: &mut Vec<u32>| v.push(3));

        let mut v = vec![];
        let state = list.async_execute(&mut v);
        assert_eq!(state, Execution::Pending { next: 2, request: ResourceRequest::Named("font".into()) });
        assert_eq!(v, vec![1, 2]);

        assert_eq!(list.resume(&mut v, 2), Execution::Done(true));
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn failed_resource_fails_the_chain() {
        let mut list: FunctionList<u32> = FunctionList::new();
        list.push(|_: &mut u32| FilterResult::Pending(ResourceRequest::Entities('z')));
        list.push(|n: &mut u32| *n += 1);

        let mut n = 0;
        let result = list.async_execute_with(&mut n, |req| Err(Error::Retry(req.clone())));
        assert!(matches!(result, Err(Error::ResourceFailed(ResourceRequest::Entities('z')))));
        assert_eq!(n, 0);

        let mut n = 0;
        assert!(list.async_execute_with(&mut n, |_| Ok(())).unwrap());
        assert_eq!(n, 1);
    }
}
