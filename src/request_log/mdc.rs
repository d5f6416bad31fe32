//! Thread-local diagnostic context for deferred emission.
//!
//! Access log events are emitted after the request handling scope has
//! already unwound, so whatever correlation id that scope had set is
//! gone. [`scoped`] puts a value back for the duration of the emission
//! and takes it away again when the returned guard drops, including
//! on unwind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Key under which the correlation id is published.
pub const REQUEST_ID_KEY: &str = "requestId";

thread_local! {
    static CONTEXT: RefCell<HashMap<&'static str, String>> = RefCell::new(HashMap::new());
}

/// Set `key` on the current thread, returning the previous value.
pub fn put(key: &'static str, value: impl Into<String>) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow_mut().insert(key, value.into()))
}

/// Read `key` on the current thread.
pub fn get(key: &str) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow().get(key).cloned())
}

/// Remove `key` on the current thread.
pub fn remove(key: &str) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow_mut().remove(key))
}

/// Set `key` until the guard is dropped.
#[must_use = "the value is removed as soon as the guard is dropped"]
pub fn scoped(key: &'static str, value: impl Into<String>) -> MdcGuard {
    let previous = put(key, value);
    MdcGuard {
        key,
        previous,
        _not_send: PhantomData,
    }
}

/// Restores the previous value of its key (or removes it) on drop.
///
/// Not `Send`: the value lives in the creating thread's context.
pub struct MdcGuard {
    key: &'static str,
    previous: Option<String>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for MdcGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => {
                put(self.key, previous);
            }
            None => {
                remove(self.key);
            }
        }
    }
}
