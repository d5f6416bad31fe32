//! Host integration hooks around request handling.
//!
//! A middleware sees the request before the handler runs and the
//! response after it returns. The chain runs `on_request` in priority
//! order and `on_response` in reverse.
//!
//! ```text
//! Request → MW1.on_request → MW2.on_request → Handler
//!                                                ↓
//! Response ← MW1.on_response ← MW2.on_response ←─┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use request_log::middleware::{MiddlewareChain, RequestIdMiddleware, RequestLogMiddleware};
//!
//! let chain = MiddlewareChain::new()
//!     .with(RequestLogMiddleware::new(log))
//!     .with(RequestIdMiddleware);
//! ```

pub mod access_log;
pub mod request_id;

use std::sync::Arc;

pub use access_log::RequestLogMiddleware;
pub use request_id::RequestIdMiddleware;

use crate::core::{Context, Request, Response};

/// Trait for implementing middleware.
///
/// `on_request` observes the request and may leave values in the
/// [`Context`] for its own `on_response`.
pub trait Middleware: Send + Sync {
    /// Unique name for this middleware (used for logging/debugging).
    fn name(&self) -> &'static str;

    /// Lower values run first on the request and last on the response.
    fn priority(&self) -> i32 {
        0
    }

    fn on_request(&self, _req: &Request, _ctx: &mut Context) {}

    fn on_response(&self, res: Response, _ctx: &Context) -> Response {
        res
    }
}

/// Middleware sorted by priority.
#[derive(Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self.middlewares.sort_by_key(|m| m.priority());
        self
    }

    /// Middleware names in request order.
    pub fn names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub fn process_request(&self, req: &Request, ctx: &mut Context) {
        for mw in &self.middlewares {
            mw.on_request(req, ctx);
        }
    }

    pub fn process_response(&self, mut res: Response, ctx: &Context) -> Response {
        for mw in self.middlewares.iter().rev() {
            res = mw.on_response(res, ctx);
        }
        res
    }
}
