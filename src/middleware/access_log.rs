//! Request log middleware.
//!
//! Records the request snapshot on the way in and runs the
//! [`RequestLog`] pipeline on the way out, once per request.

use std::sync::Arc;

use tracing::error;

use super::Middleware;
use crate::core::{Context, Error, Request, Response};
use crate::request_log::RequestLog;

const REQUEST_CTX: &str = "request_log.request";

pub struct RequestLogMiddleware {
    log: Arc<RequestLog>,
}

impl RequestLogMiddleware {
    pub fn new(log: Arc<RequestLog>) -> Self {
        Self { log }
    }

    fn log_exchange(&self, res: &Response, ctx: &Context) -> crate::core::Result<()> {
        let req = ctx
            .get::<Request>(REQUEST_CTX)
            .ok_or(Error::MissingRequest(self.name()))?;
        self.log.log(req, res);
        Ok(())
    }
}

impl Middleware for RequestLogMiddleware {
    fn name(&self) -> &'static str {
        "request_log"
    }

    fn priority(&self) -> i32 {
        -90 // Sees the final response
    }

    fn on_request(&self, req: &Request, ctx: &mut Context) {
        ctx.set(REQUEST_CTX, req.clone());
    }

    fn on_response(&self, res: Response, ctx: &Context) -> Response {
        if let Err(e) = self.log_exchange(&res, ctx) {
            error!(error = %e, "Request log skipped");
        }
        res
    }
}
