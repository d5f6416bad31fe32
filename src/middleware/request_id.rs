//! Correlation id propagation.
//!
//! Every response leaves with an `OT-RequestId` header: the caller's id
//! when it sent a valid one, a fresh v4 UUID otherwise.

use uuid::Uuid;

use super::Middleware;
use crate::core::{Context, Request, Response};
use crate::request_log::fields::names;
use crate::request_log::try_parse_request_id;

/// Context key holding the request's correlation id.
pub const REQUEST_ID_CTX: &str = "request_id";

pub struct RequestIdMiddleware;

impl RequestIdMiddleware {
    fn resolve(req: &Request) -> Uuid {
        match try_parse_request_id(req.header(names::OT_REQUEST_ID.as_str())) {
            Ok(Some(id)) => id,
            Ok(None) => Uuid::new_v4(),
            Err(e) => {
                tracing::debug!(raw = %e.raw, "Replacing invalid incoming request id");
                Uuid::new_v4()
            }
        }
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn priority(&self) -> i32 {
        -50
    }

    fn on_request(&self, req: &Request, ctx: &mut Context) {
        ctx.set(REQUEST_ID_CTX, Self::resolve(req));
    }

    fn on_response(&self, mut res: Response, ctx: &Context) -> Response {
        // Handlers may already have answered with their own id
        if res.headers().contains_key(&*names::OT_REQUEST_ID) {
            return res;
        }
        if let Some(id) = ctx.get::<Uuid>(REQUEST_ID_CTX) {
            if let Ok(value) = id.to_string().parse() {
                res.headers_mut().insert(names::OT_REQUEST_ID.clone(), value);
            }
        }
        res
    }
}
