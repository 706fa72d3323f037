//! Request tracing middleware.
//!
//! Every request runs inside a fresh [`TraceId`] scope and a `request` span;
//! the identifier is echoed back in the `trace-id` response header.

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use tracing::{Instrument, debug, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware function for `actix_web::middleware::from_fn`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use actix_web::middleware::from_fn;
/// use intake::inbound::http::trace::trace_requests;
///
/// let _app = App::new().wrap(from_fn(trace_requests));
/// ```
pub async fn trace_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let trace_id = TraceId::generate();
    let span = info_span!(
        "request",
        %trace_id,
        method = %req.method(),
        path = %req.path(),
    );

    let mut response = TraceId::scope(trace_id, next.call(req))
        .instrument(span.clone())
        .await?;

    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => {
            error!(parent: &span, %error, "failed to encode trace identifier header");
        }
    }
    debug!(parent: &span, status = response.status().as_u16(), "request completed");
    Ok(response)
}
