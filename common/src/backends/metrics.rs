use std::collections::HashMap;
use std::convert::Infallible;
use std::marker::PhantomData;
use std::time::Duration;

use axum::body::{Body, BoxBody};
use axum::extract::{FromRequestParts, Path};
use axum::http::{request::Parts, Request, Response};
use opentelemetry::global;
use opentelemetry_http::HeaderExtractor;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::DefaultOnRequest;
use tracing::{debug, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Records every path parameter of the matched route as a
/// `request.params.<param>` field on the current request span. The span
/// maker has to declare those fields upfront for the record to stick, see
/// the `request_span!` macro.
pub struct Metrics;

#[axum::async_trait]
impl<S> FromRequestParts<S> for Metrics
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(path): Path<HashMap<String, String>> =
            match Path::from_request_parts(parts, state).await {
                Ok(path) => path,
                Err(_) => return Ok(Metrics),
            };

        let span = Span::current();

        for (param, value) in path {
            span.record(format!("request.params.{param}").as_str(), value);
        }
        Ok(Metrics)
    }
}

type MakeSpanFn = fn(&Request<Body>) -> Span;

/// Builder for the request tracing layer. Construct it with the function
/// that makes the request span, pick whether to pull a propagation context
/// out of the request headers, then [`build`](TraceLayer::build).
pub struct TraceLayer<MakeSpan = MakeSpanSimple> {
    make_span: MakeSpanFn,
    make_span_type: PhantomData<MakeSpan>,
}

impl TraceLayer<MakeSpanSimple> {
    pub fn new(make_span: MakeSpanFn) -> Self {
        Self {
            make_span,
            make_span_type: PhantomData,
        }
    }

    /// Keep the span maker that ignores propagation headers.
    pub fn without_propagation(self) -> Self {
        self
    }

    /// Switch to the span maker that extracts a parent context from the
    /// request headers.
    pub fn with_propagation(self) -> TraceLayer<MakeSpanPropagation> {
        TraceLayer {
            make_span: self.make_span,
            make_span_type: PhantomData,
        }
    }
}

impl<MakeSpan: tower_http::trace::MakeSpan<Body> + MakeSpanBuilder> TraceLayer<MakeSpan> {
    /// Build the configured tracing layer
    pub fn build(
        self,
    ) -> tower_http::trace::TraceLayer<
        SharedClassifier<ServerErrorsAsFailures>,
        MakeSpan,
        DefaultOnRequest,
        OnResponseStatusCode,
    > {
        tower_http::trace::TraceLayer::new_for_http()
            .make_span_with(MakeSpan::new(self.make_span))
            .on_response(OnResponseStatusCode)
    }
}

/// Helper trait to construct the span makers from the user's function
pub trait MakeSpanBuilder {
    fn new(make_span: MakeSpanFn) -> Self;
}

/// Span maker which only calls the user's function
#[derive(Clone)]
pub struct MakeSpanSimple {
    make_span: MakeSpanFn,
}

impl MakeSpanBuilder for MakeSpanSimple {
    fn new(make_span: MakeSpanFn) -> Self {
        Self { make_span }
    }
}

impl tower_http::trace::MakeSpan<Body> for MakeSpanSimple {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        (self.make_span)(request)
    }
}

/// Span maker which also sets the parent context extracted from the request
/// headers on the new span
#[derive(Clone)]
pub struct MakeSpanPropagation {
    make_span: MakeSpanFn,
}

impl MakeSpanBuilder for MakeSpanPropagation {
    fn new(make_span: MakeSpanFn) -> Self {
        Self { make_span }
    }
}

impl tower_http::trace::MakeSpan<Body> for MakeSpanPropagation {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        let span = (self.make_span)(request);

        let parent_context = global::get_text_map_propagator(|propagator| {
            propagator.extract(&HeaderExtractor(request.headers()))
        });
        span.set_parent(parent_context);

        span
    }
}

/// Records the status code of the response on the request span and logs out
/// timing info
#[derive(Clone)]
pub struct OnResponseStatusCode;

impl tower_http::trace::OnResponse<BoxBody> for OnResponseStatusCode {
    fn on_response(self, response: &Response<BoxBody>, latency: Duration, span: &Span) {
        span.record("http.status_code", response.status().as_u16());
        debug!(
            latency = format_args!("{} ns", latency.as_nanos()),
            "finished processing request"
        );
    }
}
