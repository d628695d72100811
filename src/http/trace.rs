use std::time::Duration;

use axum::{
	body::Body,
	http::{Request, Response},
};
use tower_http::{
	classify::{ServerErrorsAsFailures, SharedClassifier},
	trace::TraceLayer,
};

pub(crate) type Layer = TraceLayer<
	SharedClassifier<ServerErrorsAsFailures>,
	fn(&Request<Body>) -> tracing::Span,
	fn(&Request<Body>, &tracing::Span),
	fn(&Response<Body>, Duration, &tracing::Span),
>;

pub(crate) fn layer() -> Layer
{
	TraceLayer::new_for_http()
		.make_span_with(make_span as fn(&Request<Body>) -> tracing::Span)
		.on_request(on_request as fn(&Request<Body>, &tracing::Span))
		.on_response(on_response as fn(&Response<Body>, Duration, &tracing::Span))
}

fn make_span(_: &Request<Body>) -> tracing::Span
{
	tracing::info_span!(
		target: "steam_oid2_login::http",
		"request",
		req.method = tracing::field::Empty,
		req.path = tracing::field::Empty,
		res.status = tracing::field::Empty,
	)
}

fn on_request(req: &Request<Body>, span: &tracing::Span)
{
	span.record("req.method", tracing::field::debug(req.method()));
	span.record("req.path", req.uri().path());

	tracing::debug!(target: "steam_oid2_login::http", "starting to process request");
}

fn on_response(res: &Response<Body>, latency: Duration, span: &tracing::Span)
{
	span.record("res.status", res.status().as_u16());

	tracing::info!(target: "steam_oid2_login::http", ?latency, "finished processing request");
}
