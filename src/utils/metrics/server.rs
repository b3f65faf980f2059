//! Prometheus scrape endpoint.
//!
//! Serves `GET /metrics` in the text exposition format. The server runs next to the
//! monitor and is stopped together with it.

use actix_web::{
	middleware::{Compress, NormalizePath},
	web, App, HttpResponse, HttpServer, Responder,
};
use tracing::{error, info};

use crate::utils::metrics::gather_metrics;

/// Metrics endpoint handler
async fn metrics_handler() -> impl Responder {
	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Binds `bind_address` and returns the server future; nothing is served until it is
/// polled.
pub fn create_metrics_server(bind_address: String) -> std::io::Result<actix_web::dev::Server> {
	let server = HttpServer::new(|| {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(1)
	.disable_signals()
	.bind(&bind_address)?
	.shutdown_timeout(2)
	.run();

	info!(address = %bind_address, "Metrics server listening");
	Ok(server)
}
