//! Tracing and OpenTelemetry setup.

use anyhow::Result;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_sdk::{
    trace::{Config, RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE: &str = "ecosim-server";

pub fn init_telemetry(otel_endpoint: Option<&str>) -> Result<()> {
    let sampler = match otel_endpoint {
        Some(_) => Sampler::AlwaysOn,
        None => Sampler::AlwaysOff,
    };

    let tracer_provider = TracerProvider::builder()
        .with_config(
            Config::default()
                .with_sampler(sampler)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![
                    KeyValue::new(SERVICE_NAME, SERVICE),
                    KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
                ])),
        )
        .build();

    global::set_tracer_provider(tracer_provider.clone());

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer(SERVICE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ecosim_server=debug,ecosim_world=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(telemetry_layer)
        .init();

    info!("{}", exporter_status(otel_endpoint));
    Ok(())
}

/// Spans are sampled when an endpoint is configured, but no exporter ships them.
fn exporter_status(otel_endpoint: Option<&str>) -> String {
    match otel_endpoint {
        Some(endpoint) => format!(
            "OpenTelemetry spans sampled for {endpoint} but not exported: no exporter installed"
        ),
        None => "OpenTelemetry disabled (no endpoint configured)".to_string(),
    }
}

pub fn shutdown_telemetry() {
    info!("Shutting down telemetry");
    global::shutdown_tracer_provider();
}
