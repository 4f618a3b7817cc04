use miette::{IntoDiagnostic, WrapErr};
use opentelemetry::InstrumentationScope;
use opentelemetry::trace::TracerProvider;
use opentelemetry_resource_detectors::{HostResourceDetector, OsResourceDetector};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::resource::{EnvResourceDetector, ResourceDetector};
use tracing::info;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Format, TracingConfig};

/// Returns a list of resource detectors to use to enrich OTel attributes.
fn otel_resource_detectors() -> Vec<Box<dyn ResourceDetector>> {
    vec![
        Box::new(EnvResourceDetector::default()),
        Box::new(OsResourceDetector),
        Box::new(HostResourceDetector::default()),
    ]
}

/// Installs the global tracing subscriber.
///
/// Log lines are written to stderr in the configured format. Spans are additionally exported over
/// OTLP when enabled.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global subscriber is already set.
pub fn try_init(tracing: &TracingConfig) -> miette::Result<()> {
    let telemetry_layer = if tracing.enabled {
        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .build()
            .into_diagnostic()
            .wrap_err("building otlp http exporter failed")?;
        let res_detectors = otel_resource_detectors();
        let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_batch_exporter(otlp_exporter)
            .with_resource(
                Resource::builder_empty()
                    .with_service_name(env!("CARGO_PKG_NAME"))
                    .with_detectors(&res_detectors)
                    .build(),
            )
            .build();
        let scope = InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_schema_url("https://opentelemetry.io/schema/1.0.0")
            .build();
        let tracer = provider.tracer_with_scope(scope);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    // stdout belongs to the console host's replies.
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let stderr_layer = match tracing.format {
        Format::Json => stderr_layer.json().boxed(),
        Format::Pretty => stderr_layer.pretty().boxed(),
        Format::Compact => stderr_layer.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sendlike=info".into()),
        )
        .with(telemetry_layer)
        .with(stderr_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("could not init registry")?;

    info!(format = ?tracing.format, otlp = tracing.enabled, "tracing initialized");

    Ok(())
}
