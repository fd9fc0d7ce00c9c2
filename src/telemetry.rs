use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

lazy_static! {
    pub static ref QUIZ_DRAWS: CounterVec = register_counter_vec!(
        "quiz_draws_total",
        "Number of quiz draws, by outcome",
        &["outcome"]
    )
    .unwrap();
}

/// Installs the global subscriber. `LOG_LEVEL` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Renders every registered metric in the Prometheus text format.
pub fn encode_metrics() -> Result<(Vec<u8>, String), prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buf = vec![];
    encoder.encode(&prometheus::gather(), &mut buf)?;
    Ok((buf, encoder.format_type().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_draws_show_up_in_export() {
        QUIZ_DRAWS.with_label_values(&["complete"]).inc();

        let (body, content_type) = encode_metrics().unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(text.contains("quiz_draws_total{outcome=\"complete\"}"));
    }
}
