use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUESTIONS_CREATED: Counter = register_counter!(
        "trivia_questions_created_total",
        "Number of questions added through the API"
    )
    .unwrap();
    pub static ref QUESTIONS_DELETED: Counter = register_counter!(
        "trivia_questions_deleted_total",
        "Number of questions removed through the API"
    )
    .unwrap();
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of questions handed out to quiz rounds",
        &["category"]
    )
    .unwrap();
}

/// Installs the global subscriber. `.env` is read first so `LOG_LEVEL` and
/// `INCLUDE_SPAN_EVENTS` may live there too.
pub fn init_tracing() {
    dotenv::dotenv().ok();
    let span_events = span_events(std::env::var("INCLUDE_SPAN_EVENTS").ok().as_deref());
    let filter = log_filter(std::env::var("LOG_LEVEL").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_span_events(span_events))
        .init();
}

fn span_events(flag: Option<&str>) -> FmtSpan {
    match flag {
        Some(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    }
}

/// Falls back to `info` when the level is unset or does not parse.
fn log_filter(level: Option<&str>) -> EnvFilter {
    level
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn span_events_are_opt_in() {
        assert_eq!(span_events(None), FmtSpan::NONE);
        assert_eq!(span_events(Some("no")), FmtSpan::NONE);
        assert_eq!(span_events(Some("TRUE")), FmtSpan::ENTER | FmtSpan::EXIT);
    }

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
