use std::time::SystemTime;

use tracing_subscriber::EnvFilter;
use wiring::*;

// Define regular structs, with injected properties kept in slots

#[derive(Default)]
struct Logger;

impl Logger {
    fn log(&self, content: &str) {
        println!("{}", content);
    }
}
injectable!(Logger);

/// Common base of the loggers
#[derive(Default)]
struct Reporter {
    logger: Slot<Logger>,
}

impl Reporter {
    fn report(&self, content: &str) {
        if let Some(logger) = self.logger.get() {
            logger.read().log(content);
        }
    }
}
injectable!(Reporter, logger);

#[derive(Default)]
struct DateLogger {
    reporter: Reporter,
}

impl DateLogger {
    fn log_date(&self) {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.reporter.report(&format!("{}s since epoch", secs));
    }
}
injectable!(DateLogger: Reporter => reporter;);

fn main() -> Result<(), WiringError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Setup: register the types on the default container, then declare the injections
    global::register::<Logger>();
    global::register::<DateLogger>();
    global::inject::<Reporter, Logger>("logger");

    let b = global::get::<DateLogger>()?;
    b.read().log_date();

    Ok(())
}
