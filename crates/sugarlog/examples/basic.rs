use sugarlog::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // JSON on stdout, UTC timestamps, debug and above
    let logger = LoggerConfig::new([log_utc(true), level(Level::Debug)]).build()?;

    logger.info_with("Server starting", &Fields::new().with("port", 8080));
    logger.debug_with("Debug information", &Fields::new().with("request_count", 42));
    logger.warn_with("Operation failed, retrying", &Fields::new().with("retry_count", 3));
    logger.error_with(
        "Database connection failed",
        &Fields::new().with("error_code", "DB_001"),
    );

    // Typed fields through the tracing macros
    logger.in_scope(|| {
        sugarlog::info!(port = 8080, "Listening");
    });

    Ok(())
}
