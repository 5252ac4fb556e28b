use sugarlog::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerConfig::new([
        log_file("logs/app.log"),
        max_size(1),
        max_backups(3),
        max_age(7),
        log_utc(false),
    ])
    .build()?;

    logger.info("Logging to file with size-based rotation");

    // Simulate application
    let batch = "x".repeat(64 * 1024);
    for i in 0..40 {
        logger.info_with(
            "Processing batch",
            &Fields::new().with("iteration", i).with("payload", &batch),
        );
    }

    // Dropping the logger flushes the background writer
    drop(logger);
    Ok(())
}
