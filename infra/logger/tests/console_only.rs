use club_logger::{LevelFilter, Logger};

#[test]
fn console_logger_has_no_file_writer() {
    let logger = Logger::builder("club-console-only")
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_file());
    assert!(logger.directory().is_none());
}
