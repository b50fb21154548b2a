use club_domain::config::{ApiConfig, AuditConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 8000);
    assert!(server.address.is_unspecified());
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "club");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_none());
    assert!(!db.seed);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.directory.is_none());

    assert_eq!(AuditConfig::default().capacity, 100);
}

#[test]
fn api_config_deserializes_partial_documents() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "ws://localhost:8001", "credentials": { "username": "root", "password": "secret" }, "seed": true },
        "logging": { "level": "debug", "json": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.url, "ws://localhost:8001");
    assert_eq!(cfg.database.namespace, "club");
    assert_eq!(cfg.database.credentials.as_ref().map(|c| c.password.as_str()), Some("secret"));
    assert!(cfg.database.seed);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert_eq!(cfg.audit.capacity, 100);
}

#[test]
fn api_config_clones_share_until_mutated() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 8000);
    assert_eq!(changed.server.port, 9000);
}
