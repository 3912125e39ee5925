//! Shared fixtures for infra integration tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use foxcloud_common::{FixedClock, ServiceAccount, TokenIssuer};
use once_cell::sync::Lazy;
use serde_json::json;

// Key generation is expensive; one pair per test binary.
static KEY_PAIR: Lazy<(String, String)> = Lazy::new(|| {
    let mut issuer = TokenIssuer::builder().build();
    issuer.generate_keys(2048).expect("failed to generate test key pair");
    (
        issuer.private_key().unwrap().to_string(),
        issuer.public_key().unwrap().to_string(),
    )
});

/// Clock pinned at 2030-01-01T00:00:00Z.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()))
}

/// Service account for `demo-project` with a working signing key, bound to
/// the given clock.
pub fn test_account(clock: Arc<FixedClock>) -> Arc<ServiceAccount> {
    let document = json!({
        "type": "service_account",
        "project_id": "demo-project",
        "private_key_id": "key-1",
        "private_key": KEY_PAIR.0,
        "public_key": KEY_PAIR.1,
        "client_email": "svc@demo-project.iam.gserviceaccount.com",
    });
    let mut file = tempfile::NamedTempFile::new().expect("failed to create credentials file");
    file.write_all(document.to_string().as_bytes()).expect("failed to write credentials");
    ServiceAccount::from_file_with_clock(file.path(), clock)
        .expect("failed to load test service account")
}

/// Flat string map from pairs; keeps test bodies short.
pub fn attributes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
