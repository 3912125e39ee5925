//! Shared fixtures for unit tests.

use std::io::Write;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use foxcloud_common::{FixedClock, ServiceAccount, TokenIssuer};
use once_cell::sync::Lazy;
use serde_json::json;

// Key generation is expensive; one pair per test binary.
static KEY_PAIR: Lazy<(String, String)> = Lazy::new(|| {
    let mut issuer = TokenIssuer::builder().build();
    issuer.generate_keys(2048).unwrap();
    (issuer.private_key().unwrap().to_string(), issuer.public_key().unwrap().to_string())
});

pub(crate) fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()))
}

pub(crate) fn test_account() -> Arc<ServiceAccount> {
    let document = json!({
        "type": "service_account",
        "project_id": "demo-project",
        "private_key_id": "key-1",
        "private_key": KEY_PAIR.0,
        "public_key": KEY_PAIR.1,
        "client_email": "svc@demo-project.iam.gserviceaccount.com",
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(document.to_string().as_bytes()).unwrap();
    ServiceAccount::from_file_with_clock(file.path(), fixed_clock()).unwrap()
}
