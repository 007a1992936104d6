//! Capability contract tests
//!
//! Drives the demo backend through the full user contract: lookup,
//! authentication, passive IP attribution, the information projection,
//! traffic aggregation, and every feature-gated mutator.

use usersuite_backend::SampleBackend;
use usersuite_core::config::SampleAccountConfig;
use usersuite_core::models::{Feature, IpLookup, Status};
use usersuite_core::traits::UserBackend;
use usersuite_core::AppError;

fn seed(uid: &str, id: i64, password: &str, ip: Option<&str>) -> SampleAccountConfig {
    SampleAccountConfig {
        uid: uid.to_string(),
        id,
        name: format!("Resident {}", uid),
        password: password.to_string(),
        mail: Some(format!("{}@forward.example.org", uid)),
        ip: ip.map(String::from),
        mac: Some("aa:bb:cc:dd:ee:ff".to_string()),
        address: Some("Wundtstraße 5, 03-22".to_string()),
    }
}

fn backend() -> SampleBackend {
    SampleBackend::from_config(
        "lab",
        "lab.example.org",
        &[
            seed("mmuster", 1337, "sicher", Some("141.30.224.10")),
            seed("nomad", 7, "wandern", None),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn get_returns_backend_fields() {
    let backend = backend();

    let user = backend.get("mmuster").await.unwrap();
    assert_eq!(user.uid, "mmuster");
    assert_eq!(user.id, 1337);
    assert_eq!(user.name, "Resident mmuster");
    assert_eq!(user.mail.as_deref(), Some("mmuster@forward.example.org"));
    assert_eq!(user.division, "lab");
}

#[tokio::test]
async fn get_missing_account_fails_with_user_not_found() {
    let backend = backend();

    let result = backend.get("ghost").await;
    assert!(matches!(result, Err(AppError::UserNotFound(uid)) if uid == "ghost"));
}

#[tokio::test]
async fn authenticate_distinguishes_unknown_account_from_wrong_password() {
    let backend = backend();

    assert!(matches!(
        backend.authenticate("ghost", "whatever").await,
        Err(AppError::UserNotFound(_))
    ));
    assert!(matches!(
        backend.authenticate("mmuster", "falsch").await,
        Err(AppError::PasswordInvalid)
    ));
}

#[tokio::test]
async fn authenticate_success_equals_get() {
    let backend = backend();

    let authenticated = backend.authenticate("mmuster", "sicher").await.unwrap();
    let fetched = backend.get("mmuster").await.unwrap();
    assert_eq!(authenticated, fetched);
}

#[tokio::test]
async fn from_ip_attributes_known_addresses_and_stays_neutral_otherwise() {
    let backend = backend();

    let lookup = backend
        .from_ip("141.30.224.10".parse().unwrap())
        .await
        .unwrap();
    let user = lookup.user().expect("address is registered");
    assert_eq!(user.uid, "mmuster");
    assert_eq!(user.ip, Some("141.30.224.10".parse().unwrap()));

    let lookup = backend.from_ip("10.9.9.9".parse().unwrap()).await.unwrap();
    assert_eq!(lookup, IpLookup::Anonymous);
}

#[tokio::test]
async fn info_projection_is_uniform() {
    let backend = backend();
    let user = backend.get("mmuster").await.unwrap();

    let info = backend.info(&user).await.unwrap();
    assert_eq!(info.uid.value.as_deref(), Some("mmuster"));
    assert_eq!(info.status.status, Status::Good);
    assert_eq!(info.ip.status, Status::Info);
    assert_eq!(info.mac.value.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
    // No hosting database provisioned yet.
    assert!(info.userdb.value.is_none());
}

#[tokio::test]
async fn traffic_covers_seven_days_and_credit_is_positive() {
    let backend = backend();
    let user = backend.get("mmuster").await.unwrap();

    let record = backend.traffic(&user).await.unwrap();
    assert_eq!(record.history.len(), 7);
    assert!(record.credit > 0.0);

    let credit = backend.current_credit(&user).await.unwrap();
    assert_eq!(credit, record.credit);
}

#[tokio::test]
async fn full_feature_set_supports_every_mutator() {
    let backend = backend();
    let user = backend.get("mmuster").await.unwrap();

    for feature in Feature::ALL {
        assert!(backend.features().contains(feature));
    }

    backend
        .change_mail(&user, Some("new@forward.example.org"))
        .await
        .unwrap();
    assert_eq!(
        backend.get("mmuster").await.unwrap().mail.as_deref(),
        Some("new@forward.example.org")
    );

    backend.change_mail(&user, None).await.unwrap();
    assert_eq!(backend.get("mmuster").await.unwrap().mail, None);

    backend
        .change_mac(&user, "00:11:22:33:44:55")
        .await
        .unwrap();
    let info = backend.info(&user).await.unwrap();
    assert_eq!(info.mac.value.as_deref(), Some("00:11:22:33:44:55"));
}

#[tokio::test]
async fn change_password_verifies_old_password_first() {
    let backend = backend();
    let user = backend.get("mmuster").await.unwrap();

    assert!(matches!(
        backend.change_password(&user, "falsch", "neu").await,
        Err(AppError::PasswordInvalid)
    ));

    backend
        .change_password(&user, "sicher", "nochsicherer")
        .await
        .unwrap();

    assert!(matches!(
        backend.authenticate("mmuster", "sicher").await,
        Err(AppError::PasswordInvalid)
    ));
    backend
        .authenticate("mmuster", "nochsicherer")
        .await
        .unwrap();
}

#[tokio::test]
async fn hosting_db_lifecycle() {
    let backend = backend();
    let user = backend.get("mmuster").await.unwrap();

    assert!(!backend.has_hosting_db(&user).await.unwrap());
    assert!(matches!(
        backend.change_hosting_password(&user, "pw").await,
        Err(AppError::Validation(_))
    ));

    backend.create_hosting_db(&user, "dbsecret").await.unwrap();
    assert!(backend.has_hosting_db(&user).await.unwrap());

    let info = backend.info(&user).await.unwrap();
    assert_eq!(info.userdb.value.as_deref(), Some("mmuster_db"));

    // Double provisioning is rejected.
    assert!(matches!(
        backend.create_hosting_db(&user, "again").await,
        Err(AppError::Validation(_))
    ));

    backend
        .change_hosting_password(&user, "rotated")
        .await
        .unwrap();
    backend.drop_hosting_db(&user).await.unwrap();
    assert!(!backend.has_hosting_db(&user).await.unwrap());
}

#[tokio::test]
async fn hosting_db_needs_a_known_address() {
    let backend = backend();
    let user = backend.get("nomad").await.unwrap();

    // The access mask is derived from the account's IP.
    assert!(matches!(
        backend.create_hosting_db(&user, "pw").await,
        Err(AppError::Validation(_))
    ));
}
