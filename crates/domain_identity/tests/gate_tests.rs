//! Tests for the authentication gate

use std::sync::Arc;

use domain_identity::{
    AuthGate, CredentialHasher, Credentials, IdentityError, InMemoryPrincipalStore,
    NewUserAccount, PrincipalStore,
};

async fn gate_with_user(username: &str, password: &str) -> AuthGate {
    let store = InMemoryPrincipalStore::new();
    let hasher = CredentialHasher::new();
    store
        .insert_all(vec![NewUserAccount {
            username: username.to_string(),
            password_hash: hasher.hash(password).unwrap(),
        }])
        .await
        .unwrap();
    AuthGate::new(Arc::new(store), hasher)
}

#[tokio::test]
async fn test_valid_credentials_return_principal() {
    let gate = gate_with_user("admin", "admin123").await;

    let principal = gate
        .authenticate(&Credentials::new("admin", "admin123"))
        .await
        .unwrap();

    assert_eq!(principal.username, "admin");
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let gate = gate_with_user("admin", "admin123").await;

    let err = gate
        .authenticate(&Credentials::new("admin", "admin124"))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_unknown_user_rejected() {
    let gate = gate_with_user("admin", "admin123").await;

    let err = gate
        .authenticate(&Credentials::new("nobody", "admin123"))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::InvalidCredentials));
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let store = InMemoryPrincipalStore::new();
    let account = NewUserAccount {
        username: "billing_user".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    };

    store.insert_all(vec![account.clone()]).await.unwrap();
    let err = store.insert_all(vec![account]).await.unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(store.count().await.unwrap(), 1);
}
