//! End-to-end token flows over real key store backends.

use std::time::Duration;

use signet_auth::{AuthError, Claims, Permission, Scope, Signer};
use signet_keystore::{CachedKeyStore, DirectoryKeyStore, KeyStore, MemoryKeyStore};

fn claims(scopes: Vec<Scope>) -> Claims {
    Claims::new(scopes, Duration::from_secs(300))
}

#[test]
fn issue_and_authorize_over_cached_memory_store() {
    let store = CachedKeyStore::new(MemoryKeyStore::new(), Duration::from_secs(60));
    let signer = Signer::new(store);

    let granted = vec![
        Scope::new(Permission::Write, "files"),
        Scope::new(Permission::Read, "messages").with_resource("inbox"),
    ];
    let token = signer.new_token(&claims(granted.clone())).unwrap();

    let verified = signer.auth_request(&format!("Bearer {token}")).unwrap();
    assert_eq!(verified.scopes, granted);

    assert!(Scope::new(Permission::Read, "files")
        .with_resource("report.txt")
        .allowed_by_any(&verified.scopes));
    assert!(!Scope::new(Permission::Write, "messages")
        .with_resource("inbox")
        .allowed_by_any(&verified.scopes));
}

#[test]
fn rotation_keeps_old_tokens_verifiable() {
    let signer = Signer::new(MemoryKeyStore::new());

    // Each issuance mints a fresh key; older tokens must keep verifying.
    let first = signer
        .new_token(&claims(vec![Scope::new(Permission::Read, "a")]))
        .unwrap();
    let second = signer
        .new_token(&claims(vec![Scope::new(Permission::Read, "b")]))
        .unwrap();

    assert_eq!(signer.verify(&first).unwrap().scopes[0].class, "a");
    assert_eq!(signer.verify(&second).unwrap().scopes[0].class, "b");
}

#[test]
fn directory_backed_keys_verify_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();

    let issuing = Signer::new(DirectoryKeyStore::new(dir.path()).unwrap());
    let token = issuing
        .new_token(&claims(vec![Scope::new(Permission::Admin, "jobs")]))
        .unwrap();

    // A separate process would build its own snapshot of the same directory.
    let verifying = Signer::new(DirectoryKeyStore::new(dir.path()).unwrap());
    let verified = verifying.verify(&token).unwrap();
    assert_eq!(verified.scopes, vec![Scope::new(Permission::Admin, "jobs")]);
}

#[test]
fn token_for_deleted_key_stops_verifying() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryKeyStore::new(dir.path()).unwrap();
    let signer = Signer::new(&store);

    let token = signer
        .new_token(&claims(vec![Scope::new(Permission::Read, "stuff")]))
        .unwrap();
    assert!(signer.verify(&token).is_ok());

    // Revoke the key by deleting its file and refreshing the snapshot.
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        std::fs::remove_file(entry.unwrap().path()).unwrap();
    }
    store.update().unwrap();

    assert!(matches!(
        signer.verify(&token),
        Err(AuthError::KeyStore(_))
    ));
}

#[test]
fn boxed_store_composes_with_the_signer() {
    let store: Box<dyn KeyStore> = Box::new(MemoryKeyStore::new());
    let signer = Signer::new(store);

    let token = signer
        .new_token(&claims(vec![Scope::new(Permission::Read, "stuff")]))
        .unwrap();
    assert!(signer.verify(&token).is_ok());
}
