use bazaar_auth_types::token::validate_session_token;
use bazaar_domain::user::UserRole;
use bazaar_store::error::StoreServiceError;
use bazaar_store::usecase::account::{
    AdminBootstrap, BootstrapAdminInput, BootstrapAdminUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase,
};

use crate::helpers::{FakeHasher, InMemoryStore};

const SECRET: &str = "account-test-secret";

fn register_input(email: &str, password: &str, confirm: &str) -> RegisterInput {
    RegisterInput {
        name: "Asha Rao".to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        confirm_password: confirm.to_owned(),
    }
}

fn login_usecase(store: &InMemoryStore) -> LoginUseCase<InMemoryStore, FakeHasher> {
    LoginUseCase {
        users: store.clone(),
        hasher: FakeHasher,
        session_secret: SECRET.to_owned(),
        session_ttl_secs: 3600,
    }
}

#[tokio::test]
async fn should_register_customer_with_hashed_password() {
    let store = InMemoryStore::new();
    let uc = RegisterUseCase {
        users: store.clone(),
        hasher: FakeHasher,
    };

    let user = uc
        .execute(register_input(" Asha@Example.com ", "secret1", "secret1"))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Customer);
    assert_eq!(user.email, "asha@example.com");
    assert_ne!(user.password_hash, "secret1");
    assert_eq!(store.lock().users.len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let store = InMemoryStore::new();
    let uc = RegisterUseCase {
        users: store.clone(),
        hasher: FakeHasher,
    };
    uc.execute(register_input("asha@example.com", "secret1", "secret1"))
        .await
        .unwrap();

    let result = uc
        .execute(register_input("ASHA@example.com", "secret2", "secret2"))
        .await;

    assert!(
        matches!(result, Err(StoreServiceError::UserAlreadyExists)),
        "expected UserAlreadyExists, got {result:?}"
    );
    assert_eq!(store.lock().users.len(), 1);
}

#[tokio::test]
async fn should_reject_invalid_registration_fields() {
    let uc = RegisterUseCase {
        users: InMemoryStore::new(),
        hasher: FakeHasher,
    };

    let cases = [
        register_input("asha@example.com", "short", "short"),
        register_input("asha@example.com", "secret1", "secret2"),
        register_input("not-an-email", "secret1", "secret1"),
        RegisterInput {
            name: "A".to_owned(),
            ..register_input("asha@example.com", "secret1", "secret1")
        },
    ];
    for input in cases {
        let result = uc.execute(input).await;
        assert!(
            matches!(result, Err(StoreServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_login_and_issue_session_token() {
    let store = InMemoryStore::new();
    let user = store.add_user("Asha", UserRole::Customer);

    let output = login_usecase(&store)
        .execute(LoginInput {
            email: "ASHA@example.com".to_owned(),
            password: "secret1".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(output.user.id, user.id);
    let session = validate_session_token(&output.session_token, SECRET).unwrap();
    assert_eq!(session.user_id, user.id);
    assert_eq!(session.role, UserRole::Customer);
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email_alike() {
    let store = InMemoryStore::new();
    store.add_user("Asha", UserRole::Customer);
    let uc = login_usecase(&store);

    let wrong_password = uc
        .execute(LoginInput {
            email: "asha@example.com".to_owned(),
            password: "secret2".to_owned(),
        })
        .await;
    let unknown_email = uc
        .execute(LoginInput {
            email: "ghost@example.com".to_owned(),
            password: "secret1".to_owned(),
        })
        .await;

    assert!(matches!(wrong_password, Err(StoreServiceError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(StoreServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_create_admin_when_email_is_new() {
    let store = InMemoryStore::new();
    let uc = BootstrapAdminUseCase {
        users: store.clone(),
        hasher: FakeHasher,
    };

    let outcome = uc
        .execute(BootstrapAdminInput {
            name: "Root".to_owned(),
            email: "root@example.com".to_owned(),
            password: "changeme".to_owned(),
        })
        .await
        .unwrap();

    match outcome {
        AdminBootstrap::Created(user) => assert_eq!(user.role, UserRole::Admin),
        other => panic!("expected Created, got {other:?}"),
    }
}

#[tokio::test]
async fn should_promote_existing_user_to_admin() {
    let store = InMemoryStore::new();
    let existing = store.add_user("Asha", UserRole::Customer);
    let uc = BootstrapAdminUseCase {
        users: store.clone(),
        hasher: FakeHasher,
    };

    let outcome = uc
        .execute(BootstrapAdminInput {
            name: "ignored".to_owned(),
            email: existing.email.clone(),
            password: String::new(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, AdminBootstrap::Promoted(ref u) if u.id == existing.id));
    let stored = store.lock().users[0].clone();
    assert_eq!(stored.role, UserRole::Admin);
    assert_eq!(stored.password_hash, existing.password_hash);
}
