//! Tests for the domain user model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::Value;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn ada() -> User {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    User::from_parts(UserParts {
        id: UserId::new(VALID_ID).expect("valid id"),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        password_hash: PasswordHash::new("$2b$04$notarealhashbutshapedlikeone"),
        address: "London".to_owned(),
        role: Role::default(),
        created_at: at,
        updated_at: at,
    })
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("must fail"), expected);
}

#[rstest]
fn user_id_round_trips_through_json() {
    let id = UserId::new(VALID_ID).expect("valid id");
    let json = serde_json::to_string(&id).expect("serialise");
    assert_eq!(json, format!("\"{VALID_ID}\""));
    let back: UserId = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(back, id);
}

#[rstest]
fn identity_exposes_email_as_username(ada: User) {
    assert_eq!(Identity::id(&ada), VALID_ID);
    assert_eq!(ada.username(), "ada@example.com");
    assert_eq!(Identity::role(&ada), "admin");
}

#[rstest]
fn serialisation_never_exposes_the_password_hash(ada: User) {
    let value = serde_json::to_value(&ada).expect("serialise");
    let object = value.as_object().expect("object");
    assert!(!object.contains_key("password_hash"));
    assert!(!object.contains_key("password"));
    assert_eq!(
        object.get("first_name").and_then(Value::as_str),
        Some("Ada")
    );
    assert_eq!(object.get("role").and_then(Value::as_str), Some("admin"));
}

#[rstest]
fn parts_round_trip_preserves_fields(ada: User) {
    let rebuilt = User::from_parts(ada.clone().into_parts());
    assert_eq!(rebuilt, ada);
}
