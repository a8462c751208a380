//! The mock authentication service and its user records.

use crate::auth::store::KeyValueStore;
use crate::core::error::{AuthError, AuthResult};
use crate::core::types::{FieldType, Record, Value};
use crate::schema::field::FieldDefinition;
use crate::schema::form::{FormSchema, Refinement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store key holding the opaque session token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Store key holding the serialized user record.
pub const USER_KEY: &str = "user";

/// What a user can do on the marketplace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books stays and experiences.
    Traveler,
    /// Hosts listings and experiences.
    Guide,
    /// Platform administration.
    Admin,
}

impl Role {
    /// Roles selectable at registration. Admins are provisioned, not
    /// self-registered.
    pub const REGISTERABLE: &'static [&'static str] = &["traveler", "guide"];

    /// The role's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Traveler => "traveler",
            Role::Guide => "guide",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque account identifier.
    pub id: String,
    /// Login email, unique per account.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// What the account can do.
    pub role: Role,
    /// Whether the email has been verified.
    pub is_verified: bool,
    /// Avatar URL, if one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// What the login form collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plaintext password; the mock service never checks it.
    pub password: String,
}

/// What the registration form collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email for the new account.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
    /// Requested role; admins cannot self-register.
    pub role: Role,
    /// Whether the terms checkbox was ticked.
    pub terms_accepted: bool,
}

impl Registration {
    /// Flatten into a record the registration schema can validate.
    fn record(&self) -> Record {
        let mut record = Record::new();
        record.set("first_name", Value::String(self.first_name.clone()));
        record.set("last_name", Value::String(self.last_name.clone()));
        record.set("email", Value::String(self.email.clone()));
        record.set("password", Value::String(self.password.clone()));
        record.set(
            "confirm_password",
            Value::String(self.confirm_password.clone()),
        );
        record.set("role", Value::String(self.role.as_str().to_string()));
        record.set("terms_accepted", Value::Boolean(self.terms_accepted));
        record
    }
}

/// Schema for the registration form.
///
/// The password/confirmation refinement only fires once the password
/// itself passes its own rules, and its error lands on the confirmation
/// field, matching where the user can fix it.
pub fn registration_schema() -> FormSchema {
    FormSchema::new()
        .field(
            FieldDefinition::required("first_name", FieldType::String)
                .with_min_length(2)
                .with_max_length(50),
        )
        .field(
            FieldDefinition::required("last_name", FieldType::String)
                .with_min_length(2)
                .with_max_length(50),
        )
        .field(FieldDefinition::required("email", FieldType::String).email())
        .field(FieldDefinition::required("password", FieldType::String).strong_password())
        .field(
            FieldDefinition::required("confirm_password", FieldType::String)
                .with_display_name("Password confirmation"),
        )
        .field(
            FieldDefinition::required("role", FieldType::String)
                .one_of(Role::REGISTERABLE.iter().copied()),
        )
        .field(
            FieldDefinition::required("terms_accepted", FieldType::Boolean)
                .with_display_name("Terms")
                .accepted(),
        )
        .refine(Refinement::new(
            "passwords_match",
            &["password", "confirm_password"],
            "confirm_password",
            "Passwords do not match",
            |record| record.str("password") == record.str("confirm_password"),
        ))
}

fn sample_users() -> Vec<User> {
    let avatar = |seed: &str| {
        Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            seed
        ))
    };
    vec![
        User {
            id: "1".into(),
            email: "traveler@example.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            role: Role::Traveler,
            is_verified: true,
            profile_image: avatar("john"),
        },
        User {
            id: "2".into(),
            email: "guide@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            role: Role::Guide,
            is_verified: true,
            profile_image: avatar("jane"),
        },
        User {
            id: "3".into(),
            email: "admin@example.com".into(),
            first_name: "Admin".into(),
            last_name: "User".into(),
            role: Role::Admin,
            is_verified: true,
            profile_image: avatar("admin"),
        },
    ]
}

/// Mock authentication over a [`KeyValueStore`].
///
/// Construct one explicitly and pass it where it is needed; the service
/// holds no global state. A real deployment would swap the seeded user
/// list for backend calls and keep the same store keys.
#[derive(Debug)]
pub struct AuthService<S: KeyValueStore> {
    store: S,
    users: Vec<User>,
}

impl<S: KeyValueStore> AuthService<S> {
    /// Create a service seeded with the sample accounts.
    pub fn new(store: S) -> Self {
        Self {
            store,
            users: sample_users(),
        }
    }

    /// Log in with an email and password.
    ///
    /// The mock service matches on email only, like the stand-in backend
    /// it simulates. Unknown emails fail without saying whether the
    /// account exists.
    pub fn login(&mut self, credentials: &Credentials) -> AuthResult<User> {
        let user = self
            .users
            .iter()
            .find(|u| u.email == credentials.email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        self.start_session(&user)?;
        log::info!("user {} logged in as {}", user.id, user.role);
        Ok(user)
    }

    /// Register a new account and log it in.
    pub fn register(&mut self, registration: &Registration) -> AuthResult<User> {
        let errors = registration_schema().validate(&registration.record());
        if !errors.is_empty() {
            return Err(AuthError::InvalidRegistration(errors));
        }

        if self.users.iter().any(|u| u.email == registration.email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: (self.users.len() + 1).to_string(),
            email: registration.email.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            role: registration.role,
            is_verified: false,
            profile_image: Some(format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                registration.first_name
            )),
        };
        self.users.push(user.clone());

        self.start_session(&user)?;
        log::info!("registered user {} as {}", user.id, user.role);
        Ok(user)
    }

    /// End the current session. Safe to call when not logged in.
    pub fn logout(&mut self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    /// Whether a session token is present.
    pub fn is_authenticated(&self) -> bool {
        self.store.get(AUTH_TOKEN_KEY).is_some()
    }

    /// The logged-in user, if any.
    ///
    /// A corrupt stored record is treated as logged out rather than an
    /// error the caller has to handle.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                log::warn!("stored user record is unreadable: {}", err);
                None
            }
        }
    }

    fn start_session(&mut self, user: &User) -> AuthResult<()> {
        let serialized = serde_json::to_string(user)
            .map_err(|err| AuthError::SessionStore(err.to_string()))?;
        self.store
            .set(AUTH_TOKEN_KEY, &format!("mock_token_{}", user.id));
        self.store.set(USER_KEY, &serialized);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryStore;

    fn service() -> AuthService<MemoryStore> {
        AuthService::new(MemoryStore::new())
    }

    fn valid_registration() -> Registration {
        Registration {
            first_name: "Maria".into(),
            last_name: "Silva".into(),
            email: "maria@example.com".into(),
            password: "Abcdef1!".into(),
            confirm_password: "Abcdef1!".into(),
            role: Role::Guide,
            terms_accepted: true,
        }
    }

    #[test]
    fn test_login_known_email() {
        let mut auth = service();
        assert!(!auth.is_authenticated());

        let user = auth
            .login(&Credentials {
                email: "traveler@example.com".into(),
                password: "whatever".into(),
            })
            .unwrap();

        assert_eq!(user.role, Role::Traveler);
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user().unwrap().email, "traveler@example.com");
    }

    #[test]
    fn test_login_unknown_email_fails() {
        let mut auth = service();
        let err = auth
            .login(&Credentials {
                email: "nobody@example.com".into(),
                password: "whatever".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_register_then_logout() {
        let mut auth = service();
        let user = auth.register(&valid_registration()).unwrap();

        assert_eq!(user.id, "4");
        assert!(!user.is_verified);
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.current_user(), None);

        // Re-registering the same email is now a conflict.
        let err = auth.register(&valid_registration()).unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[test]
    fn test_register_rejects_taken_email() {
        let mut auth = service();
        let mut registration = valid_registration();
        registration.email = "guide@example.com".into();

        let err = auth.register(&registration).unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[test]
    fn test_weak_password_names_every_missing_rule() {
        let mut auth = service();
        let mut registration = valid_registration();
        registration.password = "abc".into();
        registration.confirm_password = "abc".into();

        match auth.register(&registration).unwrap_err() {
            AuthError::InvalidRegistration(errors) => {
                let message = errors.get("password").unwrap();
                assert!(message.contains("at least 8 characters"));
                assert!(message.contains("uppercase letter"));
                assert!(message.contains("number"));
                assert!(message.contains("special character"));
                assert!(!message.contains("lowercase"));
            }
            other => panic!("expected InvalidRegistration, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_confirmation_lands_on_the_confirmation_field() {
        let mut auth = service();
        let mut registration = valid_registration();
        registration.confirm_password = "Abcdef1?".into();

        match auth.register(&registration).unwrap_err() {
            AuthError::InvalidRegistration(errors) => {
                assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
                assert!(!errors.contains("password"));
            }
            other => panic!("expected InvalidRegistration, got {:?}", other),
        }
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut auth = service();
        let mut registration = valid_registration();
        registration.terms_accepted = false;

        match auth.register(&registration).unwrap_err() {
            AuthError::InvalidRegistration(errors) => {
                assert_eq!(
                    errors.get("terms_accepted"),
                    Some("You must accept the terms and conditions")
                );
            }
            other => panic!("expected InvalidRegistration, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_stored_user_reads_as_logged_out() {
        let mut store = MemoryStore::new();
        store.set(AUTH_TOKEN_KEY, "mock_token_1");
        store.set(USER_KEY, "not json");

        let auth = AuthService::new(store);
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user(), None);
    }
}
