//! User service
//!
//! Registration, lookup, password change and the user directory.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::data::{Database, Repository, User, UserView};
use crate::error::AppError;
use crate::metrics::USERS_REGISTERED_TOTAL;

/// User service
pub struct UserService<R = Database> {
    repo: Arc<R>,
}

impl<R: Repository<User>> UserService<R> {
    /// Create new user service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Look up a user's public profile
    ///
    /// # Errors
    /// `UserNotFound` if no user has this username
    pub async fn find_by_username(&self, username: &str) -> Result<UserView, AppError> {
        let user = self.repo.get(username).await?.ok_or(AppError::UserNotFound)?;
        Ok(UserView::profile(&user))
    }

    /// Register a new user
    ///
    /// The record is stored as given, including the password.
    ///
    /// # Errors
    /// `UsernameAlreadyExists` if the username is taken
    pub async fn create_user(&self, user: User) -> Result<User, AppError> {
        if self.repo.exists(&user.username).await? {
            tracing::error!(username = %user.username, "username already exists");
            return Err(AppError::UsernameAlreadyExists);
        }

        // A concurrent registration can still win between the check and the insert.
        match self.repo.insert(&user).await {
            Ok(()) => {}
            Err(AppError::Conflict(_)) => {
                tracing::error!(username = %user.username, "username already exists");
                return Err(AppError::UsernameAlreadyExists);
            }
            Err(error) => return Err(error),
        }

        USERS_REGISTERED_TOTAL.inc();
        tracing::debug!(username = %user.username, "registered user");
        Ok(user)
    }

    /// Directory listing with passwords scrubbed
    pub async fn get_all_users(&self) -> Result<Vec<UserView>, AppError> {
        let users = self.repo.all().await?;
        tracing::debug!(total = users.len(), "listed users");
        Ok(users.iter().map(UserView::directory).collect())
    }

    /// Replace a user's password
    ///
    /// Both the stored contact number and the stored username must match
    /// the supplied values, ignoring case.
    ///
    /// # Errors
    /// `PasswordMismatch` if the user is unknown or either check fails
    pub async fn change_password(
        &self,
        username: &str,
        new_password: &str,
        contact: &str,
    ) -> Result<User, AppError> {
        let Some(mut user) = self.repo.get(username).await? else {
            tracing::error!(%username, "unable to change password for unknown user");
            return Err(AppError::PasswordMismatch(username.to_string()));
        };

        if !user.contact_number.eq_ignore_ascii_case(contact)
            || !user.username.eq_ignore_ascii_case(username)
        {
            tracing::error!(%username, "unable to change password for user");
            return Err(AppError::PasswordMismatch(username.to_string()));
        }

        user.password = new_password.to_string();
        self.repo.put(&user).await?;

        tracing::debug!(%username, "password changed successfully");
        Ok(user)
    }

    /// Users whose username contains `query`
    pub async fn get_users_by_username(&self, query: &str) -> Result<Vec<User>, AppError> {
        self.repo.search_by_field("username", query).await
    }

    /// Verify a username/password pair
    ///
    /// # Errors
    /// `Unauthorized` for an unknown user or a wrong password
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserView, AppError> {
        let Some(user) = self.repo.get(username).await? else {
            tracing::warn!(%username, "login attempt for unknown user");
            return Err(AppError::Unauthorized);
        };

        if !bool::from(user.password.as_bytes().ct_eq(password.as_bytes())) {
            tracing::warn!(%username, "login attempt with bad credentials");
            return Err(AppError::Unauthorized);
        }

        tracing::debug!(%username, "successfully logged in");
        Ok(UserView::profile(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SCRUBBED_PASSWORD;
    use tempfile::TempDir;

    async fn create_test_db() -> (Arc<Database>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("service-user.db");
        let db = Database::connect(&db_path).await.unwrap();
        (Arc::new(db), temp_dir)
    }

    fn bob() -> User {
        User {
            username: "bob".to_string(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            contact_number: "555-1234".to_string(),
            password: "oldpw".to_string(),
        }
    }

    async fn stored_password(db: &Database, username: &str) -> String {
        Repository::<User>::get(db, username)
            .await
            .unwrap()
            .unwrap()
            .password
    }

    #[tokio::test]
    async fn create_then_find_returns_scrubbed_profile() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db);

        let created = service.create_user(bob()).await.unwrap();
        assert_eq!(created, bob());

        let found = service.find_by_username("bob").await.unwrap();
        assert_eq!(found.username, "bob");
        assert_eq!(found.name, "Bob");
        assert_eq!(found.email, "bob@example.com");
        assert_eq!(found.password, SCRUBBED_PASSWORD);
        assert_eq!(found.contact_number, None);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db.clone());
        service.create_user(bob()).await.unwrap();

        let mut second = bob();
        second.name = "Other Bob".to_string();
        second.password = "different".to_string();
        let error = service.create_user(second).await.unwrap_err();
        assert!(matches!(error, AppError::UsernameAlreadyExists));

        let stored = Repository::<User>::get(db.as_ref(), "bob")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, bob());
    }

    #[tokio::test]
    async fn find_missing_user_is_typed_not_found() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db);

        let error = service.find_by_username("ghost").await.unwrap_err();
        assert!(matches!(error, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn get_all_users_includes_contact_and_scrubs_password() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db);
        service.create_user(bob()).await.unwrap();

        let users = service.get_all_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].contact_number.as_deref(), Some("555-1234"));
        assert_eq!(users[0].password, SCRUBBED_PASSWORD);
    }

    #[tokio::test]
    async fn change_password_matches_contact_case_insensitively() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db.clone());
        let mut user = bob();
        user.contact_number = "ABC-1234".to_string();
        service.create_user(user).await.unwrap();

        let updated = service
            .change_password("BOB", "newpw", "abc-1234")
            .await;
        // The key lookup is exact, so a differently cased username finds nothing.
        assert!(matches!(updated, Err(AppError::PasswordMismatch(_))));

        let updated = service
            .change_password("bob", "newpw", "abc-1234")
            .await
            .unwrap();
        assert_eq!(updated.password, "newpw");
        assert_eq!(stored_password(&db, "bob").await, "newpw");
    }

    #[tokio::test]
    async fn change_password_rejects_wrong_contact() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db.clone());
        service.create_user(bob()).await.unwrap();

        let error = service
            .change_password("bob", "newpw", "555-9999")
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::PasswordMismatch(ref name) if name == "bob"));
        assert_eq!(stored_password(&db, "bob").await, "oldpw");

        let error = service
            .change_password("ghost", "newpw", "555-1234")
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::PasswordMismatch(_)));
    }

    #[tokio::test]
    async fn search_returns_partial_matches() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db);
        service.create_user(bob()).await.unwrap();
        let mut bobby = bob();
        bobby.username = "bobby".to_string();
        service.create_user(bobby).await.unwrap();
        let mut alice = bob();
        alice.username = "alice".to_string();
        service.create_user(alice).await.unwrap();

        let found = service.get_users_by_username("bob").await.unwrap();
        let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "bobby"]);
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let (db, _temp_dir) = create_test_db().await;
        let service = UserService::new(db);
        service.create_user(bob()).await.unwrap();

        let view = service.authenticate("bob", "oldpw").await.unwrap();
        assert_eq!(view.username, "bob");
        assert_eq!(view.password, SCRUBBED_PASSWORD);

        assert!(matches!(
            service.authenticate("bob", "nope").await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            service.authenticate("ghost", "oldpw").await,
            Err(AppError::Unauthorized)
        ));
    }
}
