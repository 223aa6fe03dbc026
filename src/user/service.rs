use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::database::store::{StoreError, UserStore};
use crate::user::model::{CreateUserRequest, LoginRequest, User, UserSummary};
use crate::utils::error::CustomError;
use crate::utils::validation::Validator;

pub struct UserService {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        UserService { store, bcrypt_cost }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, CustomError> {
        let mut validator = Validator::new();
        let username = validator.username(request.username.as_deref());
        let email = validator.email(request.email.as_deref());
        let password = validator.password(request.password.as_deref());
        validator.finish()?;

        // Check if username already exists
        if self.username_exists(&username).await? {
            return Err(CustomError::ConflictError(
                "Username already exists".to_string(),
            ));
        }

        // Check if email already exists
        if self.email_exists(&email).await? {
            return Err(CustomError::ConflictError("Email already exists".to_string()));
        }

        let hashed_password = bcrypt::hash(&password, self.bcrypt_cost)
            .map_err(|e| CustomError::internal("Server error during registration", e))?;

        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            username,
            email,
            password: hashed_password,
            profile_picture: String::new(),
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(CustomError::ConflictError(
                    "Username or email already exists".to_string(),
                ));
            }
            Err(e) => return Err(CustomError::internal("Server error during registration", e)),
        }

        log::info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn authenticate_user(&self, request: LoginRequest) -> Result<User, CustomError> {
        let mut validator = Validator::new();
        let username = request.username.as_deref().map(str::trim).unwrap_or_default();
        let password = request.password.as_deref().unwrap_or_default();
        if username.is_empty() {
            validator.reject("username", "Username is required");
        }
        if password.is_empty() {
            validator.reject("password", "Password is required");
        }
        validator.finish()?;

        let user = self
            .store
            .find_user_by_username(username)
            .await
            .map_err(|e| CustomError::internal("Server error during login", e))?
            .ok_or_else(|| CustomError::UnauthorizedError("Invalid credentials".to_string()))?;

        let matches = bcrypt::verify(password, &user.password)
            .map_err(|e| CustomError::internal("Server error during login", e))?;
        if !matches {
            return Err(CustomError::UnauthorizedError(
                "Invalid credentials".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.store
            .find_user(id)
            .await
            .map_err(|e| CustomError::internal("Server error while fetching user", e))
    }

    /// Public summaries of the given users, keyed by id. Unknown ids are left out.
    pub async fn summaries(
        &self,
        ids: impl IntoIterator<Item = ObjectId>,
    ) -> Result<HashMap<ObjectId, UserSummary>, CustomError> {
        let mut ids: Vec<ObjectId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();

        let users = self
            .store
            .find_users(&ids)
            .await
            .map_err(|e| CustomError::internal("Server error while fetching users", e))?;

        Ok(users
            .into_iter()
            .map(|user| (user.id, user.summary()))
            .collect())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, CustomError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await
            .map_err(|e| CustomError::internal("Server error during registration", e))?;
        Ok(user.is_some())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, CustomError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await
            .map_err(|e| CustomError::internal("Server error during registration", e))?;
        Ok(user.is_some())
    }
}
