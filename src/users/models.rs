use argon2::Config;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rand::Rng;
use regex::Regex;

use crate::db;
use crate::errors::ServiceError;
use crate::gamers::NewGamer;
use crate::schema::users;

/// registration payload, the profile fields end up on the auth user
#[derive(Debug, Deserialize, Insertable)]
#[table_name = "users"]
pub struct UserMessage {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Queryable, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, skip_deserializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct Filter {
    /// filter users by %name%
    pub username: Option<String>,
}

impl User {
    pub fn find_all(filter: Filter, conn: &db::Conn) -> Result<Vec<Self>, ServiceError> {
        let mut query = users::table.into_boxed();

        if let Some(username) = filter.username {
            query = query.filter(users::username.ilike(format!("%{}%", username)));
        }

        let users = query.load::<User>(conn)?;

        Ok(users)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<Self, ServiceError> {
        let user = users::table.filter(users::id.eq(id)).first(conn)?;

        Ok(user)
    }

    pub fn find_by_username(username: String, conn: &db::Conn) -> Result<Self, ServiceError> {
        let user = users::table
            .filter(users::username.eq(username))
            .first(conn)?;

        Ok(user)
    }

    /// Creates the auth user and its gamer profile in one transaction.
    ///
    /// When either insert fails the transaction rolls back and
    /// nothing will have happened.
    pub fn register(mut user: UserMessage, conn: &db::Conn) -> Result<User, ServiceError> {
        user.hash_password()?;

        let user = conn.transaction::<User, diesel::result::Error, _>(|| {
            let user: User = diesel::insert_into(users::table)
                .values(&user)
                .get_result(conn)?;

            NewGamer::new(user.id).save(conn)?;

            Ok(user)
        })?;

        Ok(user)
    }

    pub fn verify_password(&self, password: &[u8]) -> Result<(), ServiceError> {
        let is_match = argon2::verify_encoded(&self.password, password)?;

        if !is_match {
            return Err(ServiceError::Unauthorized);
        }

        Ok(())
    }
}

impl UserMessage {
    fn hash_password(&mut self) -> Result<(), ServiceError> {
        let salt: [u8; 32] = rand::thread_rng().gen();
        let config = Config::default();

        self.password = argon2::hash_encoded(self.password.as_bytes(), &salt, &config)?;

        Ok(())
    }
}

impl crate::validator::Validate<UserMessage> for UserMessage {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.username.trim().is_empty() {
            bad_request!("username is too short");
        }

        if self.username.trim().len() > 20 {
            bad_request!("username is too long, max 20 characters");
        }

        let pattern: Regex = Regex::new(r"^[0-9A-Za-z-_]+$").unwrap();

        if !pattern.is_match(&self.username) {
            bad_request!("username can only contain letters, numbers, '-' and '_'");
        }

        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            bad_request!("first and last name are required");
        }

        if self.first_name.trim().len() > 30 || self.last_name.trim().len() > 30 {
            bad_request!("names are limited to 30 characters");
        }

        if self.password.len() < 8 {
            bad_request!("your password should at least be 8 characters long");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    fn message(username: &str, password: &str) -> UserMessage {
        UserMessage {
            username: String::from(username),
            password: String::from(password),
            first_name: String::from("Molly"),
            last_name: String::from("Ringwald"),
        }
    }

    #[test]
    /// the user password should never be exposed through the api
    fn password_should_not_leak() {
        let password = "password";
        let user = User {
            id: 1,
            username: "".to_string(),
            password: password.to_string(),
            first_name: "Molly".to_string(),
            last_name: "Ringwald".to_string(),
            is_admin: false,
            created_at: None,
            updated_at: None,
        };

        let serialized = serde_json::to_string(&user).unwrap();

        assert_eq!(serialized.contains(password), false);
    }

    #[test]
    fn invalid_username() {
        let user = message("a€$b", "hunter2boogaloo");

        assert!(Validator::new(user).validate().is_err());
    }

    #[test]
    fn empty_username() {
        let user = message("", "hunter2boogaloo");

        assert!(Validator::new(user).validate().is_err());
    }

    #[test]
    fn valid_username() {
        let user = message("rickybobby", "hunter2boogaloo");

        assert!(Validator::new(user).validate().is_ok());
    }

    #[test]
    fn valid_username_with_other_characters() {
        let user = message("a-b_c-0123", "hunter2boogaloo");

        assert!(Validator::new(user).validate().is_ok());
    }

    #[test]
    fn missing_name() {
        let mut user = message("rickybobby", "hunter2boogaloo");
        user.first_name = String::from(" ");

        assert!(Validator::new(user).validate().is_err());
    }

    #[test]
    fn incorrect_password() {
        let mut user = message("admin", "admin");
        user.hash_password().unwrap();

        let user = User {
            id: 1,
            username: user.username,
            password: user.password,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: true,
            created_at: None,
            updated_at: None,
        };

        assert!(user.verify_password(b"admin").is_ok());
        assert!(user.verify_password(b"not-admin").is_err());
    }
}
