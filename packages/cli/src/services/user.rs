use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{NewUser, User, UserUpdate};

pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<User>, ClientError> {
        self.client.get(&["users"])
    }

    pub fn create(&self, user: &NewUser) -> Result<User, ClientError> {
        self.client.post(&["users"], user)
    }

    pub fn get(&self, id: i32) -> Result<Option<User>, ClientError> {
        self.client.get_optional(&["users", &id.to_string()])
    }

    pub fn by_email(&self, email: &str) -> Result<Option<User>, ClientError> {
        self.client.get_optional(&["users", "email", email])
    }

    pub fn update(&self, id: i32, update: &UserUpdate) -> Result<User, ClientError> {
        self.client.put(&["users", &id.to_string()], update)
    }
}
