use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{Card, CardStyle, CardUpdate, NewCard, Receipt};

pub struct CardService<'a> {
    client: &'a ApiClient,
}

impl<'a> CardService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn styles(&self) -> Result<Vec<CardStyle>, ClientError> {
        self.client.get(&["cards", "styles"])
    }

    pub fn style(&self, name: &str) -> Result<Option<CardStyle>, ClientError> {
        self.client.get_optional(&["cards", "styles", name])
    }

    pub fn create(&self, card: &NewCard) -> Result<Card, ClientError> {
        self.client.post(&["cards"], card)
    }

    pub fn get(&self, card_id: &str) -> Result<Option<Card>, ClientError> {
        self.client.get_optional(&["cards", card_id])
    }

    /// Cards owned by a user, newest first.
    pub fn by_user(&self, user_id: i32) -> Result<Vec<Card>, ClientError> {
        self.client.get(&["cards", "user", &user_id.to_string()])
    }

    pub fn update(&self, card_id: &str, update: &CardUpdate) -> Result<Card, ClientError> {
        self.client.put(&["cards", card_id], update)
    }

    pub fn delete(&self, card_id: &str) -> Result<Receipt, ClientError> {
        self.client.delete(&["cards", card_id])
    }
}
