use serde_json::json;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{Content, ContentAction, NewContent, NewSpace, Receipt, Space, SpaceUpdate};

const SOFT_DELETE: &str = "soft_delete";

pub struct SpaceService<'a> {
    client: &'a ApiClient,
}

impl<'a> SpaceService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Every top-level space, across all users.
    pub fn root(&self) -> Result<Vec<Space>, ClientError> {
        self.client.get(&["spaces", "root"])
    }

    pub fn by_user(&self, user_id: i32) -> Result<Vec<Space>, ClientError> {
        self.client.get(&["spaces", "user", &user_id.to_string()])
    }

    pub fn user_root(&self, user_id: i32) -> Result<Vec<Space>, ClientError> {
        self.client.get(&["spaces", "user", &user_id.to_string(), "root"])
    }

    pub fn get(&self, space_id: &str) -> Result<Option<Space>, ClientError> {
        self.client.get_optional(&["spaces", space_id])
    }

    pub fn children(&self, space_id: &str) -> Result<Vec<Space>, ClientError> {
        self.client.get(&["spaces", space_id, "children"])
    }

    pub fn create(&self, space: &NewSpace) -> Result<Space, ClientError> {
        self.client.post(&["spaces"], space)
    }

    pub fn update(&self, space_id: &str, update: &SpaceUpdate) -> Result<Space, ClientError> {
        self.client.put(&["spaces", space_id], update)
    }

    /// Deletes the space together with its descendants and their content.
    pub fn delete(&self, space_id: &str) -> Result<Receipt, ClientError> {
        self.client.delete(&["spaces", space_id])
    }

    /// Active items, newest first, without file bytes.
    pub fn content(&self, space_id: &str) -> Result<Vec<Content>, ClientError> {
        self.client.get(&["spaces", space_id, "content"])
    }

    pub fn add_content(
        &self,
        space_id: &str,
        content: &NewContent,
    ) -> Result<Content, ClientError> {
        self.client.post_transfer(&["spaces", space_id, "content"], content)
    }

    /// One item with upload bytes inlined as a data URL.
    pub fn full_content(
        &self,
        space_id: &str,
        content_id: &str,
    ) -> Result<Option<Content>, ClientError> {
        self.client.get_transfer(&["spaces", space_id, "content", content_id, "full"])
    }

    pub fn soft_delete_content(
        &self,
        space_id: &str,
        content_id: &str,
    ) -> Result<ContentAction, ClientError> {
        self.client.patch(
            &["spaces", space_id, "content", content_id],
            &json!({ "action": SOFT_DELETE }),
        )
    }

    pub fn delete_content(&self, space_id: &str, content_id: &str) -> Result<Receipt, ClientError> {
        self.client.delete(&["spaces", space_id, "content", content_id])
    }
}
