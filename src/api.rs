use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{self, NewPlace, Place, PlaceChanges};
use crate::error::Error;

#[async_trait]
pub trait PlaceAPI {
    /// Registers a place for the authenticated user. The image referenced
    /// by `params.image_url` must already be stored; callers are expected
    /// to drop it again if this fails.
    async fn create_place(&self, user: User, params: NewPlace) -> Result<Place, Error>;

    async fn find_place(&self, id: Uuid) -> Result<Place, Error>;

    /// Every place created by the given user. An empty list is a valid
    /// answer; an unknown user is not.
    async fn find_user_places(&self, user_id: Uuid) -> Result<Vec<Place>, Error>;

    async fn update_place(
        &self,
        user: User,
        id: Uuid,
        changes: PlaceChanges,
    ) -> Result<Place, Error>;

    async fn delete_place(&self, user: User, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait UserAPI {
    async fn create_user(&self, name: String) -> Result<entities::User, Error>;

    async fn find_user(&self, id: Uuid) -> Result<entities::User, Error>;

    async fn list_users(&self) -> Result<Vec<entities::User>, Error>;
}

pub trait API: PlaceAPI + UserAPI {}
