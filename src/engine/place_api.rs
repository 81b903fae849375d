use super::helpers::{
    delete_place_row, fetch_place_for_update, fetch_user_for_update, insert_place, save_place,
    save_user,
};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::PlaceAPI,
    auth::User,
    entities::{NewPlace, Place, PlaceChanges},
    error::{place_not_found_error, user_not_found_error, Error},
    external::geocoding,
};

#[async_trait]
impl PlaceAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_place(&self, user: User, params: NewPlace) -> Result<Place, Error> {
        let location = geocoding::resolve_address(&params.address).await?;
        let place = Place::new(params, location, user.id);

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // The place row and the owner's place set go together or not at
        // all; an error before commit rolls both back.
        let mut owner = fetch_user_for_update(&mut tx, &user.id).await?;
        owner.add_place(place.id);

        insert_place(&mut tx, &place).await?;
        save_user(&mut tx, &owner).await?;

        tx.commit().await?;

        Ok(place)
    }

    #[tracing::instrument(skip(self))]
    async fn find_place(&self, id: Uuid) -> Result<Place, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM places WHERE id = $1").bind(&id))
            .await?;

        let result = maybe_result.ok_or_else(|| place_not_found_error())?;
        let Json(place) = result.try_get("data")?;

        Ok(place)
    }

    #[tracing::instrument(skip(self))]
    async fn find_user_places(&self, user_id: Uuid) -> Result<Vec<Place>, Error> {
        let mut conn = self.pool.acquire().await?;

        conn.fetch_optional(sqlx::query("SELECT id FROM users WHERE id = $1").bind(&user_id))
            .await?
            .ok_or_else(|| user_not_found_error())?;

        let results = conn
            .fetch_all(sqlx::query("SELECT data FROM places WHERE creator_id = $1").bind(&user_id))
            .await?;

        let mut places: Vec<Place> = Vec::with_capacity(results.len());

        for result in results.iter() {
            let Json(place) = result.try_get("data")?;
            places.push(place);
        }

        Ok(places)
    }

    #[tracing::instrument(skip(self))]
    async fn update_place(
        &self,
        user: User,
        id: Uuid,
        changes: PlaceChanges,
    ) -> Result<Place, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut place = fetch_place_for_update(&mut tx, &id).await?;

        self.authorize(user, "update", place.clone())?;

        place.apply(changes);
        save_place(&mut tx, &place).await?;

        tx.commit().await?;

        Ok(place)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_place(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let place = fetch_place_for_update(&mut tx, &id).await?;

        self.authorize(user, "delete", place.clone())?;

        let mut owner = fetch_user_for_update(&mut tx, &place.creator_id).await?;
        owner.remove_place(&place.id);

        delete_place_row(&mut tx, &place.id).await?;
        save_user(&mut tx, &owner).await?;

        tx.commit().await?;

        // The record is gone at this point; dropping the image is best
        // effort and must not fail the request.
        let images = self.images.clone();
        let image_url = place.image_url;

        tokio::spawn(async move {
            if let Err(err) = images.remove(&image_url).await {
                tracing::warn!(?err, %image_url, "failed to remove image of deleted place");
            }
        });

        Ok(())
    }
}
