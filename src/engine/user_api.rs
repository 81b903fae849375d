use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::UserAPI,
    entities::User,
    error::{user_not_found_error, Error},
};

#[async_trait]
impl UserAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_user(&self, name: String) -> Result<User, Error> {
        let user = User::new(name);

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        tx.execute(
            sqlx::query("INSERT INTO users (id, data) VALUES ($1, $2)")
                .bind(&user.id)
                .bind(Json(&user)),
        )
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_user(&self, id: Uuid) -> Result<User, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM users WHERE id = $1").bind(&id))
            .await?;

        let result = maybe_result.ok_or_else(|| user_not_found_error())?;
        let Json(user) = result.try_get("data")?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(sqlx::query("SELECT data FROM users"))
            .await?;

        let mut users: Vec<User> = Vec::with_capacity(results.len());

        for result in results.iter() {
            let Json(user) = result.try_get("data")?;
            users.push(user);
        }

        Ok(users)
    }
}
