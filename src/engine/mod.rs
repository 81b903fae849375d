mod helpers;
mod place_api;
mod user_api;

use std::sync::Arc;

use oso::Oso;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    api::API,
    auth::authorizor,
    error::{unauthorized_error, Error},
    storage::ImageStore,
};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    authorizor: Oso,
    images: Arc<ImageStore>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, images: Arc<ImageStore>) -> Result<Self, Error> {
        // TODO: move table setup to migrations
        pool.execute("CREATE TABLE IF NOT EXISTS users (id UUID PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS places (id UUID PRIMARY KEY, creator_id UUID NOT NULL REFERENCES users (id), data JSONB NOT NULL)")
            .await?;

        Ok(Self {
            pool,
            authorizor: authorizor::new(),
            images,
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl API for Engine {}
