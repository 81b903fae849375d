use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::User;
use crate::error::{invalid_input_error, Error};
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    name: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<User>), Error> {
    if params.name.trim().is_empty() {
        return Err(invalid_input_error());
    }

    let user = api.create_user(params.name).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, Error> {
    let user = api.find_user(id).await?;

    Ok(user.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<User>>, Error> {
    let users = api.list_users().await?;

    Ok(users.into())
}
