use axum::extract::{Extension, Json, Multipart, Path};
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{NewPlace, Place, PlaceChanges};
use crate::error::{invalid_input_error, Error};
use crate::server::{DynAPI, SharedImageStore};

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Extension(images): Extension<SharedImageStore>,
    user: User,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Place>), Error> {
    let params = read_place_form(multipart, &images).await?;
    let image_url = params.image_url.clone();

    match api.create_place(user, params).await {
        Ok(place) => Ok((StatusCode::CREATED, Json(place))),
        Err(err) => {
            // The image went in before the place; drop the orphan.
            if let Err(cleanup_err) = images.remove(&image_url).await {
                tracing::warn!(?cleanup_err, %image_url, "failed to remove orphaned image");
            }

            Err(err)
        }
    }
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Place>, Error> {
    let place = api.find_place(id).await?;

    Ok(place.into())
}

pub async fn find_by_user(
    Extension(api): Extension<DynAPI>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Place>>, Error> {
    let places = api.find_user_places(user_id).await?;

    Ok(places.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(changes): Json<PlaceChanges>,
) -> Result<Json<Place>, Error> {
    changes.validate()?;

    let place = api.update_place(user, id, changes).await?;

    Ok(place.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Error> {
    api.delete_place(user, id).await?;

    Ok(Json(json!({ "message": "deleted place" })))
}

/// Reads the multipart place form: the text fields plus the uploaded
/// image under the `image` field.
async fn read_place_form(
    mut multipart: Multipart,
    images: &SharedImageStore,
) -> Result<NewPlace, Error> {
    let mut title = None;
    let mut description = None;
    let mut address = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => title = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "address" => address = Some(field.text().await?),
            "image" => {
                let content_type = field
                    .content_type()
                    .ok_or_else(|| invalid_input_error())?
                    .to_string();

                image = Some((content_type, field.bytes().await?));
            }
            _ => continue,
        }
    }

    let (content_type, bytes) = image.ok_or_else(|| invalid_input_error())?;

    let mut params = NewPlace {
        title: title.ok_or_else(|| invalid_input_error())?,
        description: description.ok_or_else(|| invalid_input_error())?,
        address: address.ok_or_else(|| invalid_input_error())?,
        image_url: String::new(),
    };

    params.validate()?;

    // Store the image only once the text fields check out; a rejected
    // request must not leave a file behind.
    params.image_url = images.store(&content_type, bytes).await?;

    Ok(params)
}
