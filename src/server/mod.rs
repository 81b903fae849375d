mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::server::handlers::{places, users};
use crate::storage::ImageStore;

pub type DynAPI = Arc<dyn API + Send + Sync>;
pub type SharedImageStore = Arc<ImageStore>;

pub async fn serve<T: API + Sync + Send + 'static>(api: T, images: SharedImageStore) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/places", post(places::create))
        .route(
            "/places/:id",
            get(places::find)
                .patch(places::update)
                .delete(places::remove),
        )
        .route("/places/user/:user_id", get(places::find_by_user))
        .route("/users", post(users::create).get(users::list))
        .route("/users/:id", get(users::find))
        .layer(Extension(api))
        .layer(Extension(images));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
