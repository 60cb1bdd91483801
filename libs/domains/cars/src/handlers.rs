//! HTTP handlers for the Cars API
//!
//! Thin glue between the transport and the service layer. Identity
//! verification happens upstream; handlers receive the caller id through
//! the `AuthUser` extractor.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    AuthUser, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CarResult;
use crate::models::{Car, CreateCar, ImageRef, SearchQuery, UpdateCar};
use crate::repository::CarRepository;
use crate::service::CarService;
use crate::storage::ImageStore;

/// OpenAPI documentation for the Cars API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_cars,
        add_car,
        search_cars,
        get_car,
        update_car,
        delete_car,
    ),
    components(
        schemas(Car, ImageRef, CreateCar, UpdateCar),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Cars", description = "Car listing management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the cars router with all HTTP endpoints
pub fn router<R, S>(service: CarService<R, S>) -> Router
where
    R: CarRepository + 'static,
    S: ImageStore + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_cars).post(add_car))
        .route("/search", get(search_cars))
        .route(
            "/{id}",
            get(get_car).patch(update_car).delete(delete_car),
        )
        .with_state(shared_service)
}

/// List the caller's own listings
#[utoipa::path(
    get,
    path = "",
    tag = "Cars",
    responses(
        (status = 200, description = "The caller's listings, newest first", body = Vec<Car>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_cars<R: CarRepository, S: ImageStore>(
    State(service): State<Arc<CarService<R, S>>>,
    AuthUser(owner_id): AuthUser,
) -> CarResult<Json<Vec<Car>>> {
    let cars = service.list_by_owner(owner_id).await?;
    Ok(Json(cars))
}

/// Create a new listing
#[utoipa::path(
    post,
    path = "",
    tag = "Cars",
    request_body = CreateCar,
    responses(
        (status = 201, description = "Listing created successfully", body = Car),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_car<R: CarRepository, S: ImageStore>(
    State(service): State<Arc<CarService<R, S>>>,
    AuthUser(owner_id): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCar>,
) -> CarResult<impl IntoResponse> {
    let car = service.add_listing(input, owner_id).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

/// Search listings globally by keyword
#[utoipa::path(
    get,
    path = "/search",
    tag = "Cars",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching listings across all owners", body = Vec<Car>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_cars<R: CarRepository, S: ImageStore>(
    State(service): State<Arc<CarService<R, S>>>,
    AuthUser(_viewer): AuthUser,
    Query(query): Query<SearchQuery>,
) -> CarResult<Json<Vec<Car>>> {
    let cars = service.search(&query.keyword).await?;
    Ok(Json(cars))
}

/// Get a listing by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Cars",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing found", body = Car),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_car<R: CarRepository, S: ImageStore>(
    State(service): State<Arc<CarService<R, S>>>,
    AuthUser(_viewer): AuthUser,
    UuidPath(id): UuidPath,
) -> CarResult<Json<Car>> {
    let car = service.get_car(id).await?;
    Ok(Json(car))
}

/// Update a listing owned by the caller
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Cars",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = UpdateCar,
    responses(
        (status = 200, description = "Listing updated successfully", body = Car),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_car<R: CarRepository, S: ImageStore>(
    State(service): State<Arc<CarService<R, S>>>,
    AuthUser(owner_id): AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCar>,
) -> CarResult<Json<Car>> {
    let car = service.update_listing(id, input, owner_id).await?;
    Ok(Json(car))
}

/// Delete a listing owned by the caller, removing its stored images
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Cars",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Listing deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_car<R: CarRepository, S: ImageStore>(
    State(service): State<Arc<CarService<R, S>>>,
    AuthUser(owner_id): AuthUser,
    UuidPath(id): UuidPath,
) -> CarResult<impl IntoResponse> {
    service.delete_listing(id, owner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_IMAGES_PER_CAR;
    use crate::repository::MockCarRepository;
    use crate::storage::MockImageStore;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt; // for oneshot()
    use uuid::Uuid;

    async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn image_ref(name: &str) -> ImageRef {
        ImageRef {
            public_id: format!("cars/{}", name),
            url: format!("https://images.example.com/cars/{}.jpg", name),
        }
    }

    #[tokio::test]
    async fn test_add_car_handler_returns_201() {
        let owner = Uuid::now_v7();

        let mut storage = MockImageStore::new();
        storage
            .expect_upload()
            .times(1)
            .returning(|_| Ok(image_ref("hero")));
        storage.expect_name().return_const("mock");

        let mut repository = MockCarRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|input, images, created_by| Ok(Car::new(input, images, created_by)));

        let app = router(CarService::new(repository, storage));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header("x-user-id", owner.to_string())
            .body(Body::from(
                serde_json::to_string(&json!({
                    "title": "2019 Audi A4",
                    "description": "Single owner",
                    "tags": ["sedan"],
                    "car_type": "sedan",
                    "company": "Audi",
                    "dealer": "Main Street Motors",
                    "images": ["data:image/jpeg;base64,AAAA"]
                }))
                .unwrap(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let car: Car = json_body(response.into_body()).await;
        assert_eq!(car.title, "2019 Audi A4");
        assert_eq!(car.created_by, owner);
        assert_eq!(car.images.len(), 1);
    }

    #[tokio::test]
    async fn test_add_car_handler_validates_input() {
        let app = router(CarService::new(
            MockCarRepository::new(),
            MockImageStore::new(),
        ));

        // Empty title is rejected before the service is reached
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header("x-user-id", Uuid::now_v7().to_string())
            .body(Body::from(
                serde_json::to_string(&json!({
                    "title": "",
                    "description": "Single owner",
                    "images": ["data:image/jpeg;base64,AAAA"]
                }))
                .unwrap(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_car_handler_rejects_oversized_image_batch() {
        let app = router(CarService::new(
            MockCarRepository::new(),
            MockImageStore::new(),
        ));

        let images: Vec<String> =
            vec!["data:image/jpeg;base64,AAAA".to_string(); MAX_IMAGES_PER_CAR + 1];
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header("x-user-id", Uuid::now_v7().to_string())
            .body(Body::from(
                serde_json::to_string(&json!({
                    "title": "2019 Audi A4",
                    "description": "Single owner",
                    "images": images
                }))
                .unwrap(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_car_handler_requires_identity() {
        let app = router(CarService::new(
            MockCarRepository::new(),
            MockImageStore::new(),
        ));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_string(&json!({
                    "title": "2019 Audi A4",
                    "description": "Single owner",
                    "images": ["data:image/jpeg;base64,AAAA"]
                }))
                .unwrap(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_car_handler_hides_foreign_listings() {
        let mut repository = MockCarRepository::new();
        repository
            .expect_find_owned()
            .times(1)
            .returning(|_, _| Ok(None));

        let app = router(CarService::new(repository, MockImageStore::new()));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/{}", Uuid::now_v7()))
            .header("content-type", "application/json")
            .header("x-user-id", Uuid::now_v7().to_string())
            .body(Body::from(
                serde_json::to_string(&json!({ "title": "mine now" })).unwrap(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        // Indistinguishable from a listing that does not exist
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_cars_handler_returns_matches() {
        let owner = Uuid::now_v7();

        let mut repository = MockCarRepository::new();
        repository
            .expect_search()
            .withf(|keyword| keyword == "sedan")
            .times(1)
            .returning(move |_| {
                let input = CreateCar {
                    title: "2019 Audi A4".to_string(),
                    description: "Single owner".to_string(),
                    tags: vec!["sedan".to_string()],
                    car_type: "sedan".to_string(),
                    company: "Audi".to_string(),
                    dealer: "Main Street Motors".to_string(),
                    images: vec!["data:image/jpeg;base64,AAAA".to_string()],
                };
                Ok(vec![Car::new(input, vec![image_ref("hero")], owner)])
            });

        let app = router(CarService::new(repository, MockImageStore::new()));

        let request = Request::builder()
            .uri("/search?keyword=sedan")
            .header("x-user-id", Uuid::now_v7().to_string())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cars: Vec<Car> = json_body(response.into_body()).await;
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].tags, vec!["sedan"]);
    }

    #[tokio::test]
    async fn test_get_car_handler_rejects_invalid_uuid() {
        let app = router(CarService::new(
            MockCarRepository::new(),
            MockImageStore::new(),
        ));

        let request = Request::builder()
            .uri("/not-a-uuid")
            .header("x-user-id", Uuid::now_v7().to_string())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_car_handler_returns_204() {
        let owner = Uuid::now_v7();

        let mut repository = MockCarRepository::new();
        let existing = {
            let input = CreateCar {
                title: "2019 Audi A4".to_string(),
                description: "Single owner".to_string(),
                tags: vec![],
                car_type: String::new(),
                company: String::new(),
                dealer: String::new(),
                images: vec!["data:image/jpeg;base64,AAAA".to_string()],
            };
            Car::new(input, vec![image_ref("hero")], owner)
        };
        let id = existing.id;
        repository
            .expect_find_owned()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repository
            .expect_delete()
            .times(1)
            .returning(|_| Ok(true));

        let mut storage = MockImageStore::new();
        storage.expect_delete().times(1).returning(|_| Ok(()));

        let app = router(CarService::new(repository, storage));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}", id))
            .header("x-user-id", owner.to_string())
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
