//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CarHub API",
        version = "0.1.0",
        description = "Car marketplace listing API backed by MongoDB and Cloudinary",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/cars", api = domain_cars::ApiDoc)
    ),
    tags(
        (name = "Cars", description = "Car listing management endpoints")
    )
)]
pub struct ApiDoc;
