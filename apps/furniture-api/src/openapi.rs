//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Furniture Designs API",
        version = "0.1.0",
        description = "Catalogue of furniture designs stored in MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/items", api = domain_items::ApiDoc)
    ),
    tags(
        (name = "Items", description = "Furniture design endpoints")
    )
)]
pub struct ApiDoc;
