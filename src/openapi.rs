use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Forge API",
        version = env!("CARGO_PKG_VERSION"),
        description = r#"
# Workshop Management API

Backend for an automotive workshop: clients and their equipment, work
orders with parts and labor, inventory with a full reservation
lifecycle, invoicing, OEM part catalogs, purchasing and pricing.

## Authentication

All endpoints under `/api/v1` require a JWT. Obtain one from
`/auth/login` and send it as `Authorization: Bearer <token>`.

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20,
max 100) query parameters and wrap results in a `pagination` envelope.
        "#
    ),
    servers(
        (url = "http://localhost:8080/api/v1", description = "Local development")
    ),
    tags(
        (name = "Clients", description = "Clients and technicians"),
        (name = "Equipment", description = "Equipment units and types"),
        (name = "Products", description = "Product master, taxonomy and warehouses"),
        (name = "Inventory", description = "Stock levels, movements and replenishment"),
        (name = "Work Orders", description = "Work order lifecycle, parts and labor"),
        (name = "Invoices", description = "Invoicing and payments"),
        (name = "Purchasing", description = "Suppliers and purchase orders"),
        (name = "Pricing", description = "Price lists and price resolution"),
        (name = "Catalog", description = "OEM brands, parts, equivalences and fitments"),
        (name = "Analytics", description = "Dashboard, ABC classification and alerts"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
