use std::{net::IpAddr, sync::Arc};

use axum::Router;
use tokio::net::TcpListener;
use yzagere_core_contact_contracts::ContactService;
use yzagere_core_health_contracts::HealthService;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Phone number offered to visitors when a lead could not be delivered.
    pub fallback_phone: Arc<str>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthService,
    Contact: ContactService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(listener, router).await.map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let config = Arc::new(self.config);

        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into(), config));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::cors::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use yzagere_core_contact_contracts::{ContactRelayError, RelayOutcome};
    use yzagere_core_health_contracts::{HealthStatus, MockHealthService};
    use yzagere_demo::{FALLBACK_PHONE, JANE_DOE};
    use yzagere_models::contact::ContactFormFields;

    use super::*;

    struct PanickingContactService;

    impl ContactService for PanickingContactService {
        async fn relay(
            &self,
            _fields: ContactFormFields,
        ) -> Result<RelayOutcome, ContactRelayError> {
            panic!("relay exploded")
        }
    }

    #[tokio::test]
    async fn panic_response_allows_any_origin() {
        // Arrange
        let router = RestServer::new(
            MockHealthService::new(),
            PanickingContactService,
            RestServerConfig {
                fallback_phone: FALLBACK_PHONE.into(),
            },
        )
        .router();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&*JANE_DOE).unwrap()))
            .unwrap();

        // Act
        let response = router.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(response.headers().contains_key("X-Request-Id"));
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice::<serde_json::Value>(&body).unwrap();
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn health_allows_any_origin() {
        // Arrange
        let router = RestServer::new(
            MockHealthService::new().with_get_status(HealthStatus { email: true }),
            PanickingContactService,
            RestServerConfig {
                fallback_phone: FALLBACK_PHONE.into(),
            },
        )
        .router();

        // Act
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
