//! Fixed responders for configured static routes.

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::config::{StaticRouteConfig, ValidationError};
use crate::handler::Middleware;
use crate::http::{Request, Response};
use crate::routing::{MethodFilter, Mount, Next};

/// A handler that always answers with the same response.
#[derive(Debug, Clone)]
pub struct FixedResponse {
    status: StatusCode,
    body: Bytes,
    content_type: Option<HeaderValue>,
}

impl FixedResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: HeaderValue) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

impl Middleware for FixedResponse {
    fn call(&self, _req: Request, mut res: Response, _next: Next) -> BoxFuture<'static, ()> {
        res.set_status(self.status);
        if let Some(content_type) = &self.content_type {
            res.set_header(header::CONTENT_TYPE, content_type.clone());
        }
        res.end(self.body.clone());
        futures_util::future::ready(()).boxed()
    }
}

/// Build the layer registration for a configured static route.
pub fn static_route(index: usize, route: &StaticRouteConfig) -> Result<Mount, ValidationError> {
    let method = match &route.method {
        Some(token) => token
            .parse::<MethodFilter>()
            .map_err(|_| ValidationError::RouteMethod {
                index,
                method: token.clone(),
            })?,
        None => MethodFilter::Any,
    };

    let status = StatusCode::from_u16(route.status).map_err(|_| ValidationError::RouteStatus {
        index,
        status: route.status,
    })?;

    let mut responder = FixedResponse::new(status, route.body.clone());
    if let Some(content_type) = &route.content_type {
        let value = HeaderValue::from_str(content_type)
            .map_err(|_| ValidationError::RouteContentType { index })?;
        responder = responder.with_content_type(value);
    }

    Ok(Mount::normal(responder).at(route.path.clone()).method(method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Router;
    use axum::http::Method;

    fn config(method: Option<&str>) -> StaticRouteConfig {
        StaticRouteConfig {
            method: method.map(str::to_string),
            path: "/health".into(),
            status: 204,
            body: String::new(),
            content_type: Some("text/plain".into()),
        }
    }

    #[tokio::test]
    async fn test_static_route_answers() {
        let router = Router::builder()
            .mount(static_route(0, &config(Some("get"))).unwrap())
            .build();

        let response = router.respond(Request::new(Method::GET, "/health")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");

        let response = router.respond(Request::new(Method::POST, "/health")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_method_is_rejected() {
        let err = static_route(3, &config(Some("NOT VALID"))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RouteMethod {
                index: 3,
                method: "NOT VALID".into()
            }
        );
    }
}
