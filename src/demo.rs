//! Reference application served by the `copilot` binary.
//!
//! Exercises every registration form and both handler kinds:
//!
//! ```text
//! *      /                      request logger, always continues
//! *      /hello                 "Hi there!" (also /hello.json, /hello/...)
//! *      /multi/handler         two-entry sequence, second answers
//! GET    /api/retrieve          JSON for ?id=test, else continue
//! GET    /api/retrieve          400 with usage hint
//! *      /api/retrieve          405 for every other method
//! *      /cause/an/error        raises an error
//! *      /error/multi/handler   first entry raises, second never runs
//! *      /                      recovery: 500 "Error: <message>"
//! POST   /                      raises 405 Method Not Allowed
//! *      /                      custom 404
//! *      /                      same 404, spelled with an explicit `*`
//! *      /                      recovery: error status + message
//! ```

use axum::http::{Method, StatusCode};
use serde::Serialize;

use crate::config::{AppConfig, ValidationError};
use crate::handler::HandlerError;
use crate::http::{DefaultTerminal, Request, Response};
use crate::routing::{static_route, MethodFilter, Mount, Next, Router, RouterBuilder};

#[derive(Serialize)]
struct RetrieveResult<'a> {
    id: &'a str,
    result: &'a str,
}

async fn log_request(req: Request, res: Response, next: Next) {
    let query = serde_json::to_string(req.query()).unwrap_or_default();
    tracing::info!(route = %req.route(), path = %req.path(), query = %query, "Request received");
    next.run(req, res).await
}

async fn hello(_req: Request, mut res: Response, _next: Next) {
    res.end("Hi there!");
}

async fn first_of_two(req: Request, res: Response, next: Next) {
    tracing::info!(route = %req.route(), "First handler");
    next.run(req, res).await
}

async fn second_of_two(_req: Request, mut res: Response, _next: Next) {
    res.end("Success");
}

async fn retrieve(req: Request, mut res: Response, next: Next) {
    if req.query().get("id") != Some("test") {
        return next.run(req, res).await;
    }

    let body = RetrieveResult {
        id: "test",
        result: "success",
    };
    if let Err(e) = res.send_json(&body) {
        return next.fail(HandlerError::from_source(e), req, res).await;
    }
}

async fn retrieve_usage(_req: Request, mut res: Response, _next: Next) {
    res.set_status(StatusCode::BAD_REQUEST);
    res.end("You must call this URL with the query string ?id=test");
}

async fn retrieve_wrong_method(_req: Request, mut res: Response, _next: Next) {
    res.set_status(StatusCode::METHOD_NOT_ALLOWED);
    res.end("Must use GET method");
}

async fn cause_error(req: Request, res: Response, next: Next) {
    next.fail("This is an error message.", req, res).await
}

async fn skip_to_error(req: Request, res: Response, next: Next) {
    tracing::info!(route = %req.route(), "First handler");
    next.fail("Skip to the error handler.", req, res).await
}

async fn report_error(err: HandlerError, _req: Request, mut res: Response, _next: Next) {
    res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    res.end(format!("Error: {}", err.message()));
}

async fn reject_post(req: Request, res: Response, next: Next) {
    let err = HandlerError::new("Method Not Allowed").with_status(StatusCode::METHOD_NOT_ALLOWED);
    next.fail(err, req, res).await
}

async fn custom_not_found(_req: Request, mut res: Response, _next: Next) {
    res.set_status(StatusCode::NOT_FOUND);
    res.end("Custom Not Found");
}

async fn report_error_status(err: HandlerError, _req: Request, mut res: Response, _next: Next) {
    res.send_error(&err);
}

/// Register the demo layers on `builder`.
pub fn mount_demo(builder: RouterBuilder) -> RouterBuilder {
    builder
        .any(log_request)
        .route("/hello", hello)
        .mount(Mount::normal(first_of_two).then(second_of_two).at("/multi/handler"))
        .on(Method::GET, "/api/retrieve", retrieve)
        .on(Method::GET, "/api/retrieve", retrieve_usage)
        .route("/api/retrieve", retrieve_wrong_method)
        .route("/cause/an/error", cause_error)
        .mount(Mount::normal(skip_to_error).then(second_of_two).at("/error/multi/handler"))
        .recover(report_error)
        .mount(Mount::normal(reject_post).method(Method::POST))
        .any(custom_not_found)
        .mount(Mount::normal(custom_not_found).at("/").method(MethodFilter::Any))
        .recover(report_error_status)
}

/// Configured static routes, then the demo layers.
pub fn demo_router(config: &AppConfig) -> Result<Router, ValidationError> {
    let mut builder = Router::builder()
        .terminal(DefaultTerminal::new().expose_errors(config.dispatch.expose_errors));

    for (index, route) in config.routes.iter().enumerate() {
        builder = builder.mount(static_route(index, route)?);
    }

    Ok(mount_demo(builder).build())
}
