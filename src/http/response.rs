//! Response writer handed to handlers.
//!
//! # Responsibilities
//! - Buffer status, headers and body written by handlers
//! - Deliver the finished response to the host exactly once
//! - Small helpers for JSON bodies and error replies
//!
//! # Design Decisions
//! - Finishing twice is a logged no-op, so a terminal running after a
//!   handler that already answered cannot clobber the reply
//! - Delivery goes through a one-shot channel; a writer dropped unfinished
//!   closes the channel and the host answers 500

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::handler::HandlerError;

/// Receiving half of [`Response::channel`].
pub type ResponseReceiver = oneshot::Receiver<axum::response::Response>;

/// Errors raised by the response helpers.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Failed to serialize JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// A response being written by the handler chain.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    finished: bool,
    sink: Option<oneshot::Sender<axum::response::Response>>,
}

impl Response {
    /// Create a writer together with the receiver that yields the finished response.
    pub fn channel() -> (Self, ResponseReceiver) {
        let (tx, rx) = oneshot::channel();
        let response = Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            finished: false,
            sink: Some(tx),
        };
        (response, rx)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Whether the response has already been handed to the host.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Append a chunk to the buffered body.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        if self.finished {
            tracing::debug!("Write after response finished ignored");
            return;
        }
        self.body.extend_from_slice(chunk.as_ref());
    }

    /// Append `body` and finish the response.
    pub fn end(&mut self, body: impl Into<Bytes>) {
        let body = body.into();
        self.write(&body);
        self.finish();
    }

    /// Finish the response with whatever has been written so far.
    pub fn finish(&mut self) {
        if self.finished {
            tracing::debug!(status = %self.status, "Response already finished");
            return;
        }
        self.finished = true;

        let body = Body::from(std::mem::take(&mut self.body));
        let mut response = axum::response::Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();

        if let Some(sink) = self.sink.take() {
            if sink.send(response).is_err() {
                tracing::debug!("Response receiver dropped before delivery");
            }
        }
    }

    /// Serialize `value` as the JSON body and finish.
    pub fn send_json<T: Serialize>(&mut self, value: &T) -> Result<(), ResponseError> {
        let body = serde_json::to_vec(value)?;
        self.set_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.end(body);
        Ok(())
    }

    /// Answer with the status inferred from `err` and its message as body.
    pub fn send_error(&mut self, err: &HandlerError) {
        self.set_status(err.status_code());
        self.set_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.end(format!("Error: {}", err.message()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_end_delivers_once() {
        let (mut res, rx) = Response::channel();
        res.set_status(StatusCode::CREATED);
        res.write("Hi ");
        res.end("there!");
        assert!(res.is_finished());

        // Second finish is a no-op.
        res.set_status(StatusCode::NOT_FOUND);
        res.end("ignored");

        let response = rx.await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_text(response).await, "Hi there!");
    }

    #[tokio::test]
    async fn test_send_json_sets_content_type() {
        let (mut res, rx) = Response::channel();
        res.send_json(&serde_json::json!({"id": "test", "result": "success"}))
            .unwrap();

        let response = rx.await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            body_text(response).await,
            r#"{"id":"test","result":"success"}"#
        );
    }

    #[tokio::test]
    async fn test_send_error_uses_error_status() {
        let (mut res, rx) = Response::channel();
        let err =
            HandlerError::new("Method Not Allowed").with_status(StatusCode::METHOD_NOT_ALLOWED);
        res.send_error(&err);

        let response = rx.await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_text(response).await, "Error: Method Not Allowed");
    }

    #[tokio::test]
    async fn test_dropped_writer_closes_channel() {
        let (res, rx) = Response::channel();
        drop(res);
        assert!(rx.await.is_err());
    }
}
