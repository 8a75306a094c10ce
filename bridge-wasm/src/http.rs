//! WebAssembly implementation of the `HttpClient` bridge trait.
//!
//! The bootstrapper downloads the module binary through this client. Requests
//! go to the browser's `fetch` API and the response body is read in full as
//! bytes.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    http::{HttpClient, HttpRequest, HttpResponse},
};
use bytes::Bytes;
use js_sys::{try_iter, Array, Uint8Array};
use std::collections::HashMap;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, Window};

use crate::error::js_error;

fn fetch_error(context: &str, err: JsValue) -> BridgeError {
    js_error(&format!("WasmHttpClient {context}"), err)
}

/// WebAssembly HTTP client backed by the browser's `fetch` API.
pub struct WasmHttpClient {
    window: Window,
}

impl WasmHttpClient {
    /// Create a new client bound to the current browser window.
    pub fn new() -> BridgeResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".to_string()))?;
        Ok(Self { window })
    }

    fn to_fetch_request(request: &HttpRequest) -> BridgeResult<Request> {
        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_mode(RequestMode::Cors);

        Request::new_with_str_and_init(&request.url, &init)
            .map_err(|err| fetch_error("build request", err))
    }

    async fn send(&self, request: &Request) -> BridgeResult<Response> {
        JsFuture::from(self.window.fetch_with_request(request))
            .await
            .map_err(|err| fetch_error("fetch", err))?
            .dyn_into::<Response>()
            .map_err(|_| BridgeError::OperationFailed("fetch returned non-Response".into()))
    }

    async fn body_bytes(response: &Response) -> BridgeResult<Bytes> {
        let buffer = response
            .array_buffer()
            .map_err(|err| fetch_error("response.array_buffer", err))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|err| fetch_error("response buffer", err))?;
        Ok(Bytes::from(Uint8Array::new(&buffer).to_vec()))
    }

    fn header_map(response: &Response) -> BridgeResult<HashMap<String, String>> {
        let entries = try_iter(response.headers().as_ref())
            .map_err(|err| fetch_error("iterate headers", err))?
            .ok_or_else(|| BridgeError::OperationFailed("Headers iterator unavailable".into()))?;

        let mut headers = HashMap::new();
        for entry in entries {
            let pair = Array::from(&entry.map_err(|err| fetch_error("header iteration", err))?);
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                headers.insert(name, value);
            }
        }
        Ok(headers)
    }
}

#[async_trait(?Send)]
impl HttpClient for WasmHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        let fetch_request = Self::to_fetch_request(&request)?;
        let response = self.send(&fetch_request).await?;
        let body = Self::body_bytes(&response).await?;
        let headers = Self::header_map(&response)?;
        debug!(
            url = %request.url,
            status = response.status(),
            bytes = body.len(),
            "fetch completed"
        );

        Ok(HttpResponse {
            status: response.status(),
            headers,
            body,
        })
    }
}
