use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use helpdesk_client_core::{
    FilePart, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError,
};
use web_sys::{Blob, BlobPropertyBag, FormData, RequestCredentials};

/// `fetch` with credentials included, so the HTTP-only refresh cookie rides
/// along with every call.
#[derive(Debug, Clone, Copy, Default)]
pub(in crate::wasm) struct GlooTransport;

impl GlooTransport {
    pub(in crate::wasm) fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
            HttpMethod::Delete => Request::delete(&request.url),
        }
        .credentials(RequestCredentials::Include);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = build(builder, &request.body)?
            .send()
            .await
            .map_err(map_network_error)?;
        let status = response.status();
        let content_type = response.headers().get("content-type");
        let body = response
            .text()
            .await
            .map_err(|error| TransportError::new(format!("failed to read response: {error}")))?;
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn build(builder: RequestBuilder, body: &RequestBody) -> Result<Request, TransportError> {
    let request = match body {
        RequestBody::Empty => builder.build(),
        RequestBody::Json(json) => builder.body(json.clone()),
        RequestBody::Multipart(parts) => builder.body(form_data(parts)?),
    };
    request.map_err(|error| TransportError::new(format!("failed to build request: {error}")))
}

/// The browser writes the multipart boundary itself, so no content type
/// header is set for these bodies.
fn form_data(parts: &[FilePart]) -> Result<FormData, TransportError> {
    let form = FormData::new()
        .map_err(|_| TransportError::new("failed to create form data"))?;
    for part in parts {
        let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
        let sequence = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        if let Some(content_type) = &part.content_type {
            options.set_type(content_type);
        }
        let blob = Blob::new_with_u8_array_sequence_and_options(&sequence, &options)
            .map_err(|_| TransportError::new(format!("failed to wrap {}", part.filename)))?;
        form.append_with_blob_and_filename(&part.field, &blob, &part.filename)
            .map_err(|_| TransportError::new(format!("failed to attach {}", part.filename)))?;
    }
    Ok(form)
}

fn map_network_error(error: gloo_net::Error) -> TransportError {
    TransportError::new(error.to_string())
}
