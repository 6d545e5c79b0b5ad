//! Identity-provider webhook endpoint.
//!
//! ```text
//! POST /api/v1/webhooks/clerk
//! svix-id: msg_2a
//! svix-timestamp: 1700000000
//! svix-signature: v1,K5oZfzN95Z9UVu1EsfQmfVNQhnkZ2pj9o9NDN/H/pI4=
//! {"type":"user.created","data":{"id":"user_29w83sxmDNGwOuEthce5gg56FcC"}}
//! ```
//!
//! The body is read as raw bytes because the signature covers the exact bytes
//! the provider sent.

use actix_web::{HttpRequest, post, web};
use serde_json::json;

use crate::domain::ports::SyncOutcome;
use crate::domain::{Error, MissingSignatureHeader, SignatureHeaders};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Receive a signed user lifecycle event.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/clerk",
    request_body(
        content = String,
        content_type = "application/json",
        description = "Signed event envelope, verified byte for byte"
    ),
    params(
        ("svix-id" = String, Header, description = "Delivery identifier"),
        ("svix-timestamp" = String, Header, description = "Delivery time in Unix seconds"),
        ("svix-signature" = String, Header, description = "Space-separated `v1,<base64>` signatures")
    ),
    responses(
        (status = 200, description = "Event processed or ignored", body = SyncOutcome),
        (status = 400, description = "Missing headers, failed verification or malformed event", body = Error),
        (status = 500, description = "Persistence or identity provider failure", body = Error)
    ),
    tags = ["webhooks"],
    operation_id = "receiveClerkWebhook",
    security([])
)]
#[post("/webhooks/clerk")]
pub async fn receive_clerk_webhook(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<SyncOutcome>> {
    let headers = signature_headers(&request)?;
    let outcome = state.webhooks.handle(&body, &headers).await?;
    Ok(web::Json(outcome))
}

fn signature_headers(request: &HttpRequest) -> Result<SignatureHeaders, Error> {
    SignatureHeaders::from_lookup(|name| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    })
    .map_err(map_missing_header)
}

fn map_missing_header(err: MissingSignatureHeader) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "header": err.header,
        "code": "missing_header",
    }))
}

#[cfg(test)]
mod tests;
