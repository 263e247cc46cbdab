//! Form Extraction
//!
//! Reads submitted expense fields from url-encoded or multipart bodies.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};

use crate::domain::FormFields;

/// Fields of a submitted form.
///
/// Never rejects: an unreadable body or unsupported content type yields no
/// fields, so the submission fails validation like any incomplete form.
#[derive(Debug, Default)]
pub struct SubmittedFields(pub FormFields);

#[async_trait]
impl<S> FromRequest<S> for SubmittedFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let fields = if is_multipart(&req) {
            read_multipart(req, state).await
        } else {
            read_urlencoded(req, state).await
        };

        Ok(Self(fields.unwrap_or_else(|reason| {
            tracing::debug!(reason = %reason, "Unreadable form body, treating as empty");
            FormFields::new()
        })))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

async fn read_urlencoded<S>(req: Request, state: &S) -> Result<FormFields, String>
where
    S: Send + Sync,
{
    Form::<FormFields>::from_request(req, state)
        .await
        .map(|Form(fields)| fields)
        .map_err(|e| e.body_text())
}

/// Text parts only; file parts are skipped
async fn read_multipart<S>(req: Request, state: &S) -> Result<FormFields, String>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| e.body_text())?;

    let mut fields = FormFields::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await.map_err(|e| e.body_text())?;
        fields.insert(name, value);
    }
    Ok(fields)
}
