use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use crate::contact_mailer::{ContactMailer, SendMailError, SUCCESS_MESSAGE};

impl ResponseError for SendMailError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(ContentType::plaintext());
        if let SendMailError::MethodNotAllowed = self {
            response.insert_header((header::ALLOW, "POST"));
        }
        response.body(self.to_string())
    }
}

/// Registered for every method so that anything but POST gets a 405
/// rather than a 404.
#[tracing::instrument(
    name = "Send contact form email",
    skip(request, body, mailer)
)]
pub async fn send_mail(
    request: HttpRequest,
    // Raw bytes: the body is JSON regardless of the declared content type
    body: web::Bytes,
    mailer: web::Data<ContactMailer>
) -> Result<HttpResponse, SendMailError> {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    mailer
        .handle(request.method().as_str(), origin, &body)
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(SUCCESS_MESSAGE))
}
