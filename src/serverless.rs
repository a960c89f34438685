use lambda_http::http::header::{CONTENT_TYPE, ORIGIN};
use lambda_http::{service_fn, Body, Error, Request, Response};
use crate::contact_mailer::{ContactMailer, SUCCESS_MESSAGE};

/// Answer one API Gateway / function URL event.
///
/// Failures of the submission itself are regular responses; `Err` is left
/// to problems building the response.
#[tracing::instrument(
    name = "Handle function invocation",
    skip(mailer, event),
    fields(http.method = %event.method())
)]
pub async fn function_handler(
    mailer: &ContactMailer,
    event: Request
) -> Result<Response<Body>, Error> {
    let origin = event
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok());

    let (status, text) = match mailer
        .handle(event.method().as_str(), origin, event.body().as_ref())
        .await
    {
        Ok(()) => (200, SUCCESS_MESSAGE.to_string()),
        Err(e) => {
            tracing::warn!(error.cause_chain = ?e, "Submission was not delivered");
            (e.http_status(), e.to_string())
        }
    };

    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(text))?;
    Ok(response)
}

/// Serve invocations until the runtime shuts the function down
pub async fn run(mailer: ContactMailer) -> Result<(), Error> {
    lambda_http::run(service_fn(|event: Request| function_handler(&mailer, event))).await
}
