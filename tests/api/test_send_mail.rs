use secrecy::Secret;
use wiremock::matchers::{any, basic_auth, method, path};
use wiremock::{Mock, ResponseTemplate};
use crate::helpers::{spawn_app, spawn_app_with, ALLOWED_ORIGIN};

fn contact_form() -> String {
    serde_json::json!({
        "email": "ursula_le_guin@gmail.com",
        "phone": "+1 555 0100",
        "message": "I'd like a quote."
    })
        .to_string()
}

#[tokio::test]
async fn test_send_mail_returns_200_for_a_valid_submission() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .and(method("POST"))
        .and(basic_auth("public-key", "private-key"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_mail(contact_form()).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Email sent successfully");
}

#[tokio::test]
async fn test_send_mail_forwards_the_form_to_the_fixed_recipient() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    app.post_send_mail(contact_form())
        .await
        .error_for_status()
        .unwrap();

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "Messages": [{
                "From": { "Email": "sender@example.com", "Name": "Your Business Name" },
                "To": [{ "Email": "destination@example.com", "Name": "Recipient Name" }],
                "Subject": "New Contact Form Submission",
                "TextPart": "Email: ursula_le_guin@gmail.com\nPhone: +1 555 0100\nMessage: I'd like a quote."
            }]
        })
    );
}

#[tokio::test]
async fn test_send_mail_returns_405_for_other_methods() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        reqwest::Method::GET,
        reqwest::Method::PUT,
        reqwest::Method::DELETE,
        reqwest::Method::PATCH,
    ];

    for http_method in test_cases {
        let response = app
            .send_mail_request(http_method.clone(), Some(ALLOWED_ORIGIN), contact_form())
            .await;

        assert_eq!(
            405,
            response.status().as_u16(),
            "API did not fail with 405 for {}",
            http_method
        );
        assert_eq!(response.headers()["allow"], "POST");
        assert_eq!(response.text().await.unwrap(), "Method not allowed");
    }
}

#[tokio::test]
async fn test_send_mail_returns_401_for_a_foreign_or_missing_origin() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        (Some("https://evil.example.com"), "foreign origin"),
        (Some("https://contact.example.com/"), "trailing slash"),
        (Some("http://contact.example.com"), "different scheme"),
        (None, "missing origin"),
    ];

    for (origin, description) in test_cases {
        let response = app
            .send_mail_request(reqwest::Method::POST, origin, contact_form())
            .await;

        assert_eq!(
            401,
            response.status().as_u16(),
            "API did not fail with 401 for {}",
            description
        );
        assert_eq!(response.text().await.unwrap(), "Unauthorized origin");
    }
}

#[tokio::test]
async fn test_send_mail_returns_400_for_invalid_json() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        ("".to_string(), "empty body"),
        ("email=ursula%40example.com".to_string(), "form encoded body"),
        (r#"{"email": "ursula@example.com""#.to_string(), "truncated json"),
        (r#"{"message": ["a", "b"]}"#.to_string(), "wrong field type"),
    ];

    for (invalid_body, description) in test_cases {
        let response = app.post_send_mail(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "API did not fail with 400 for {}",
            description
        );
        assert_eq!(response.text().await.unwrap(), "Invalid JSON data");
    }
}

#[tokio::test]
async fn test_send_mail_accepts_missing_fields() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_mail(r#"{"message": "Call me back"}"#.to_string()).await;

    assert_eq!(response.status().as_u16(), 200);
}

async fn text_part_sent_for(app: &crate::helpers::TestApp, body: &str) -> String {
    app.post_send_mail(body.to_string())
        .await
        .error_for_status()
        .unwrap();

    let email_request = app.email_server.received_requests().await.unwrap().pop().unwrap();
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    body["Messages"][0]["TextPart"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_send_mail_keeps_the_content_of_capitalised_keys() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let text_part = text_part_sent_for(
        &app,
        r#"{"Email":"ursula@example.com","Phone":"123","Message":"Hello"}"#
    )
        .await;

    assert_eq!(text_part, "Email: ursula@example.com\nPhone: 123\nMessage: Hello");
}

#[tokio::test]
async fn test_send_mail_uses_the_last_of_repeated_keys() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let text_part = text_part_sent_for(
        &app,
        r#"{"email":"first@example.com","message":"Hi","email":"second@example.com"}"#
    )
        .await;

    assert_eq!(text_part, "Email: second@example.com\nPhone: \nMessage: Hi");
}

#[tokio::test]
async fn test_send_mail_treats_a_null_body_as_an_empty_form() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let text_part = text_part_sent_for(&app, "null").await;

    assert_eq!(text_part, "Email: \nPhone: \nMessage: ");
}

#[tokio::test]
async fn test_send_mail_returns_500_when_credentials_are_blank() {
    let app = spawn_app_with(|c| {
        c.email_client.secret_key = Secret::new("".to_string());
    })
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_mail(contact_form()).await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.text().await.unwrap(), "Server configuration error");
}

#[tokio::test]
async fn test_send_mail_still_rejects_bad_json_before_configuration() {
    let app = spawn_app_with(|c| {
        c.email_client.sender_email = "".to_string();
    })
        .await;

    let response = app.post_send_mail("{".to_string()).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_send_mail_surfaces_the_mailjet_error_body() {
    let app = spawn_app().await;

    Mock::given(path("/v3.1/send"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"ErrorMessage":"Invalid sender"}"#)
        )
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_send_mail(contact_form()).await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(
        response.text().await.unwrap(),
        r#"Error sending email: mailjet error: {"ErrorMessage":"Invalid sender"}"#
    );
}

#[tokio::test]
async fn test_send_mail_returns_500_when_mailjet_is_unreachable() {
    let app = spawn_app_with(|c| {
        // Nothing listens on the discard port
        c.email_client.base_url = "http://127.0.0.1:9".to_string();
    })
        .await;

    let response = app.post_send_mail(contact_form()).await;

    assert_eq!(response.status().as_u16(), 500);
    assert!(response
        .text()
        .await
        .unwrap()
        .starts_with("Error sending email: error sending request to Mailjet"));
}
