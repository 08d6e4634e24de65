//! HTTP front end. `POST /` or `POST /generate` with the prompt as the raw body
//! and generation parameters in the query string.

use std::collections::HashMap;

use actix_web::{
    http::header::{self, ContentType},
    web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use uuid::Uuid;

use crate::{
    config::Config,
    handler::{report_failure, HandlerResponse, ImageService},
    models::RawRequest,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn run(config: &Config, service: ImageService) -> std::io::Result<()> {
    let service = web::Data::new(service);

    HttpServer::new(move || App::new().app_data(service.clone()).configure(routes))
        .bind(config.bind_address())?
        .run()
        .await
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::post().to(generate))
        .route("/generate", web::post().to(generate))
        .route("/health", web::get().to(health));
}

async fn health() -> impl Responder {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body("ok")
}

async fn generate(
    req: HttpRequest,
    body: String,
    service: web::Data<ImageService>,
) -> HttpResponse {
    let raw = raw_request(&req, body);
    let request_id = raw.request_id().to_string();

    if !wants_png(&req) {
        let response = service.handle(&raw).await;
        return to_http(response, &request_id);
    }

    let decoded = match service.generate(&raw).await {
        Ok(image) => image.decode_image(),
        Err(e) => Err(e),
    };
    match decoded {
        Ok(bytes) => HttpResponse::Ok()
            .insert_header((REQUEST_ID_HEADER, request_id))
            .content_type("image/png")
            .body(bytes),
        Err(e) => to_http(report_failure(&raw, &e), &request_id),
    }
}

/// Build the transport-neutral request. An empty query string means no
/// parameters at all, which is not the same as an empty parameter map.
fn raw_request(req: &HttpRequest, body: String) -> RawRequest {
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .cloned()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let query_parameters = match req.query_string() {
        "" => None,
        query => Some(
            web::Query::<HashMap<String, String>>::from_query(query)
                .map(web::Query::into_inner)
                .unwrap_or_default(),
        ),
    };

    RawRequest {
        request_id: Some(request_id),
        body,
        query_parameters,
        headers,
    }
}

fn wants_png(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |accept| accept.trim().eq_ignore_ascii_case("image/png"))
}

fn to_http(response: HandlerResponse, request_id: &str) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(response.status_code)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status)
        .insert_header((REQUEST_ID_HEADER, request_id.to_string()))
        .content_type(ContentType::plaintext())
        .body(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::{Behaviour, MockBackend, FOX_BASE64};
    use actix_web::test;
    use std::sync::Arc;
    use std::time::Duration;

    fn app_data(backend: &Arc<MockBackend>) -> web::Data<ImageService> {
        web::Data::new(ImageService::new(backend.clone(), Duration::from_secs(10)))
    }

    #[actix_web::test]
    async fn test_generate_returns_base64_image() {
        let backend = Arc::new(MockBackend::succeeding());
        let app = test::init_service(App::new().app_data(app_data(&backend)).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/generate?cfg_scale=9&steps=30&width=1216&height=832")
            .insert_header((REQUEST_ID_HEADER, "req-1"))
            .set_payload("a red fox in snow")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-1");
        let body = test::read_body(resp).await;
        assert_eq!(body, FOX_BASE64.as_bytes());

        let sent = backend.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(sent["steps"], 30);
        assert_eq!(sent["width"], 1216);
        assert_eq!(sent["height"], 832);
        assert_eq!(sent["text_prompts"][0]["text"], "a red fox in snow");
    }

    #[actix_web::test]
    async fn test_invalid_resolution_is_bad_request() {
        let backend = Arc::new(MockBackend::succeeding());
        let app = test::init_service(App::new().app_data(app_data(&backend)).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/?width=1024&height=999")
            .set_payload("a red fox in snow")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).starts_with("unsupported resolution"));
        assert_eq!(backend.calls(), 0);
    }

    #[actix_web::test]
    async fn test_png_accept_header_returns_decoded_bytes() {
        let backend = Arc::new(MockBackend::succeeding());
        let app = test::init_service(App::new().app_data(app_data(&backend)).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .insert_header((header::ACCEPT, "image/png"))
            .set_payload("a red fox in snow")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"\x89PNG\r\n\x1a\n");
    }

    #[actix_web::test]
    async fn test_png_failures_map_like_base64_failures() {
        let backend = Arc::new(MockBackend::new(Behaviour::Respond(
            br#"{"artifacts":[{"base64":"not base64!","finishReason":"SUCCESS"}]}"#.to_vec(),
        )));
        let app = test::init_service(App::new().app_data(app_data(&backend)).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .insert_header((header::ACCEPT, "image/png"))
            .insert_header((REQUEST_ID_HEADER, "req-png"))
            .set_payload("a red fox in snow")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-png");
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("invalid base64 image"));

        let req = test::TestRequest::post()
            .uri("/generate?steps=5")
            .insert_header((header::ACCEPT, "image/png"))
            .set_payload("a red fox in snow")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        assert_eq!(backend.calls(), 1);
    }

    #[actix_web::test]
    async fn test_health() {
        let backend = Arc::new(MockBackend::succeeding());
        let app = test::init_service(App::new().app_data(app_data(&backend)).configure(routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_raw_request_without_query_has_no_parameters() {
        let req = test::TestRequest::post().uri("/generate").to_http_request();
        let raw = raw_request(&req, "prompt".into());
        assert!(raw.query_parameters.is_none());
        assert!(raw.request_id.is_some());

        let req = test::TestRequest::post()
            .uri("/generate?seed=42")
            .to_http_request();
        let raw = raw_request(&req, "prompt".into());
        assert_eq!(
            raw.query_parameters.unwrap().get("seed").map(String::as_str),
            Some("42")
        );
    }
}
