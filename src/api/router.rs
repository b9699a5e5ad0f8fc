//! API router.
//!
//! Returns a composable `Router`. Routes are nested under `/api/`; stored
//! uploads are served statically under `/files/`.
//!
//! Everything under `/api/` except company registration requires resolved
//! identity headers (see `middleware::auth`). Handlers use
//! `State<ApiContext>`; the middleware reads the same context from an
//! `Extension` layer, which therefore must be outermost.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::ingest::MAX_UPLOAD_SIZE;

/// Build the full application router.
pub fn api_router(ctx: ApiContext) -> Router {
    // Protected routes — identity headers verified against the roster.
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/tickets",
            get(endpoints::tickets::list).post(endpoints::tickets::create),
        )
        .route("/tickets/summary", get(endpoints::tickets::summary))
        .route("/tickets/calendar", get(endpoints::tickets::calendar))
        .route(
            "/tickets/:id",
            get(endpoints::tickets::detail)
                .put(endpoints::tickets::update)
                .delete(endpoints::tickets::remove),
        )
        .route("/tickets/:id/archive", post(endpoints::tickets::archive))
        .route(
            "/tickets/:id/refresh-request",
            post(endpoints::tickets::refresh_request),
        )
        .route("/tickets/:id/no-show", post(endpoints::tickets::no_show))
        .route("/jobs", get(endpoints::jobs::list).post(endpoints::jobs::create))
        .route(
            "/jobs/:id",
            get(endpoints::jobs::detail)
                .put(endpoints::jobs::update)
                .delete(endpoints::jobs::remove),
        )
        .route("/jobs/:id/complete", post(endpoints::jobs::complete))
        .route(
            "/jobs/:id/prints",
            get(endpoints::prints::list).post(endpoints::prints::upload),
        )
        .route("/prints/:id", delete(endpoints::prints::remove))
        .route("/prints/:id/pin", post(endpoints::prints::pin))
        .route("/prints/:id/pages/:page", get(endpoints::prints::render_page))
        .route(
            "/prints/:id/markers",
            get(endpoints::markers::list).post(endpoints::markers::create),
        )
        .route("/markers/:id", delete(endpoints::markers::remove))
        .route("/markers/:id/replace", post(endpoints::markers::replace))
        .route(
            "/photos",
            get(endpoints::photos::list).post(endpoints::photos::upload),
        )
        .route("/photos/:id", delete(endpoints::photos::remove))
        .route("/team", get(endpoints::team::list).post(endpoints::team::add))
        .route("/team/:id", delete(endpoints::team::remove))
        .with_state(ctx.clone())
        // Middleware stack: Extension must be outermost so the identity
        // middleware can extract ApiContext.
        .layer(axum::middleware::from_fn(middleware::auth::require_identity))
        .layer(axum::Extension(ctx.clone()));

    // Unprotected: tenant bootstrap — there is no roster to check yet.
    let unprotected = Router::new()
        .route("/companies", post(endpoints::team::register))
        .with_state(ctx.clone());

    // Stored uploads, addressed by the opaque URLs handed out at upload time.
    let files = Router::new().nest_service("/files", ServeDir::new(ctx.core.files().root()));

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .merge(files)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE as usize + 1024 * 1024))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::api::types::local_now;
    use crate::core_state::CoreState;
    use crate::render::MockPdfPageRenderer;
    use crate::team::{register_company, NewCompany};

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x01];

    struct Identity {
        company_id: Uuid,
        member_id: Uuid,
    }

    /// Context backed by a tempdir and a 3-page mock renderer.
    /// The tempdir guard must be kept alive for the duration of the test.
    async fn test_ctx() -> (ApiContext, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = Arc::new(CoreState::with_root(tmp.path()).unwrap());
        core.ensure_ready().await.unwrap();
        let ctx = ApiContext::new(core, Arc::new(MockPdfPageRenderer::new(3)));
        (ctx, tmp)
    }

    async fn seed_identity(ctx: &ApiContext) -> Identity {
        let conn = ctx.core.open_db().unwrap();
        let (company, owner) = register_company(
            &conn,
            NewCompany {
                name: "Acme Underground".into(),
                owner_name: "Dana".into(),
                owner_email: "dana@acme.example".into(),
            },
            local_now(),
        )
        .unwrap();
        Identity { company_id: company.id, member_id: owner.id }
    }

    fn request(
        method: &str,
        uri: &str,
        identity: Option<&Identity>,
        json_body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = identity {
            builder = builder
                .header("X-Member-Id", id.member_id.to_string())
                .header("X-Company-Id", id.company_id.to_string());
        }
        match json_body {
            Some(value) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn multipart_request(
        uri: &str,
        identity: &Identity,
        text_fields: &[(&str, &str)],
        file_name: &str,
        file_bytes: &[u8],
    ) -> Request<Body> {
        const BOUNDARY: &str = "test-boundary-7d9f";
        let mut body = Vec::new();
        for (name, value) in text_fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file_bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header("X-Member-Id", identity.member_id.to_string())
            .header("X-Company-Id", identity.company_id.to_string())
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn ticket_body(no: &str, work: &str, expires: &str) -> serde_json::Value {
        serde_json::json!({
            "job_number": "J-100",
            "ticket_no": no,
            "street": "12 Main St",
            "cross_street": null,
            "county": null,
            "city": "Austin",
            "state": "TX",
            "call_in_date": null,
            "work_date": work,
            "expires": expires,
            "site_contact": null,
            "document_url": null
        })
    }

    // ── Identity enforcement ────────────────────────────

    #[tokio::test]
    async fn endpoints_require_identity() {
        let (ctx, _tmp) = test_ctx().await;
        let app = api_router(ctx);

        let response = app
            .oneshot(request("GET", "/api/tickets", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_identity_is_unauthorized() {
        let (ctx, _tmp) = test_ctx().await;
        let app = api_router(ctx);

        let fake = Identity { company_id: Uuid::new_v4(), member_id: Uuid::new_v4() };
        let response = app
            .oneshot(request("GET", "/api/tickets", Some(&fake), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn cross_company_identity_is_unauthorized() {
        let (ctx, _tmp) = test_ctx().await;
        let ours = seed_identity(&ctx).await;
        let theirs = seed_identity(&ctx).await;

        // A real member id presented under the wrong company id.
        let forged = Identity { company_id: theirs.company_id, member_id: ours.member_id };
        let app = api_router(ctx);
        let response = app
            .oneshot(request("GET", "/api/tickets", Some(&forged), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn company_registration_is_open() {
        let (ctx, _tmp) = test_ctx().await;
        let app = api_router(ctx);

        let body = serde_json::json!({
            "name": "Trench Kings LLC",
            "owner_name": "Sam",
            "owner_email": "sam@trenchkings.example"
        });
        let response = app
            .oneshot(request("POST", "/api/companies", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["company"]["name"], "Trench Kings LLC");
        assert_eq!(json["owner"]["role"], "owner");
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let (ctx, _tmp) = test_ctx().await;
        let app = api_router(ctx);

        let response = app
            .oneshot(request("GET", "/api/nonexistent", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_responses_are_no_store() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let app = api_router(ctx);

        let response = app
            .oneshot(request("GET", "/api/health", Some(&identity), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
    }

    // ── Tickets ─────────────────────────────────────────

    #[tokio::test]
    async fn ticket_create_and_list_with_status() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                // Expired long ago relative to any test run date.
                Some(ticket_body("TKT-1", "2020-01-01", "2020-01-10")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = response_json(response).await;
        assert_eq!(created["ticket_no"], "TKT-1");
        assert_eq!(created["status"], "expired");

        let app = api_router(ctx);
        let response = app
            .oneshot(request("GET", "/api/tickets", Some(&identity), None))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["tickets"].as_array().unwrap().len(), 1);
        assert_eq!(json["tickets"][0]["status"], "expired");
    }

    #[tokio::test]
    async fn ticket_validation_maps_to_400() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let app = api_router(ctx);

        let response = app
            .oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                Some(ticket_body("TKT-1", "01/05/2024", "2024-01-20")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].as_str().unwrap().contains("work date"));
    }

    #[tokio::test]
    async fn ticket_summary_response_shape() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;

        let app = api_router(ctx.clone());
        app.oneshot(request(
            "POST",
            "/api/tickets",
            Some(&identity),
            Some(ticket_body("TKT-1", "2020-01-01", "2020-01-10")),
        ))
        .await
        .unwrap();

        let app = api_router(ctx);
        let response = app
            .oneshot(request("GET", "/api/tickets/summary", Some(&identity), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["expired"], 1);
        assert_eq!(json["total"], 1);
        assert!(json["pending"].is_number());
        assert!(json["refresh_needed"].is_number());
    }

    #[tokio::test]
    async fn calendar_rejects_bad_dates() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let app = api_router(ctx);

        let response = app
            .oneshot(request(
                "GET",
                "/api/tickets/calendar?from=yesterday&to=2024-02-01",
                Some(&identity),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_request_overrides_status() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                // Far-future dates: valid for decades of test runs.
                Some(ticket_body("TKT-1", "2020-01-01", "2090-01-10")),
            ))
            .await
            .unwrap();
        let created = response_json(response).await;
        assert_eq!(created["status"], "valid");
        let id = created["id"].as_str().unwrap().to_string();

        let app = api_router(ctx);
        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/tickets/{id}/refresh-request"),
                Some(&identity),
                Some(serde_json::json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "refresh_needed");
    }

    // ── Jobs, prints, markers ───────────────────────────

    async fn seed_job(ctx: &ApiContext, identity: &Identity) -> String {
        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                "/api/jobs",
                Some(identity),
                Some(serde_json::json!({"job_number": "J-100", "name": "Main St relocation"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response_json(response).await["id"].as_str().unwrap().to_string()
    }

    async fn seed_pdf_print(ctx: &ApiContext, identity: &Identity, job_id: &str) -> String {
        let app = api_router(ctx.clone());
        let response = app
            .oneshot(multipart_request(
                &format!("/api/jobs/{job_id}/prints"),
                identity,
                &[],
                "site.pdf",
                b"%PDF-1.7 fake blueprint",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["kind"], "pdf");
        assert_eq!(json["page_count"], 3);
        json["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn print_upload_and_marker_flow() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let job_id = seed_job(&ctx, &identity).await;
        let print_id = seed_pdf_print(&ctx, &identity, &job_id).await;

        // A live ticket to pin.
        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                Some(ticket_body("TKT-881", "2020-01-01", "2090-01-10")),
            ))
            .await
            .unwrap();
        let ticket_id = response_json(response).await["id"].as_str().unwrap().to_string();

        // Drop a pin at the worked-example position.
        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/prints/{print_id}/markers"),
                Some(&identity),
                Some(serde_json::json!({
                    "ticket_id": ticket_id,
                    "x_percent": 50.0,
                    "y_percent": 62.5,
                    "page_number": 2
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let marker = response_json(response).await;
        assert_eq!(marker["label"], "TKT-881");
        assert_eq!(marker["x_percent"], 50.0);

        // Listed on its page, absent from others.
        let app = api_router(ctx.clone());
        let json = response_json(
            app.oneshot(request(
                "GET",
                &format!("/api/prints/{print_id}/markers?page=2"),
                Some(&identity),
                None,
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(json["markers"].as_array().unwrap().len(), 1);

        let app = api_router(ctx);
        let json = response_json(
            app.oneshot(request(
                "GET",
                &format!("/api/prints/{print_id}/markers?page=1"),
                Some(&identity),
                None,
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(json["markers"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn marker_rejects_out_of_range_coordinates() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let job_id = seed_job(&ctx, &identity).await;
        let print_id = seed_pdf_print(&ctx, &identity, &job_id).await;

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                Some(ticket_body("TKT-1", "2020-01-01", "2090-01-10")),
            ))
            .await
            .unwrap();
        let ticket_id = response_json(response).await["id"].as_str().unwrap().to_string();

        let app = api_router(ctx);
        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/prints/{print_id}/markers"),
                Some(&identity),
                Some(serde_json::json!({
                    "ticket_id": ticket_id,
                    "x_percent": 104.2,
                    "y_percent": 50.0,
                    "page_number": 1
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn replace_expired_marker_flow() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let job_id = seed_job(&ctx, &identity).await;
        let print_id = seed_pdf_print(&ctx, &identity, &job_id).await;

        // Expired ticket pinned at (40, 60) page 1; fresh replacement.
        let app = api_router(ctx.clone());
        let expired = response_json(
            app.oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                Some(ticket_body("TKT-OLD", "2020-01-01", "2020-01-10")),
            ))
            .await
            .unwrap(),
        )
        .await["id"]
            .as_str()
            .unwrap()
            .to_string();

        let app = api_router(ctx.clone());
        let fresh = response_json(
            app.oneshot(request(
                "POST",
                "/api/tickets",
                Some(&identity),
                Some(ticket_body("TKT-NEW", "2020-01-01", "2090-01-10")),
            ))
            .await
            .unwrap(),
        )
        .await["id"]
            .as_str()
            .unwrap()
            .to_string();

        let app = api_router(ctx.clone());
        let marker = response_json(
            app.oneshot(request(
                "POST",
                &format!("/api/prints/{print_id}/markers"),
                Some(&identity),
                Some(serde_json::json!({
                    "ticket_id": expired,
                    "x_percent": 40.0,
                    "y_percent": 60.0,
                    "page_number": 1
                })),
            ))
            .await
            .unwrap(),
        )
        .await;
        let marker_id = marker["id"].as_str().unwrap().to_string();

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                &format!("/api/markers/{marker_id}/replace"),
                Some(&identity),
                Some(serde_json::json!({"ticket_id": fresh})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let replaced = response_json(response).await;
        assert_eq!(replaced["ticket_id"], serde_json::Value::String(fresh));
        assert_eq!(replaced["x_percent"], 40.0);
        assert_eq!(replaced["y_percent"], 60.0);
        assert_eq!(replaced["label"], "TKT-NEW");

        // Old ticket is archived, not deleted.
        let app = api_router(ctx);
        let old = response_json(
            app.oneshot(request(
                "GET",
                &format!("/api/tickets/{expired}"),
                Some(&identity),
                None,
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(old["is_archived"], true);
    }

    #[tokio::test]
    async fn render_page_returns_png() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let job_id = seed_job(&ctx, &identity).await;
        let print_id = seed_pdf_print(&ctx, &identity, &job_id).await;

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/prints/{print_id}/pages/1?device=mobile"),
                Some(&identity),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "image/png");
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        assert_eq!(&body[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[tokio::test]
    async fn render_page_validates_page_and_device() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let job_id = seed_job(&ctx, &identity).await;
        let print_id = seed_pdf_print(&ctx, &identity, &job_id).await;

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/prints/{print_id}/pages/9"),
                Some(&identity),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let app = api_router(ctx);
        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/prints/{print_id}/pages/1?device=tablet"),
                Some(&identity),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Photos ──────────────────────────────────────────

    #[tokio::test]
    async fn photo_upload_deduplicates() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;

        let app = api_router(ctx.clone());
        let response = app
            .oneshot(multipart_request("/api/photos", &identity, &[], "trench.png", PNG_MAGIC))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let first = response_json(response).await;
        assert_eq!(first["duplicate"], false);

        let app = api_router(ctx);
        let response = app
            .oneshot(multipart_request("/api/photos", &identity, &[], "retry.png", PNG_MAGIC))
            .await
            .unwrap();
        let second = response_json(response).await;
        assert_eq!(second["duplicate"], true);
        assert_eq!(second["id"], first["id"]);
    }

    #[tokio::test]
    async fn photo_upload_rejects_pdf() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;
        let app = api_router(ctx);

        let response = app
            .oneshot(multipart_request(
                "/api/photos",
                &identity,
                &[],
                "scan.pdf",
                b"%PDF-1.7",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Team ────────────────────────────────────────────

    #[tokio::test]
    async fn crew_cannot_manage_roster() {
        let (ctx, _tmp) = test_ctx().await;
        let identity = seed_identity(&ctx).await;

        // Owner adds a crew member.
        let app = api_router(ctx.clone());
        let response = app
            .oneshot(request(
                "POST",
                "/api/team",
                Some(&identity),
                Some(serde_json::json!({
                    "display_name": "Riley",
                    "email": "riley@acme.example",
                    "role": "crew"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let crew_id = response_json(response).await["id"].as_str().unwrap().to_string();

        // The crew member cannot add accounts.
        let crew = Identity {
            company_id: identity.company_id,
            member_id: Uuid::parse_str(&crew_id).unwrap(),
        };
        let app = api_router(ctx);
        let response = app
            .oneshot(request(
                "POST",
                "/api/team",
                Some(&crew),
                Some(serde_json::json!({
                    "display_name": "Mal",
                    "email": "mal@acme.example",
                    "role": "crew"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
