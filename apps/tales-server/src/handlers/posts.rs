//! Feed, story and dashboard handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use tales_core::domain::{PostDraft, PostPatch};
use tales_core::search;
use tales_shared::ApiResponse;
use tales_shared::dto::{
    CreatePostRequest, DestinationsResponse, FeedQuery, FeedResponse, PostDetail, PostSummary,
    UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Number of destination chips shown above the feed.
const FEATURED_DESTINATIONS: usize = 6;

/// GET /api/posts?q=
pub async fn feed(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let FeedQuery { q } = query.into_inner();
    let posts = state.posts.list_all().await?;

    let posts: Vec<PostSummary> = search::filter_posts(&q, &posts)
        .into_iter()
        .map(PostSummary::from)
        .collect();

    Ok(HttpResponse::Ok().json(FeedResponse {
        query: q,
        count: posts.len(),
        posts,
    }))
}

/// GET /api/posts/{id}
pub async fn detail(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostDetail::from(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let draft = PostDraft::from(body.into_inner());
    draft.validate()?;

    tracing::debug!(user_id = %identity.user_id, email = ?identity.email, "Publishing story");
    let post = state.posts_as(&identity).create(draft).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        PostDetail::from(post),
        "Your travel story has been published successfully.",
    )))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let patch = PostPatch::from(body.into_inner());
    if patch.is_empty() {
        return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    patch.validate()?;

    let post = state
        .posts_as(&identity)
        .update(path.into_inner(), patch)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        PostDetail::from(post),
        "Your changes have been saved successfully.",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts_as(&identity).delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/authors/{id}/posts
pub async fn author_posts(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let posts: Vec<PostSummary> = state
        .posts
        .list_by_author(path.into_inner())
        .await
        .iter()
        .map(PostSummary::from)
        .collect();

    HttpResponse::Ok().json(posts)
}

/// GET /api/destinations
///
/// Ranked from the cached feed; does not hit the store.
pub async fn destinations(state: web::Data<AppState>) -> HttpResponse {
    let posts = state.posts.posts();
    HttpResponse::Ok().json(DestinationsResponse {
        destinations: search::popular_destinations(&posts, FEATURED_DESTINATIONS),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use tales_core::ports::TokenVerifier;
    use tales_infra::{InMemoryPostStore, JwtConfig, JwtTokenVerifier};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    const SECRET: &str = "handler-test-secret";

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        aud: &'static str,
        exp: i64,
    }

    fn bearer(user_id: Uuid) -> (&'static str, String) {
        let claims = Claims {
            sub: user_id.to_string(),
            aud: "authenticated",
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    fn verifier() -> Arc<dyn TokenVerifier> {
        Arc::new(JwtTokenVerifier::new(JwtConfig {
            secret: SECRET.to_string(),
            issuer: None,
            audience: "authenticated".to_string(),
        }))
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::with_store(Arc::new(
                        InMemoryPostStore::new(),
                    ))))
                    .app_data(web::Data::new(verifier()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_create_requires_bearer_token() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Alps", "content": "Snow" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_rejects_blank_title() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(json!({ "title": "   ", "content": "Snow" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Please fill in both title and content.");
    }

    #[actix_web::test]
    async fn test_create_then_search_feed() {
        let app = app!();
        let author = Uuid::new_v4();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(author))
            .set_json(json!({
                "title": "Lakes and peaks",
                "content": "## Day one\nWe hiked.",
                "destination": "Switzerland"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["data"]["blocks"][0]["type"], "heading");

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(author))
            .set_json(json!({ "title": "Tokyo nights", "content": "Neon" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/posts?q=switzerland")
            .to_request();
        let feed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(feed["count"], 1);
        assert_eq!(feed["posts"][0]["title"], "Lakes and peaks");

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let feed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(feed["count"], 2);
        assert_eq!(feed["posts"][0]["title"], "Tokyo nights");

        let req = test::TestRequest::get().uri("/api/destinations").to_request();
        let chips: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(chips["destinations"], json!(["Switzerland"]));
    }

    #[actix_web::test]
    async fn test_update_by_other_user_is_not_found() {
        let app = app!();
        let owner = Uuid::new_v4();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(owner))
            .set_json(json!({ "title": "Original", "content": "Body" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(json!({ "title": "Hijacked" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(owner))
            .set_json(json!({ "title": "Renamed" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["data"]["title"], "Renamed");
        assert_eq!(updated["data"]["content"], "Body");
    }

    #[actix_web::test]
    async fn test_empty_update_is_rejected() {
        let app = app!();
        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_delete_then_detail_is_not_found() {
        let app = app!();
        let owner = Uuid::new_v4();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(owner))
            .set_json(json!({ "title": "Short trip", "content": "Gone soon" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(owner))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_author_posts_for_unknown_author_is_empty() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri(&format!("/api/authors/{}/posts", Uuid::new_v4()))
            .to_request();
        let posts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(posts, json!([]));
    }

    #[actix_web::test]
    async fn test_author_posts_lists_only_that_author() {
        let app = app!();
        let author = Uuid::new_v4();

        for (user, title) in [(author, "Mine"), (Uuid::new_v4(), "Theirs")] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(user))
                .set_json(json!({ "title": title, "content": "Body" }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/authors/{author}/posts"))
            .to_request();
        let posts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(posts.as_array().map(Vec::len), Some(1));
        assert_eq!(posts[0]["title"], "Mine");
    }
}
