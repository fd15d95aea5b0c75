//! Quote collection routes.

use axum::{extract::State, routing::get, Json, Router};
use quotebook_engine::Collection;

use crate::error::Result;
use crate::handlers::{handle_get, handle_put, PutQuotesResponse};
use crate::AppState;

/// Create quote routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/quotes", get(get_quotes).put(put_quotes))
}

/// GET /quotes - Current collection.
async fn get_quotes(State(state): State<AppState>) -> Json<Collection> {
    Json(handle_get(&state.store).await)
}

/// PUT /quotes - Replace the collection.
async fn put_quotes(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<PutQuotesResponse>> {
    let response = handle_put(&state.store, &body).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::QuoteStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use quotebook_engine::Quote;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<QuoteStore>) {
        let store = Arc::new(QuoteStore::in_memory());
        let state = AppState {
            store: Arc::clone(&store),
        };
        (crate::routes::create_routes().with_state(state), store)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn put(body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/quotes")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn get_empty_collection() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::builder().uri("/quotes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn put_replaces_collection() {
        let (app, store) = app();

        let response = app
            .oneshot(put(r#"[{"text":"T1","category":"work"}]"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"count":1}"#);
        assert_eq!(
            store.get().await,
            Collection::from(vec![Quote::new("T1", "work")])
        );
    }

    #[tokio::test]
    async fn put_rejects_non_array() {
        let (app, store) = app();
        store
            .replace(vec![Quote::new("T1", "work")].into())
            .await
            .unwrap();

        let response = app.oneshot(put("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Invalid quotes"));
        assert_eq!(store.get().await.len(), 1);
    }

    #[tokio::test]
    async fn put_rejects_blank_quote() {
        let (app, _) = app();

        let response = app
            .oneshot(put(r#"[{"text":"","category":"work"}]"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_count() {
        let (app, store) = app();
        store
            .replace(vec![Quote::new("T1", "work")].into())
            .await
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["quotes"], 1);
    }

    #[tokio::test]
    async fn http_remote_round_trip() {
        use quotebook_client::{HttpRemote, RemoteStore};

        let (app, store) = app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move { axum::serve(listener, app).await });

        let remote = HttpRemote::new(&format!("http://{addr}"));
        assert!(remote.fetch().await.unwrap().is_empty());

        let quotes: Collection = vec![Quote::new("T1", "work"), Quote::new("T2", "life")].into();
        remote.publish(&quotes).await.unwrap();

        assert_eq!(remote.fetch().await.unwrap(), quotes);
        assert_eq!(store.get().await, quotes);

        server.abort();
    }
}
