use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use orderdesk_api as api;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// In-process application over an in-memory SQLite database.
pub struct TestApp {
    pub router: Router,
    pub state: api::AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        // A single connection keeps every query on the same in-memory database.
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.expect("connect sqlite");
        api::db::run_migrations(&db).await.expect("run migrations");
        let db = Arc::new(db);

        let (event_tx, mut event_rx) = mpsc::channel(64);
        tokio::spawn(async move { while event_rx.recv().await.is_some() {} });
        let event_sender = api::events::EventSender::new(event_tx);

        let services =
            api::handlers::AppServices::new(db.clone(), Some(Arc::new(event_sender.clone())));
        let config = api::config::AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            0,
            "test".into(),
        );
        let state = api::AppState {
            db,
            config,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", api::api_v1_routes())
            .with_state(state.clone());

        Self { router, state }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("build request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("dispatch request")
    }

    pub async fn seed_company(&self, name: &str) -> Uuid {
        let company = api::entities::company::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ..Default::default()
        };
        company
            .insert(&*self.state.db)
            .await
            .expect("seed company")
            .id
    }

    pub async fn seed_profile(&self, company_id: Uuid, email: &str, role: &str) -> Uuid {
        let profile = api::entities::profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(Some(company_id)),
            email: Set(email.to_string()),
            full_name: Set(None),
            role: Set(role.to_string()),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(None),
        };
        profile
            .insert(&*self.state.db)
            .await
            .expect("seed profile")
            .id
    }

    pub async fn seed_supplier(&self, name: &str) -> Uuid {
        let supplier = api::entities::supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ..Default::default()
        };
        supplier
            .insert(&*self.state.db)
            .await
            .expect("seed supplier")
            .id
    }
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
