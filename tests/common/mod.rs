use actix_web::{test, web, App};
use secrecy::Secret;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use expense_tracker_be::{auth, transaction};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

static JWT_SECRET: &str = "test_jwt_secret_for_integration_tests";

/// Test harness around a shared Postgres database.
///
/// Requires DATABASE_URL; tests that cannot get a database skip
/// themselves by returning early when `new` yields None.
pub struct TestApp {
    pub pool: PgPool,
    pub test_id: String,
}

pub struct TestResponse {
    status: u16,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub async fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }
}

impl TestApp {
    pub async fn new() -> Option<Self> {
        let database_url = std::env::var("DATABASE_URL").ok()?;

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let test_id = format!("{timestamp}_{counter}");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to database for tests");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(TestApp { pool, test_id })
    }

    /// Generate a unique email for this test run
    pub fn unique_email(&self, prefix: &str) -> String {
        format!("{prefix}_{}_@test.com", self.test_id)
    }

    /// Register a user and return their bearer token
    pub async fn register_user(&self, prefix: &str) -> String {
        let payload = json!({
            "name": "Test User",
            "email": self.unique_email(prefix),
            "password": "password123"
        });
        let response = self.post("/auth/register", &payload).await;
        assert_eq!(response.status(), 201, "registration should succeed");
        let body = response.json().await;
        body["token"].as_str().expect("token in response").to_string()
    }

    async fn request(&self, req: test::TestRequest) -> TestResponse {
        let jwt_secret = Secret::new(JWT_SECRET.to_string());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.pool.clone()))
                .app_data(web::Data::new(jwt_secret))
                .route("/health", web::get().to(health_handler))
                .service(auth::register)
                .service(auth::login)
                .service(auth::profile)
                .service(auth::update_profile)
                .service(auth::change_password)
                .service(transaction::list_transactions)
                .service(transaction::get_stats)
                .service(transaction::list_categories)
                .service(transaction::delete_by_category)
                .service(transaction::delete_all_transactions)
                .service(transaction::create_transaction)
                .service(transaction::get_transaction)
                .service(transaction::update_transaction)
                .service(transaction::delete_transaction),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;

        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(test::TestRequest::get().uri(path)).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request(
            test::TestRequest::get()
                .uri(path)
                .insert_header(("Authorization", format!("Bearer {token}"))),
        )
        .await
    }

    pub async fn post(&self, path: &str, payload: &Value) -> TestResponse {
        self.request(test::TestRequest::post().uri(path).set_json(payload))
            .await
    }

    pub async fn post_auth(&self, path: &str, payload: &Value, token: &str) -> TestResponse {
        self.request(
            test::TestRequest::post()
                .uri(path)
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(payload),
        )
        .await
    }

    pub async fn patch_auth(&self, path: &str, payload: &Value, token: &str) -> TestResponse {
        self.request(
            test::TestRequest::patch()
                .uri(path)
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(payload),
        )
        .await
    }

    pub async fn put_auth(&self, path: &str, payload: &Value, token: &str) -> TestResponse {
        self.request(
            test::TestRequest::put()
                .uri(path)
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(payload),
        )
        .await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request(
            test::TestRequest::delete()
                .uri(path)
                .insert_header(("Authorization", format!("Bearer {token}"))),
        )
        .await
    }
}

async fn health_handler() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}
