//! Integration test harness for Lustra.
//!
//! Each [`TestApp`] owns an in-memory `SQLite` database with the real
//! migrations applied and the full router assembled, so tests exercise the
//! same code paths as production requests. Requests go through tower's
//! `oneshot`, no listener involved.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use lustra_server::config::{MetalsConfig, ServerConfig};
use lustra_server::{AppState, app, db};

/// A fully wired application over a fresh in-memory database.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Stand up a fresh app: one-connection in-memory pool (so every request
    /// sees the same database), migrations applied, router built.
    pub async fn spawn() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::MIGRATOR.run(&pool).await.unwrap();

        let state = AppState::new(test_config(), pool.clone());
        Self {
            router: app(state),
            pool,
        }
    }

    /// Send a request and return `(status, parsed JSON body)`.
    ///
    /// Empty bodies (204s and the like) come back as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Register a customer account and return `(token, user id)`.
    pub async fn register(&self, email: &str, name: &str) -> (String, i64) {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({ "email": email, "name": name, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().unwrap().to_owned(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }

    /// Log a registered account back in and return a fresh token.
    ///
    /// Needed after role changes: the role rides inside the token, so a
    /// promotion only takes effect on the next login.
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({ "email": email, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_owned()
    }

    /// Register an account, promote it to admin directly in the database,
    /// and return an admin-role token.
    pub async fn register_admin(&self, email: &str) -> String {
        let (_, user_id) = self.register(email, "Test Admin").await;
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .unwrap();
        self.login(email).await
    }

    /// Register an account and take it through enrollment and admin
    /// approval. Returns `(seller token, seller id)`.
    pub async fn approved_seller(&self, email: &str, business_name: &str) -> (String, i64) {
        let (token, _) = self.register(email, "Test Seller").await;
        let (status, body) = self
            .post("/sellers/enroll", Some(&token), enroll_body(business_name))
            .await;
        assert_eq!(status, StatusCode::CREATED, "enroll failed: {body}");
        let seller_id = body["id"].as_i64().unwrap();

        let admin_email = format!("admin+{seller_id}@lustra.test");
        let admin = self.register_admin(&admin_email).await;
        let (status, body) = self
            .put(
                &format!("/admin/sellers/{seller_id}/status"),
                Some(&admin),
                json!({ "status": "approved" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "approval failed: {body}");

        // Approval flipped the role, so the old token is stale
        (self.login(email).await, seller_id)
    }
}

/// A complete, valid enrollment payload.
#[must_use]
pub fn enroll_body(business_name: &str) -> Value {
    json!({
        "business_name": business_name,
        "tax_id": format!("TAX-{business_name}"),
        "address": {
            "street": "1 Jewelers Row",
            "city": "Springfield",
            "state": "IL",
            "postal_code": "62701"
        },
        "certificate_doc": "/uploads/cert.png",
        "identity_doc": "/uploads/id.png"
    })
}

/// A complete, valid listing payload.
#[must_use]
pub fn product_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Hand-finished piece",
        "price": "149.99",
        "category": "rings",
        "images": ["/uploads/ring.png"],
        "purchase_link": "https://shop.lustra.test/ring"
    })
}

fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        jwt_secret: SecretString::from("kJ8#mN2$pQ9&vX4!wZ7*bC5@dF1^gH3%"),
        token_ttl_secs: 3600,
        upload_dir: std::env::temp_dir().join("lustra-test-uploads"),
        metals: MetalsConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            api_key: None,
            timeout_secs: 1,
        },
        sentry_dsn: None,
    }
}
