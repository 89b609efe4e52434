use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::post, Json, Router};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use azauth_core::{verify_credential, Authenticator, InMemoryAccountStore};

#[derive(Debug, Deserialize)]
struct CredentialRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    username: String,
    status: String,
    timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct AccountFixture {
    username: String,
    salt_base64: String,
    verifier_base64: String,
}

fn respond(username: &str, status: impl Into<String>) -> Json<AuthResponse> {
    Json(AuthResponse {
        username: username.to_string(),
        status: status.into(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[tokio::main]
async fn main() {
    let store = Arc::new(InMemoryAccountStore::new());
    let auth = Arc::new(Authenticator::new(store));
    let login_auth = auth.clone();
    let register_auth = auth.clone();

    let app = Router::new()
        .route("/login", post({
            move |Json(req): Json<CredentialRequest>| {
                let auth = login_auth.clone();
                async move {
                    // Reload the account fixture each request so the runner
                    // can swap credentials dynamically.
                    let fixture_path = "/fixtures/accounts/account.json";
                    if let Ok(s) = fs::read_to_string(fixture_path) {
                        let f: AccountFixture =
                            serde_json::from_str(&s).expect("invalid account fixture JSON");
                        if f.username.eq_ignore_ascii_case(&req.username) {
                            let b64 = base64::engine::general_purpose::STANDARD;
                            let salt = b64.decode(f.salt_base64.as_bytes()).expect("invalid salt b64");
                            let verifier =
                                b64.decode(f.verifier_base64.as_bytes()).expect("invalid verifier b64");
                            let ok = verify_credential(&req.username, &req.password, &salt, &verifier);
                            let status = if ok { "ok" } else { "invalid_credentials" };
                            return respond(&req.username, status);
                        }
                    }
                    let status = if auth.login(&req.username, &req.password) {
                        "ok"
                    } else {
                        "invalid_credentials"
                    };
                    respond(&req.username, status)
                }
            }
        }))
        .route("/register", post({
            move |Json(req): Json<CredentialRequest>| {
                let auth = register_auth.clone();
                async move {
                    match auth.register(&req.username, &req.password) {
                        Ok(_) => respond(&req.username, "created"),
                        Err(err) => respond(&req.username, format!("error:{err}")),
                    }
                }
            }
        }));

    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    println!("azauth-server listening on {addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app).await.unwrap();
}
