use gatehouse_adapters::config::{
    GatehouseSettings, LoginSettings, PostgresSettings, RedisSettings, RememberMeSettings,
    SeedUser, ServerSettings, SessionBackend, SessionSettings, VerifierBackend, VerifierSettings,
};
use gatehouse_core::AuthenticationMode;
use gatehouse_service::{GatehouseService, build_command};
use secrecy::Secret;
use serde_json::{Value, json};

pub const SESSION_COOKIE: &str = "GATEHOUSE_SESSION";
pub const REMEMBER_ME_COOKIE: &str = "GATEHOUSE_REMEMBER_ME";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
}

#[derive(Default)]
pub struct TestOptions {
    pub per_client: bool,
    pub remember_me: bool,
}

impl TestOptions {
    fn settings(&self) -> GatehouseSettings {
        let seed = |username: &str, password: &str, authorities: &[&str]| SeedUser {
            username: username.to_string(),
            password: Secret::new(password.to_string()),
            authorities: authorities.iter().map(|a| a.to_string()).collect(),
            enabled: true,
        };
        let mode = if self.per_client {
            AuthenticationMode::PerClient
        } else {
            AuthenticationMode::PerSession
        };

        GatehouseSettings {
            login: LoginSettings {
                mode,
                invalidate_session: true,
                clear_cookies: Vec::new(),
            },
            session: SessionSettings {
                cookie_name: SESSION_COOKIE.to_string(),
                ttl_seconds: 1800,
                backend: SessionBackend::Memory,
            },
            remember_me: RememberMeSettings {
                enabled: self.remember_me,
                cookie_name: REMEMBER_ME_COOKIE.to_string(),
                secret: Secret::new("test-remember-me-secret".to_string()),
                ttl_seconds: 600,
            },
            redis: RedisSettings {
                host_name: "127.0.0.1".to_string(),
            },
            postgres: PostgresSettings {
                url: Secret::new("postgres://localhost/gatehouse".to_string()),
            },
            verifier: VerifierSettings {
                backend: VerifierBackend::Memory,
                users: vec![
                    seed("foo", "bar", &["ROLE_USER", "ROLE_ABUSER"]),
                    seed("alice", "alice-pw", &["ROLE_USER"]),
                    seed("bob", "bob-pw", &["ROLE_ADMIN"]),
                ],
            },
            server: ServerSettings {
                address: "127.0.0.1:0".to_string(),
                allowed_origins: Vec::new(),
            },
        }
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_options(TestOptions::default()).await
    }

    pub async fn with_options(options: TestOptions) -> Self {
        let settings = options.settings();
        let command = build_command(&settings)
            .await
            .expect("Failed to build login command");

        let service = GatehouseService::new(command, &settings.session.cookie_name);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            service
                .run_standalone(listener, None)
                .await
                .expect("Failed to run gatehouse");
        });

        Self {
            address,
            http_client: Self::client(),
        }
    }

    /// A fresh client with its own cookie store, i.e. another browser.
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client")
    }

    pub async fn post_login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_login_with(&self.http_client, username, password).await
    }

    pub async fn post_login_with(
        &self,
        client: &reqwest::Client,
        username: &str,
        password: &str,
    ) -> reqwest::Response {
        client
            .post(format!("{}/login", self.address))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.http_client
            .post(format!("{}/logout", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_authorize(&self, roles: &[&str]) -> bool {
        self.post_authorize_with(&self.http_client, roles).await
    }

    pub async fn post_authorize_with(&self, client: &reqwest::Client, roles: &[&str]) -> bool {
        let body: Value = client
            .post(format!("{}/authorize", self.address))
            .json(&json!({ "roles": roles }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to read body");
        body["authorized"].as_bool().expect("authorized flag")
    }

    pub async fn get_principal(&self) -> reqwest::Response {
        self.get_principal_with(&self.http_client).await
    }

    /// Asks for the principal presenting `session_id` as the session cookie.
    pub async fn get_principal_with_session(
        &self,
        client: &reqwest::Client,
        session_id: &str,
    ) -> reqwest::Response {
        client
            .get(format!("{}/principal", self.address))
            .header("cookie", format!("{SESSION_COOKIE}={session_id}"))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_principal_with(&self, client: &reqwest::Client) -> reqwest::Response {
        client
            .get(format!("{}/principal", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn cookie<'a>(response: &'a reqwest::Response, name: &str) -> Option<reqwest::cookie::Cookie<'a>> {
    response.cookies().find(|c| c.name() == name)
}
