//! Hand-written port doubles shared by the unit tests of this crate.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use gatehouse_core::{
    Credential, LogoutHandler, LogoutHandlerError, Principal, RememberMeServices, RequestContext,
    SessionAuthenticationError, SessionAuthenticationStrategy, SessionData, SessionId,
    SessionStore, SessionStoreError, VerificationError, VerifiedIdentity, Verifier,
};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

#[derive(Default, Clone)]
pub struct HashMapSessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
}

impl HashMapSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for HashMapSessionStore {
    async fn create(&self) -> Result<SessionData, SessionStoreError> {
        let session = SessionData::new(SessionId::new());
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionStoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: SessionData) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&session.id())
            .ok_or(SessionStoreError::SessionNotFound)?;
        *slot = session;
        Ok(())
    }

    async fn invalidate(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

/// Accepts `password` for every user it knows.
#[derive(Clone)]
pub struct MockVerifier {
    users: HashMap<String, (String, Vec<String>)>,
    disabled: Vec<String>,
}

impl MockVerifier {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            disabled: Vec::new(),
        }
    }

    pub fn with_user(mut self, username: &str, password: &str, authorities: &[&str]) -> Self {
        self.users.insert(
            username.to_string(),
            (
                password.to_string(),
                authorities.iter().map(|a| a.to_string()).collect(),
            ),
        );
        self
    }

    pub fn with_disabled_user(mut self, username: &str, password: &str) -> Self {
        self.disabled.push(username.to_string());
        self.with_user(username, password, &["ROLE_USER"])
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, VerificationError> {
        let username = credential.username().as_str();
        let (password, authorities) = self
            .users
            .get(username)
            .ok_or(VerificationError::UnknownIdentity)?;
        if credential.password().expose_secret() != password {
            return Err(VerificationError::BadCredential);
        }
        if self.disabled.iter().any(|d| d == username) {
            return Err(VerificationError::Disabled);
        }
        Ok(VerifiedIdentity::new(username, authorities.clone()))
    }
}

/// Shared, ordered log of hook and handler invocations.
#[derive(Default, Clone)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

#[derive(Clone)]
pub struct RecordingRememberMe {
    pub log: CallLog,
}

#[async_trait]
impl RememberMeServices for RecordingRememberMe {
    async fn login_success(&self, ctx: &mut RequestContext, principal: &Principal) {
        // The principal must already be bound when success fires.
        assert_eq!(ctx.principal(), Some(principal));
        self.log.record(format!("login_success:{}", principal.name()));
    }

    async fn login_fail(&self, _ctx: &mut RequestContext) {
        self.log.record("login_fail");
    }
}

#[derive(Clone)]
pub struct RecordingStrategy {
    pub log: CallLog,
    pub reject: bool,
}

#[async_trait]
impl SessionAuthenticationStrategy for RecordingStrategy {
    async fn on_authentication(
        &self,
        _ctx: &mut RequestContext,
        principal: &Principal,
    ) -> Result<(), SessionAuthenticationError> {
        self.log.record(format!("on_authentication:{}", principal.name()));
        if self.reject {
            return Err(SessionAuthenticationError::Rejected(
                "too many sessions".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct RecordingLogoutHandler {
    pub name: &'static str,
    pub log: CallLog,
    pub fail: bool,
}

#[async_trait]
impl LogoutHandler for RecordingLogoutHandler {
    fn name(&self) -> &str {
        self.name
    }

    async fn cleanup(
        &self,
        _ctx: &mut RequestContext,
        _principal: Option<&Principal>,
    ) -> Result<(), LogoutHandlerError> {
        self.log.record(self.name);
        if self.fail {
            return Err(LogoutHandlerError::UnexpectedError(format!(
                "{} failed",
                self.name
            )));
        }
        Ok(())
    }
}
