//! Cookie-based correlation between clients and session records

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::flow::FlowError;
use crate::server::AppState;
use crate::session::{SessionId, SessionRecord, generate_session_id, validate_session_id};

/// Extract a well-formed session id from the request cookies
pub fn read_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, id)| id.trim().to_string())
        .filter(|id| validate_session_id(id))
}

/// The caller's session for the duration of one request.
///
/// Loaded at the start of a handler, mutated by the flow controller and
/// written back with [`SessionContext::save`]. Read-only steps finish with
/// [`SessionContext::respond`] instead.
#[derive(Debug)]
pub struct SessionContext {
    pub id: SessionId,
    pub record: SessionRecord,
    fresh: bool,
}

impl SessionContext {
    fn start() -> Self {
        let id = generate_session_id();
        debug!("Starting session {}", id);
        Self {
            id,
            record: SessionRecord::default(),
            fresh: true,
        }
    }

    /// Load the caller's session, starting a new one when the cookie is
    /// missing or unknown. Fails with [`FlowError::SessionExpired`] when the
    /// cookie names a session past its TTL.
    pub async fn load(state: &AppState, headers: &HeaderMap) -> Result<Self, FlowError> {
        let Some(id) = read_session_cookie(headers, &state.cookie_name) else {
            return Ok(Self::start());
        };

        match state.sessions.get(&id).await? {
            Some(record) => Ok(Self {
                id,
                record,
                fresh: false,
            }),
            None => Ok(Self::start()),
        }
    }

    /// Like [`SessionContext::load`], but an expired session is replaced by a
    /// fresh one instead of failing
    pub async fn load_or_restart(state: &AppState, headers: &HeaderMap) -> Result<Self, FlowError> {
        match Self::load(state, headers).await {
            Err(FlowError::SessionExpired) => Ok(Self::start()),
            other => other,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    fn cookie(&self, cookie_name: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            cookie_name, self.id
        )
    }

    /// Persist the record and attach the session cookie for new sessions
    pub async fn save(
        self,
        state: &AppState,
        response: impl IntoResponse,
    ) -> Result<Response, FlowError> {
        let cookie = self.fresh.then(|| self.cookie(&state.cookie_name));
        state.sessions.set(&self.id, self.record).await?;
        Ok(with_cookie(response.into_response(), cookie))
    }

    /// Finish a request that only read the record. Existing sessions are not
    /// written back, so concurrent writes from the same client survive. A new
    /// session is still stored so its cookie names a live record.
    pub async fn respond(
        self,
        state: &AppState,
        response: impl IntoResponse,
    ) -> Result<Response, FlowError> {
        if self.fresh {
            return self.save(state, response).await;
        }
        Ok(response.into_response())
    }
}

fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(cookie) = cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Failed to encode session cookie: {}", e),
        }
    }
    response
}
