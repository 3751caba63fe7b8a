//! `Backend` over the server's JSON API.
//!
//! The session token is replayed as a `session_token` cookie on every
//! request, the same way the browser sent it. Non-2xx answers become
//! [`ClientError::Status`] carrying the server's text body; 401 becomes
//! [`ClientError::Auth`].

use async_trait::async_trait;
use records::{CustomExercise, ExerciseDef, NewWorkout, Template, TemplateInput, User, Workout};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::error::ClientError;
use crate::net::backend::Backend;
use crate::state::session::Session;

#[derive(Deserialize)]
struct TicketBody {
    ticket: String,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, session_token: Option<&str>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = session_token {
            headers.insert(COOKIE, HeaderValue::from_str(&format!("session_token={token}"))?);
        }
        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser entry point of the GitHub sign-in flow.
    #[must_use]
    pub fn github_login_url(&self) -> String {
        format!("{}/auth/github", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = check(request.send().await?).await?;
    Ok(response.json::<T>().await?)
}

async fn send_empty(request: RequestBuilder) -> Result<(), ClientError> {
    check(request.send().await?).await?;
    Ok(())
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Auth(message));
    }
    Err(ClientError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn register(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = json!({ "email": email, "password": password });
        send_json(self.request(Method::POST, "/api/auth/register").json(&body)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = json!({ "email": email, "password": password });
        send_json(self.request(Method::POST, "/api/auth/login").json(&body)).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        send_empty(self.request(Method::POST, "/api/auth/logout")).await
    }

    async fn me(&self) -> Result<User, ClientError> {
        send_json(self.request(Method::GET, "/api/auth/me")).await
    }

    async fn reauthenticate(&self, password: &str) -> Result<String, ClientError> {
        let request = self
            .request(Method::POST, "/api/auth/reauthenticate")
            .json(&json!({ "password": password }));
        let body: TicketBody = send_json(request).await?;
        Ok(body.ticket)
    }

    async fn ws_ticket(&self) -> Result<String, ClientError> {
        let body: TicketBody = send_json(self.request(Method::POST, "/api/auth/ws-ticket")).await?;
        Ok(body.ticket)
    }

    async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ClientError> {
        send_json(self.request(Method::POST, "/api/workouts").json(workout)).await
    }

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>, ClientError> {
        match send_json(self.request(Method::GET, &format!("/api/workouts/{id}"))).await {
            Ok(workout) => Ok(Some(workout)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_workouts(
        &self,
        limit: Option<u32>,
        before: Option<OffsetDateTime>,
    ) -> Result<Vec<Workout>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(before) = before {
            query.push(("before", before.format(&Rfc3339)?));
        }
        send_json(self.request(Method::GET, "/api/workouts").query(&query)).await
    }

    async fn list_exercises(&self) -> Result<Vec<CustomExercise>, ClientError> {
        send_json(self.request(Method::GET, "/api/exercises")).await
    }

    async fn create_exercise(&self, def: &ExerciseDef) -> Result<CustomExercise, ClientError> {
        send_json(self.request(Method::POST, "/api/exercises").json(def)).await
    }

    async fn delete_exercise(&self, id: Uuid) -> Result<(), ClientError> {
        send_empty(self.request(Method::DELETE, &format!("/api/exercises/{id}"))).await
    }

    async fn list_templates(&self) -> Result<Vec<Template>, ClientError> {
        send_json(self.request(Method::GET, "/api/templates")).await
    }

    async fn get_template(&self, id: Uuid) -> Result<Template, ClientError> {
        send_json(self.request(Method::GET, &format!("/api/templates/{id}"))).await
    }

    async fn create_template(&self, input: &TemplateInput) -> Result<Template, ClientError> {
        send_json(self.request(Method::POST, "/api/templates").json(input)).await
    }

    async fn update_template(&self, id: Uuid, input: &TemplateInput) -> Result<Template, ClientError> {
        send_json(self.request(Method::PUT, &format!("/api/templates/{id}")).json(input)).await
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), ClientError> {
        send_empty(self.request(Method::DELETE, &format!("/api/templates/{id}"))).await
    }

    async fn update_name(&self, name: &str) -> Result<User, ClientError> {
        send_json(self.request(Method::PATCH, "/api/users/me").json(&json!({ "name": name })))
            .await
    }

    async fn upload_picture(&self, bytes: Vec<u8>) -> Result<User, ClientError> {
        let request = self
            .request(Method::PUT, "/api/users/me/picture")
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        send_json(request).await
    }

    async fn delete_account(&self, reauth_ticket: &str) -> Result<(), ClientError> {
        let request = self
            .request(Method::DELETE, "/api/users/me")
            .json(&json!({ "ticket": reauth_ticket }));
        send_empty(request).await
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
