use log::warn;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskdraw_core::{CardId, Category, ProfileId, Store, StoreError};
use thiserror::Error;
use tiny_http::Method;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(message) => Self::Validation(message),
            StoreError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            StoreError::Unavailable(message) => {
                warn!("store unavailable: {message}");
                Self::Internal("storage is unavailable".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    fn error(err: ApiError) -> Self {
        Self {
            status: err.status(),
            body: json!({ "message": err.to_string() }),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProfileRequest {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    #[serde(default)]
    profile_id: Option<ProfileId>,
    #[serde(default)]
    card_id: Option<CardId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionEntry {
    card_id: CardId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionStatus {
    is_completed: bool,
}

/// Routes one request. Paths are accepted bare or under `/api`.
pub fn dispatch(store: &dyn Store, method: &Method, url: &str, body: &str) -> ApiReply {
    match route(store, method, url, body) {
        Ok(reply) => reply,
        Err(err) => ApiReply::error(err),
    }
}

fn route(store: &dyn Store, method: &Method, url: &str, body: &str) -> Result<ApiReply, ApiError> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = path
        .strip_prefix("/api")
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .unwrap_or(path);
    let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();
    match (method, segments.as_slice()) {
        (Method::Get, ["cards"]) => to_reply(store.all_cards()?),
        (Method::Get, ["cards", category]) => {
            let category = Category::from_id(&decode(category)?)
                .ok_or_else(|| ApiError::NotFound(format!("category {category} not found")))?;
            to_reply(store.cards_in_category(category)?)
        }
        (Method::Get, ["profiles"]) => to_reply(store.list_profiles()?),
        (Method::Post, ["profiles"]) => {
            let request: CreateProfileRequest = parse_body(body)?;
            let name = request
                .display_name
                .ok_or_else(|| ApiError::Validation("displayName is required".to_string()))?;
            let creation = store.create_profile(&name)?;
            Ok(ApiReply::created(to_value(&creation.profile)?))
        }
        (Method::Get, ["profiles", "by-name", name]) => {
            let name = decode(name)?;
            let profile = store
                .find_profile_by_name(&name)?
                .ok_or_else(|| ApiError::NotFound(format!("profile {name:?} not found")))?;
            to_reply(profile)
        }
        (Method::Get, ["profiles", id, "completions"]) => {
            let profile_id = parse_id(id, "profile ID")?;
            let entries: Vec<CompletionEntry> = store
                .list_completed(profile_id)?
                .into_iter()
                .map(|card_id| CompletionEntry { card_id })
                .collect();
            to_reply(entries)
        }
        (Method::Post, ["profiles", id, "reset"]) => {
            let profile_id = parse_id(id, "profile ID")?;
            store.reset_all(profile_id)?;
            Ok(ApiReply::ok(json!({ "success": true })))
        }
        (Method::Post, ["completions", "toggle"]) => {
            let request: ToggleRequest = parse_body(body)?;
            let (Some(profile_id), Some(card_id)) = (request.profile_id, request.card_id) else {
                return Err(ApiError::Validation(
                    "profileId and cardId are required".to_string(),
                ));
            };
            if profile_id <= 0 || card_id <= 0 {
                return Err(ApiError::Validation(
                    "profileId and cardId must be positive".to_string(),
                ));
            }
            let is_completed = store.toggle(profile_id, card_id)?;
            to_reply(CompletionStatus { is_completed })
        }
        (Method::Get, ["completions", "check"]) => {
            let profile_id = parse_id(&query_param(query, "profileId")?, "profile ID")?;
            let card_id = parse_id(&query_param(query, "cardId")?, "card ID")?;
            let is_completed = store.is_completed(profile_id, card_id)?;
            to_reply(CompletionStatus { is_completed })
        }
        _ => Err(ApiError::NotFound(format!("no route for {method} {path}"))),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Internal(err.to_string()))
}

fn to_reply<T: Serialize>(value: T) -> Result<ApiReply, ApiError> {
    Ok(ApiReply::ok(to_value(&value)?))
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|err| ApiError::Validation(format!("invalid request body: {err}")))
}

fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::Validation(format!("invalid {what}")))
}

fn decode(raw: &str) -> Result<String, ApiError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|value| value.into_owned())
        .map_err(|_| ApiError::Validation("path is not valid UTF-8".to_string()))
}

fn query_param(query: &str, key: &str) -> Result<String, ApiError> {
    for pair in query.split('&') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if name == key {
            return decode(&value.replace('+', " "));
        }
    }
    Err(ApiError::Validation(format!("{key} is required")))
}
