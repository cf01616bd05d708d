//! Request shape validation. Bodies arrive as untyped JSON; each endpoint has
//! an allow-list of fields with type and format checks, producing a typed
//! command before any store call happens.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{NewNote, NotePatch};
use crate::error::ApiError;
use crate::filter::NoteQuery;
use crate::services::users::Registration;

pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 72;

/// `Json<Value>` whose rejections render as [`ApiError`]
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Parse a UUID from a path segment or body field
pub fn parse_id(raw: &str, field: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_id(field))
}

fn fields(body: &Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

fn missing(field: &str) -> ApiError {
    ApiError::validation_error(format!("Missing `{}` in request body", field))
}

fn not_a_string(field: &str) -> ApiError {
    ApiError::validation_error(format!("Field `{}` is not a string", field))
}

/// Absent, `null` and `""` all count as missing
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn required_string(body: &Map<String, Value>, field: &str) -> Result<String, ApiError> {
    let value = body.get(field);
    if is_blank(value) {
        return Err(missing(field));
    }
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(not_a_string(field)),
    }
}

fn optional_string(body: &Map<String, Value>, field: &str) -> Result<Option<String>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(not_a_string(field)),
    }
}

/// `POST /api/users`. Checks run in a fixed order: presence, type,
/// surrounding whitespace, then length.
pub fn registration(body: &Value) -> Result<Registration, ApiError> {
    let body = fields(body);

    for field in ["username", "password"] {
        if is_blank(body.get(field)) {
            return Err(missing(field));
        }
    }

    for field in ["username", "password", "fullname"] {
        if let Some(value) = body.get(field) {
            let allowed_null = field == "fullname" && value.is_null();
            if !value.is_string() && !allowed_null {
                return Err(not_a_string(field));
            }
        }
    }

    let username = required_string(&body, "username")?;
    let password = required_string(&body, "password")?;

    for (field, value) in [("username", &username), ("password", &password)] {
        if value.trim() != value.as_str() {
            return Err(ApiError::validation_error(format!(
                "Leading or trailing whitespace in `{}`",
                field
            )));
        }
    }

    let chars = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&chars) {
        return Err(ApiError::validation_error(format!(
            "`password` must be between {} and {} characters",
            PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS
        )));
    }

    let fullname = optional_string(&body, "fullname")?.map(|f| f.trim().to_string());

    Ok(Registration {
        username,
        password,
        fullname,
    })
}

/// `POST /api/login`
pub fn credentials(body: &Value) -> Result<(String, String), ApiError> {
    let body = fields(body);
    let username = required_string(&body, "username")?;
    let password = required_string(&body, "password")?;
    Ok((username, password))
}

/// Folder and tag bodies carry a single required `name`
pub fn entity_name(body: &Value) -> Result<String, ApiError> {
    required_string(&fields(body), "name")
}

fn folder_ref(value: &Value) -> Result<Option<Uuid>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => parse_id(s, "folderId").map(Some),
        _ => Err(ApiError::invalid_id("folderId")),
    }
}

fn tag_refs(value: &Value) -> Result<Vec<Uuid>, ApiError> {
    match value {
        Value::Null => Ok(vec![]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| ApiError::validation_error("A `tagId` is not valid"))
            })
            .collect(),
        _ => Err(ApiError::invalid_id("tags")),
    }
}

/// `POST /api/notes`
pub fn new_note(body: &Value) -> Result<NewNote, ApiError> {
    let body = fields(body);

    let title = required_string(&body, "title")?;
    let content = optional_string(&body, "content")?;
    let folder_id = match body.get("folderId") {
        Some(value) => folder_ref(value)?,
        None => None,
    };
    let tags = match body.get("tags") {
        Some(value) => tag_refs(value)?,
        None => vec![],
    };

    Ok(NewNote {
        title,
        content,
        folder_id,
        tags,
    })
}

/// `PUT /api/notes/:id`. Only recognised keys that are present end up in the
/// patch; an empty patch is rejected by the service.
pub fn note_patch(body: &Value) -> Result<NotePatch, ApiError> {
    let body = fields(body);
    let mut patch = NotePatch::default();

    if body.contains_key("title") {
        patch.title = Some(required_string(&body, "title")?);
    }
    if body.contains_key("content") {
        patch.content = Some(optional_string(&body, "content")?);
    }
    if let Some(value) = body.get("folderId") {
        patch.folder_id = Some(folder_ref(value)?);
    }
    if let Some(value) = body.get("tags") {
        patch.tags = Some(tag_refs(value)?);
    }

    Ok(patch)
}

/// `GET /api/notes` query string
pub fn note_query(params: &HashMap<String, String>) -> Result<NoteQuery, ApiError> {
    let present = |key: &str| params.get(key).filter(|v| !v.is_empty());

    let folder_id = present("folderId")
        .map(|raw| parse_id(raw, "folderId"))
        .transpose()?;
    let tag_id = present("tagId").map(|raw| parse_id(raw, "tagId")).transpose()?;

    Ok(NoteQuery {
        search_term: present("searchTerm").cloned(),
        folder_id,
        tag_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: ApiError) -> String {
        err.message().to_string()
    }

    #[test]
    fn parse_id_rejects_non_uuid() {
        assert_eq!(message(parse_id("NOT-A-VALID-ID", "id").unwrap_err()), "The `id` is not valid");
        assert!(parse_id("7c9e6679-7425-40de-944b-e07fc1f90ae7", "id").is_ok());
    }

    #[test]
    fn registration_checks_in_order() {
        let cases = [
            (json!({"password": "password"}), "Missing `username` in request body"),
            (json!({"username": "bob"}), "Missing `password` in request body"),
            (json!({"username": "", "password": "password"}), "Missing `username` in request body"),
            (json!({"username": 7, "password": "password"}), "Field `username` is not a string"),
            (
                json!({"username": "bob", "password": "password", "fullname": 3}),
                "Field `fullname` is not a string",
            ),
            (
                json!({"username": " bob", "password": "password"}),
                "Leading or trailing whitespace in `username`",
            ),
            (
                json!({"username": "bob", "password": "password "}),
                "Leading or trailing whitespace in `password`",
            ),
            (
                json!({"username": "bob", "password": "short"}),
                "`password` must be between 8 and 72 characters",
            ),
        ];
        for (body, expected) in cases {
            assert_eq!(message(registration(&body).unwrap_err()), expected, "{}", body);
        }
    }

    #[test]
    fn password_length_counts_characters() {
        let long: String = "é".repeat(72);
        let ok = json!({"username": "bob", "password": long});
        assert!(registration(&ok).is_ok());

        let too_long: String = "a".repeat(73);
        let bad = json!({"username": "bob", "password": too_long});
        assert!(registration(&bad).is_err());
    }

    #[test]
    fn registration_trims_fullname() {
        let body = json!({"username": "bob", "password": "password", "fullname": "  Bob User "});
        let reg = registration(&body).unwrap();
        assert_eq!(reg.fullname.as_deref(), Some("Bob User"));

        let body = json!({"username": "bob", "password": "password", "fullname": null});
        assert_eq!(registration(&body).unwrap().fullname, None);
    }

    #[test]
    fn entity_name_is_required() {
        assert_eq!(message(entity_name(&json!({})).unwrap_err()), "Missing `name` in request body");
        assert_eq!(message(entity_name(&json!({"name": ""})).unwrap_err()), "Missing `name` in request body");
        assert_eq!(entity_name(&json!({"name": "Work"})).unwrap(), "Work");
    }

    #[test]
    fn new_note_validates_references() {
        assert_eq!(
            message(new_note(&json!({"content": "x"})).unwrap_err()),
            "Missing `title` in request body"
        );
        assert_eq!(
            message(new_note(&json!({"title": "x", "folderId": "nope"})).unwrap_err()),
            "The `folderId` is not valid"
        );
        assert_eq!(
            message(new_note(&json!({"title": "x", "tags": "nope"})).unwrap_err()),
            "The `tags` is not valid"
        );
        assert_eq!(
            message(new_note(&json!({"title": "x", "tags": ["nope"]})).unwrap_err()),
            "A `tagId` is not valid"
        );

        let note = new_note(&json!({"title": "x", "folderId": ""})).unwrap();
        assert_eq!(note.folder_id, None);
        assert!(note.tags.is_empty());
    }

    #[test]
    fn note_patch_keeps_only_present_fields() {
        let patch = note_patch(&json!({"content": null, "unknown": 1})).unwrap();
        assert_eq!(patch.content, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.folder_id, None);

        let patch = note_patch(&json!({"folderId": null, "tags": []})).unwrap();
        assert_eq!(patch.folder_id, Some(None));
        assert_eq!(patch.tags, Some(vec![]));

        assert!(note_patch(&json!({"foo": "bar"})).unwrap().is_empty());
        assert!(note_patch(&json!({"title": ""})).is_err());
    }

    #[test]
    fn note_query_validates_ids() {
        let mut params = HashMap::new();
        params.insert("tagId".to_string(), "bad".to_string());
        assert_eq!(message(note_query(&params).unwrap_err()), "The `tagId` is not valid");

        let mut params = HashMap::new();
        params.insert("searchTerm".to_string(), "cats".to_string());
        params.insert("folderId".to_string(), String::new());
        let query = note_query(&params).unwrap();
        assert_eq!(query.search_term.as_deref(), Some("cats"));
        assert_eq!(query.folder_id, None);
    }
}
