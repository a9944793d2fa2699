//! The user's intended dashboard

use dashsync_content::ConfigInput;
use serde_json::{Map, Value};

use crate::client::ROOT_FOLDER_ID;
use crate::{Error, Result};

/// Desired state of one dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredConfig {
    /// Dashboard body; a `uid` key inside it is the requested identity
    pub body: ConfigInput,
    /// Parent folder reference, `None` for the root folder
    pub folder_ref: Option<String>,
    /// Version message sent along with writes
    pub message: Option<String>,
}

impl DesiredConfig {
    pub fn new(body: impl Into<ConfigInput>) -> Self {
        Self {
            body: body.into(),
            folder_ref: None,
            message: None,
        }
    }

    pub fn with_folder(mut self, folder_ref: impl Into<String>) -> Self {
        self.folder_ref = Some(folder_ref.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the uid inside a structured body. Raw bodies are left untouched.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        if let Some(map) = self.body.as_object_mut() {
            map.insert("uid".to_string(), Value::String(uid.into()));
        }
        self
    }

    /// The requested uid, if the body sets one
    pub fn uid(&self) -> Option<&str> {
        self.body.str_field("uid")
    }

    pub fn title(&self) -> Option<&str> {
        self.body.str_field("title")
    }

    /// Folder reference with the root spellings (`""`, `"0"`) folded to `None`
    pub fn folder_ref(&self) -> Option<&str> {
        let folder = self.folder_ref.as_deref()?.trim();
        if folder.is_empty() || folder == ROOT_FOLDER_ID.to_string() {
            None
        } else {
            Some(folder)
        }
    }

    /// The body as a mapping that can be written to the service
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedConfig`] if the body is not a JSON object,
    /// has no string `title`, or has a non-string `uid`.
    pub fn writable_body(&self) -> Result<&Map<String, Value>> {
        let map = self
            .body
            .as_object()
            .ok_or_else(|| Error::malformed("dashboard body is not a JSON object"))?;
        if !map.get("title").is_some_and(Value::is_string) {
            return Err(Error::malformed("dashboard body has no string `title`"));
        }
        if map.get("uid").is_some_and(|uid| !uid.is_string()) {
            return Err(Error::malformed("dashboard `uid` must be a string"));
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uid_comes_from_body() {
        let desired = DesiredConfig::new(r#"{"title":"T","uid":"a"}"#);
        assert_eq!(desired.uid(), Some("a"));
        assert_eq!(desired.title(), Some("T"));
    }

    #[test]
    fn with_uid_rewrites_body() {
        let desired = DesiredConfig::new(json!({"title": "T"})).with_uid("x");
        assert_eq!(desired.uid(), Some("x"));
    }

    #[test]
    fn root_folder_spellings() {
        assert_eq!(DesiredConfig::new("{}").folder_ref(), None);
        assert_eq!(DesiredConfig::new("{}").with_folder("").folder_ref(), None);
        assert_eq!(DesiredConfig::new("{}").with_folder("0").folder_ref(), None);
        assert_eq!(DesiredConfig::new("{}").with_folder("12").folder_ref(), Some("12"));
    }

    #[test]
    fn writable_body_requires_title() {
        let err = DesiredConfig::new(json!({"uid": "a"})).writable_body().unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));
    }

    #[test]
    fn writable_body_rejects_raw_text() {
        let err = DesiredConfig::new("not json").writable_body().unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));
    }

    #[test]
    fn writable_body_rejects_numeric_uid() {
        let err = DesiredConfig::new(json!({"title": "T", "uid": 4}))
            .writable_body()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedConfig { .. }));
    }
}
