use serde::{Serialize, Deserialize};

/// display settings for the embeddable viewer widget. every field is
/// optional on the wire and stored as given
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDoc {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub avatar: Option<bool>,
    pub is_username: Option<bool>,
    pub username: Option<String>,
    pub is_short_description: Option<bool>,
    pub short_description: Option<String>,
    pub is_description: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedSettings {
    pub code: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn settings_doc_allows_all_null() {
        let doc: SettingsDoc = serde_json::from_str(
            r#"{
                "width": null,
                "height": null,
                "avatar": null,
                "is_username": null,
                "username": null,
                "is_short_description": null,
                "short_description": null,
                "is_description": null,
                "description": null
            }"#
        ).expect("failed to parse all-null settings document");

        assert_eq!(doc.width, None);
        assert_eq!(doc.username, None);
    }

    #[test]
    fn settings_doc_round_trips() {
        let doc = SettingsDoc {
            width: Some(320),
            height: Some(240),
            avatar: Some(true),
            is_username: Some(true),
            username: Some(String::from("streamer")),
            is_short_description: Some(false),
            short_description: None,
            is_description: None,
            description: None,
        };

        let encoded = serde_json::to_string(&doc).expect("failed to serialize settings");
        let decoded: SettingsDoc = serde_json::from_str(&encoded).expect("failed to parse settings");

        assert_eq!(doc, decoded);
    }
}
