//! Descriptive metadata a host framework shows for this data source.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONNECTION_TYPE: &str = "SourceForge";
pub const CONNECTION_FIELDS: [&str; 2] = ["username", "target_directory"];
pub const ICON_FILE_NAME: &str = "icon.svg";

/// Used when no readable `icon.svg` sits in the plugin directory.
pub const FALLBACK_ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="10" fill="#ff6600"/><path fill="#fff" d="M11 7h2v10h-2z"/></svg>"##;

/// Connection form declaration: a type label plus the fields to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub connection_type: String,
    pub fields: Vec<String>,
}

pub fn connection_data() -> ConnectionData {
    ConnectionData {
        connection_type: CONNECTION_TYPE.to_string(),
        fields: CONNECTION_FIELDS.iter().map(|f| f.to_string()).collect(),
    }
}

/// Returns `icon.svg` from `plugin_dir` if it can be read, else the inline fallback.
pub fn icon_svg(plugin_dir: Option<&Path>) -> String {
    if let Some(dir) = plugin_dir {
        let icon_path = dir.join(ICON_FILE_NAME);
        match fs::read_to_string(&icon_path) {
            Ok(svg) => return svg,
            Err(e) => {
                tracing::debug!(error = ?e, path = %icon_path.display(), "No readable plugin icon, using fallback");
            }
        }
    }
    FALLBACK_ICON_SVG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_data_serializes_to_host_schema() {
        let json = serde_json::to_value(connection_data()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "connection_type": "SourceForge",
                "fields": ["username", "target_directory"]
            })
        );
    }

    #[test]
    fn icon_prefers_plugin_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("icon.svg"), "<svg id=\"custom\"/>").unwrap();
        assert_eq!(icon_svg(Some(dir.path())), "<svg id=\"custom\"/>");
    }

    #[test]
    fn icon_falls_back_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(icon_svg(Some(dir.path())), FALLBACK_ICON_SVG);
        assert_eq!(icon_svg(None), FALLBACK_ICON_SVG);
    }
}
