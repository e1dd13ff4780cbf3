//! Script Filter JSON output.

use serde::Serialize;
use std::io::Write;

use super::item::DisplayItem;
use super::CoreError;

pub const NO_RESULTS_TITLE: &str = "No Results";
pub const NO_RESULTS_SUBTITLE: &str = "No matches found for your query";
/// Placeholder image shipped next to the workflow.
pub const PLACEHOLDER_ICON: &str = "icon.png";

#[derive(Debug, Serialize)]
struct ScriptFilter<'a, T> {
    items: &'a [T],
}

#[derive(Debug, Serialize)]
struct PlaceholderIcon {
    path: &'static str,
}

#[derive(Debug, Serialize)]
struct NoResultsItem {
    title: &'static str,
    subtitle: &'static str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<PlaceholderIcon>,
}

/// The document printed at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Results(Vec<DisplayItem>),
    /// Nothing matched; `with_icon` adds the bundled placeholder image.
    NoResults { with_icon: bool },
}

impl Payload {
    /// Chooses the placeholder when `items` is empty.
    pub fn from_items(items: Vec<DisplayItem>, display_images: bool) -> Self {
        if items.is_empty() {
            Payload::NoResults {
                with_icon: display_images,
            }
        } else {
            Payload::Results(items)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::NoResults { .. })
    }

    /// Compact JSON text of the document.
    pub fn to_json(&self) -> Result<String, CoreError> {
        let json = match self {
            Payload::Results(items) => serde_json::to_string(&ScriptFilter { items })?,
            Payload::NoResults { with_icon } => {
                let placeholder = NoResultsItem {
                    title: NO_RESULTS_TITLE,
                    subtitle: NO_RESULTS_SUBTITLE,
                    valid: false,
                    icon: with_icon.then_some(PlaceholderIcon {
                        path: PLACEHOLDER_ICON,
                    }),
                };
                serde_json::to_string(&ScriptFilter {
                    items: std::slice::from_ref(&placeholder),
                })?
            }
        };
        Ok(json)
    }

    /// Writes the document followed by a newline.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), CoreError> {
        let json = self.to_json()?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{Icon, IconType, FILE_SKIPCHECK};

    fn item(path: &str, subtitle: Option<&str>) -> DisplayItem {
        DisplayItem {
            uid: path.to_string(),
            title: path.rsplit('/').next().unwrap().to_string(),
            subtitle: subtitle.map(str::to_string),
            kind: FILE_SKIPCHECK,
            match_text: None,
            icon: Icon {
                path: path.to_string(),
                kind: Some(IconType::FileIcon),
            },
            arg: path.to_string(),
        }
    }

    #[test]
    fn test_empty_items_select_placeholder() {
        assert!(Payload::from_items(Vec::new(), false).is_empty());
        assert!(!Payload::from_items(vec![item("/a", None)], false).is_empty());
    }

    #[test]
    fn test_placeholder_without_icon() {
        let json = Payload::NoResults { with_icon: false }.to_json().unwrap();
        insta::assert_snapshot!(json, @r#"{"items":[{"title":"No Results","subtitle":"No matches found for your query","valid":false}]}"#);
    }

    #[test]
    fn test_placeholder_with_icon() {
        let json = Payload::NoResults { with_icon: true }.to_json().unwrap();
        insta::assert_snapshot!(json, @r#"{"items":[{"title":"No Results","subtitle":"No matches found for your query","valid":false,"icon":{"path":"icon.png"}}]}"#);
    }

    #[test]
    fn test_results_omit_absent_fields() {
        let payload = Payload::Results(vec![item("/Users/me/a.txt", None)]);
        let json = payload.to_json().unwrap();
        insta::assert_snapshot!(json, @r#"{"items":[{"uid":"/Users/me/a.txt","title":"a.txt","type":"file:skipcheck","icon":{"path":"/Users/me/a.txt","type":"fileicon"},"arg":"/Users/me/a.txt"}]}"#);
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_write_to_appends_newline() {
        let mut out = Vec::new();
        Payload::NoResults { with_icon: false }
            .write_to(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["items"][0]["valid"], false);
    }
}
