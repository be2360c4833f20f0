use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Where a rendered doc is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// Inline annotation at the end of the line.
    #[default]
    Annotation,
    Popup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub show_on_hover: bool,
    pub show_on_double_click: bool,
    pub display_style: DisplayStyle,
    pub hover_auto_hide: bool,
    pub double_click_auto_hide: bool,
    pub keybinding_auto_hide: bool,
    pub display_docstring: bool,
    pub display_interface: bool,
    pub display_file_hyperlink: bool,
    pub open_hyperlink_as_transient: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_on_hover: true,
            show_on_double_click: true,
            display_style: DisplayStyle::Annotation,
            hover_auto_hide: true,
            double_click_auto_hide: true,
            keybinding_auto_hide: false,
            display_docstring: true,
            display_interface: true,
            display_file_hyperlink: true,
            open_hyperlink_as_transient: true,
        }
    }
}

impl DisplaySettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: DisplaySettingsPatch,
    ) {
        if let Some(v) = patch.show_on_hover {
            self.show_on_hover = v;
        }
        if let Some(v) = patch.show_on_double_click {
            self.show_on_double_click = v;
        }
        if let Some(v) = patch.display_style {
            self.display_style = v;
        }
        if let Some(v) = patch.hover_auto_hide {
            self.hover_auto_hide = v;
        }
        if let Some(v) = patch.double_click_auto_hide {
            self.double_click_auto_hide = v;
        }
        if let Some(v) = patch.keybinding_auto_hide {
            self.keybinding_auto_hide = v;
        }
        if let Some(v) = patch.display_docstring {
            self.display_docstring = v;
        }
        if let Some(v) = patch.display_interface {
            self.display_interface = v;
        }
        if let Some(v) = patch.display_file_hyperlink {
            self.display_file_hyperlink = v;
        }
        if let Some(v) = patch.open_hyperlink_as_transient {
            self.open_hyperlink_as_transient = v;
        }
    }
}

/// Accepts the camelCase names and their snake_case spellings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DisplaySettingsPatch {
    #[serde(alias = "show_on_hover")]
    pub(crate) show_on_hover: Option<bool>,
    #[serde(alias = "show_on_double_click")]
    pub(crate) show_on_double_click: Option<bool>,
    #[serde(alias = "display_style")]
    pub(crate) display_style: Option<DisplayStyle>,
    #[serde(alias = "hover_auto_hide")]
    pub(crate) hover_auto_hide: Option<bool>,
    #[serde(alias = "double_click_auto_hide")]
    pub(crate) double_click_auto_hide: Option<bool>,
    #[serde(alias = "keybinding_auto_hide")]
    pub(crate) keybinding_auto_hide: Option<bool>,
    #[serde(alias = "display_docstring")]
    pub(crate) display_docstring: Option<bool>,
    #[serde(alias = "display_interface")]
    pub(crate) display_interface: Option<bool>,
    #[serde(alias = "display_file_hyperlink")]
    pub(crate) display_file_hyperlink: Option<bool>,
    #[serde(alias = "open_hyperlink_as_transient")]
    pub(crate) open_hyperlink_as_transient: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
