use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::{AsymmetricOptions, StyleDescriptor};

pub const PRESETS: &[&str] = &["rich-text", "html"];

static DEFAULT_SETTINGS: Lazy<RenderSettings> = Lazy::new(RenderSettings::rich_text);
static HTML_SETTINGS: Lazy<RenderSettings> = Lazy::new(RenderSettings::html);

/// Shared, read-only default settings.
pub fn default_settings() -> &'static RenderSettings {
    &DEFAULT_SETTINGS
}

pub(crate) fn html_settings() -> &'static RenderSettings {
    &HTML_SETTINGS
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to expand preset: {0}")]
    Preset(#[from] toml::ser::Error),
    #[error("unknown preset `{0}`, expected one of: rich-text, html")]
    UnknownPreset(String),
    #[error("style `{style}` has an empty indicator")]
    EmptyIndicator { style: &'static str },
    #[error("markup of style `{style}` contains `{indicator}`, the indicator of style `{other}`")]
    MarkupContainsIndicator {
        style: &'static str,
        other: &'static str,
        indicator: String,
    },
}

/// Every option the converter resolves, one entry per style in pipeline order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderSettings {
    pub escape: char,
    pub autolinks_http: StyleDescriptor,
    pub autolinks_https: StyleDescriptor,
    pub unordered_lists: UnorderedListStyle,
    pub ordered_lists: OrderedListStyle,
    pub bold: StyleDescriptor,
    pub italics: StyleDescriptor,
    pub strikethrough: StyleDescriptor,
    pub monospace: StyleDescriptor,
    pub headers: HeaderStyle,
    pub links: StyleDescriptor,
    pub superscript: StyleDescriptor,
    pub subscript: StyleDescriptor,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Markup {
    pub open: String,
    pub close: String,
}

impl Markup {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HeaderStyle {
    /// Markup per level, `#` first.
    pub levels: Vec<Markup>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnorderedListStyle {
    pub bullet: String,
    pub open: String,
    pub close: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrderedListStyle {
    pub keep_number: bool,
    pub open: String,
    pub close: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::rich_text()
    }
}

impl RenderSettings {
    /// TextMeshPro-style rich text.
    pub fn rich_text() -> Self {
        let link_open = "<link=\"{target}\"><color=#4A9EFF><u>";
        let link_close = "</u></color></link>";
        Self {
            escape: '\\',
            autolinks_http: StyleDescriptor::asymmetric(
                "http://",
                link_open,
                link_close,
                AsymmetricOptions::autolink(),
            ),
            autolinks_https: StyleDescriptor::asymmetric(
                "https://",
                link_open,
                link_close,
                AsymmetricOptions::autolink(),
            ),
            unordered_lists: UnorderedListStyle {
                bullet: "•".to_string(),
                open: String::new(),
                close: String::new(),
            },
            ordered_lists: OrderedListStyle {
                keep_number: true,
                open: String::new(),
                close: String::new(),
            },
            bold: StyleDescriptor::symmetric("**", "<b>", "</b>"),
            italics: StyleDescriptor::symmetric("*", "<i>", "</i>"),
            strikethrough: StyleDescriptor::symmetric("~~", "<s>", "</s>").with_fill('~'),
            monospace: StyleDescriptor::symmetric("`", "<mspace=0.55em>", "</mspace>").with_fill('`'),
            headers: HeaderStyle {
                levels: ["2em", "1.75em", "1.5em", "1.25em", "1.1em", "1em"]
                    .iter()
                    .map(|size| Markup::new(&format!("<size={size}><b>"), "</b></size>"))
                    .collect(),
            },
            links: StyleDescriptor::link(link_open, link_close),
            superscript: StyleDescriptor::asymmetric("^", "<sup>", "</sup>", AsymmetricOptions::default())
                .with_fill('^'),
            subscript: StyleDescriptor::asymmetric("~", "<sub>", "</sub>", AsymmetricOptions::default())
                .with_fill('~'),
        }
    }

    pub fn html() -> Self {
        let link_open = "<a href=\"{target}\">";
        Self {
            autolinks_http: StyleDescriptor::asymmetric(
                "http://",
                link_open,
                "</a>",
                AsymmetricOptions::autolink(),
            ),
            autolinks_https: StyleDescriptor::asymmetric(
                "https://",
                link_open,
                "</a>",
                AsymmetricOptions::autolink(),
            ),
            unordered_lists: UnorderedListStyle {
                bullet: String::new(),
                open: "<li>".to_string(),
                close: "</li>".to_string(),
            },
            ordered_lists: OrderedListStyle {
                keep_number: false,
                open: "<li>".to_string(),
                close: "</li>".to_string(),
            },
            bold: StyleDescriptor::symmetric("**", "<strong>", "</strong>"),
            italics: StyleDescriptor::symmetric("*", "<em>", "</em>"),
            strikethrough: StyleDescriptor::symmetric("~~", "<del>", "</del>").with_fill('~'),
            monospace: StyleDescriptor::symmetric("`", "<code>", "</code>").with_fill('`'),
            headers: HeaderStyle {
                levels: (1..=6)
                    .map(|level| Markup::new(&format!("<h{level}>"), &format!("</h{level}>")))
                    .collect(),
            },
            links: StyleDescriptor::link(link_open, "</a>"),
            ..Self::rich_text()
        }
    }

    pub fn preset(name: &str) -> Result<Self, SettingsError> {
        match name {
            "rich-text" => Ok(Self::rich_text()),
            "html" => Ok(Self::html()),
            other => Err(SettingsError::UnknownPreset(other.to_string())),
        }
    }

    /// Parses a settings file. Keys override the preset named by `preset` (`rich-text` when
    /// absent) field by field, so `[bold]` may set only `open` and `close`.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let mut overrides: toml::Table = toml::from_str(text)?;
        let base = match overrides.remove("preset") {
            Some(toml::Value::String(name)) => Self::preset(&name)?,
            Some(other) => return Err(SettingsError::UnknownPreset(other.to_string())),
            None => Self::rich_text(),
        };
        let toml::Value::Table(mut merged) = toml::Value::try_from(&base)? else {
            unreachable!("settings always serialize to a table");
        };
        merge_tables(&mut merged, overrides);
        let settings: Self = toml::Value::Table(merged).try_into()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Tag styles in pipeline order.
    pub fn tag_styles(&self) -> [(&'static str, &StyleDescriptor); 9] {
        [
            ("autolinks-http", &self.autolinks_http),
            ("autolinks-https", &self.autolinks_https),
            ("bold", &self.bold),
            ("italics", &self.italics),
            ("strikethrough", &self.strikethrough),
            ("monospace", &self.monospace),
            ("links", &self.links),
            ("superscript", &self.superscript),
            ("subscript", &self.subscript),
        ]
    }

    fn emitted_markup(&self) -> Vec<(&'static str, String)> {
        let mut markup = Vec::new();
        for (name, style) in self.tag_styles() {
            markup.extend(style.literal_markup().map(|text| (name, text)));
        }
        for level in &self.headers.levels {
            markup.push(("headers", level.open.clone()));
            markup.push(("headers", level.close.clone()));
        }
        let lists = &self.unordered_lists;
        for text in [&lists.bullet, &lists.open, &lists.close] {
            markup.push(("unordered-lists", text.clone()));
        }
        for text in [&self.ordered_lists.open, &self.ordered_lists.close] {
            markup.push(("ordered-lists", text.clone()));
        }
        markup
    }

    /// Checks that indicators are non-empty and that no emitted markup contains an indicator,
    /// which would let a later processor rewrite an earlier processor's output.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let styles = self.tag_styles();
        if let Some((name, _)) = styles.iter().find(|(_, style)| style.indicator.is_empty()) {
            return Err(SettingsError::EmptyIndicator { style: name });
        }
        for (name, text) in self.emitted_markup() {
            if let Some((other, style)) = styles
                .iter()
                .find(|(_, style)| text.contains(style.indicator.as_str()))
            {
                return Err(SettingsError::MarkupContainsIndicator {
                    style: name,
                    other,
                    indicator: style.indicator.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Nested tables merge key by key; any other value replaces the base value.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(nested) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, nested);
                } else {
                    base.insert(key, toml::Value::Table(nested));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}
