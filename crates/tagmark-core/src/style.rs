use serde::{Deserialize, Serialize};

/// Placeholder in open/close markup replaced by a span's target (link destination or URL).
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// How one markdown style is recognised and what it is rewritten to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub indicator: String,
    pub open: String,
    pub close: String,
    /// Content made only of this character (and escape markers) is never tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<char>,
    #[serde(default)]
    pub shape: TagShape,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum TagShape {
    /// Same indicator opens and closes: `**bold**`.
    #[default]
    Symmetric,
    /// Indicator followed by a bare word or a `(parenthesised span)`: `^word`, `^(two words)`.
    Asymmetric(AsymmetricOptions),
    /// `[text](destination)`.
    Link,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AsymmetricOptions {
    /// Keep the indicator as part of the wrapped text (autolinks keep `https://`).
    pub retain_indicator: bool,
    /// Only match at the start of the line or after whitespace.
    pub require_boundary: bool,
    /// Reject spans whose content starts with the indicator's first character.
    pub chained_rule: bool,
}

impl Default for AsymmetricOptions {
    fn default() -> Self {
        Self {
            retain_indicator: false,
            require_boundary: false,
            chained_rule: true,
        }
    }
}

impl AsymmetricOptions {
    pub fn autolink() -> Self {
        Self {
            retain_indicator: true,
            require_boundary: true,
            chained_rule: false,
        }
    }
}

impl StyleDescriptor {
    pub fn symmetric(indicator: &str, open: &str, close: &str) -> Self {
        Self {
            indicator: indicator.to_string(),
            open: open.to_string(),
            close: close.to_string(),
            fill: None,
            shape: TagShape::Symmetric,
        }
    }

    pub fn asymmetric(indicator: &str, open: &str, close: &str, options: AsymmetricOptions) -> Self {
        Self {
            shape: TagShape::Asymmetric(options),
            ..Self::symmetric(indicator, open, close)
        }
    }

    pub fn link(open: &str, close: &str) -> Self {
        Self {
            shape: TagShape::Link,
            ..Self::symmetric("[", open, close)
        }
    }

    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Markup with the target placeholder removed, i.e. the text a later processor could see.
    pub(crate) fn literal_markup(&self) -> [String; 2] {
        [
            self.open.replace(TARGET_PLACEHOLDER, ""),
            self.close.replace(TARGET_PLACEHOLDER, ""),
        ]
    }
}
