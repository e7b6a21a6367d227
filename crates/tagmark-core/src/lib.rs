mod engine;
mod line;
mod pipeline;
mod prefix;
mod render;
mod search;
mod settings;
mod style;

pub use engine::TagEngine;
pub use line::Line;
pub use pipeline::{Pipeline, Processor};
pub use render::{convert, markdown_to_html_sanitized, markdown_to_rich_text, markdown_to_rich_text_with};
pub use search::{find_closing_paren, find_unescaped, find_unescaped_where, is_escaped, replace_first};
pub use settings::{
    HeaderStyle, Markup, OrderedListStyle, PRESETS, RenderSettings, SettingsError,
    UnorderedListStyle, default_settings,
};
pub use style::{AsymmetricOptions, StyleDescriptor, TARGET_PLACEHOLDER, TagShape};
