use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use tracing::debug;

use crate::line::Line;
use crate::pipeline::Pipeline;
use crate::settings::{RenderSettings, default_settings, html_settings};

/// Converts markdown to rich text with the default settings.
pub fn markdown_to_rich_text(source: &str) -> String {
    markdown_to_rich_text_with(source, default_settings())
}

pub fn markdown_to_rich_text_with(source: &str, settings: &RenderSettings) -> String {
    convert(source, &Pipeline::from_settings(settings))
}

/// Runs a pipeline over every line of `source`. Each retained line is followed by `\n`.
pub fn convert(source: &str, pipeline: &Pipeline) -> String {
    if source.is_empty() {
        return String::new();
    }
    let mut lines: Vec<Line> = source.lines().map(Line::new).collect();
    pipeline.run(&mut lines);

    let mut out = String::with_capacity(source.len());
    let mut dropped = 0usize;
    for line in &lines {
        if line.drop_from_output() {
            dropped += 1;
            continue;
        }
        out.push_str(&line.finish(pipeline.escape()));
        out.push('\n');
    }
    debug!(lines = lines.len(), dropped, "converted document");
    out
}

/// Converts with the HTML preset and cleans the result against a small allow-list.
pub fn markdown_to_html_sanitized(source: &str) -> String {
    let raw_html = markdown_to_rich_text_with(source, html_settings());

    let tags: HashSet<&'static str> = [
        "a", "code", "del", "em", "h1", "h2", "h3", "h4", "h5", "h6", "li", "strong", "sub", "sup",
    ]
    .iter()
    .copied()
    .collect();

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .generic_attributes(HashSet::new())
        .tag_attributes(tag_attributes)
        .clean(&raw_html)
        .to_string()
}
