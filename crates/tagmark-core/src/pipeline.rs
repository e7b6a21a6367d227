use tracing::debug;

use crate::engine::TagEngine;
use crate::line::Line;
use crate::prefix;
use crate::settings::{HeaderStyle, OrderedListStyle, RenderSettings, UnorderedListStyle};
use crate::style::StyleDescriptor;

/// One step of the pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Processor {
    Tag {
        name: &'static str,
        style: StyleDescriptor,
    },
    Headers(HeaderStyle),
    UnorderedLists(UnorderedListStyle),
    OrderedLists(OrderedListStyle),
}

impl Processor {
    pub fn name(&self) -> &'static str {
        match self {
            Processor::Tag { name, .. } => name,
            Processor::Headers(_) => "headers",
            Processor::UnorderedLists(_) => "unordered-lists",
            Processor::OrderedLists(_) => "ordered-lists",
        }
    }

    /// Runs over every line not flagged to skip further processing.
    pub fn process(&self, lines: &mut [Line], escape: char) {
        match self {
            Processor::Tag { style, .. } => {
                let engine = TagEngine::new(style, escape);
                for line in lines.iter_mut().filter(|line| !line.skip_further_processing()) {
                    engine.process_line(line);
                }
            }
            Processor::Headers(style) => prefix::headers(lines, style),
            Processor::UnorderedLists(style) => prefix::unordered_lists(lines, style),
            Processor::OrderedLists(style) => prefix::ordered_lists(lines, style),
        }
    }
}

/// A fixed, ordered list of processors. Each sees the output of every processor before it.
#[derive(Clone, Debug)]
pub struct Pipeline {
    processors: Vec<Processor>,
    escape: char,
}

impl Pipeline {
    pub fn new(processors: Vec<Processor>, escape: char) -> Self {
        Self { processors, escape }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        let tag = |name, style: &StyleDescriptor| Processor::Tag {
            name,
            style: style.clone(),
        };
        let processors = vec![
            tag("autolinks-http", &settings.autolinks_http),
            tag("autolinks-https", &settings.autolinks_https),
            Processor::UnorderedLists(settings.unordered_lists.clone()),
            Processor::OrderedLists(settings.ordered_lists.clone()),
            tag("bold", &settings.bold),
            tag("italics", &settings.italics),
            tag("strikethrough", &settings.strikethrough),
            tag("monospace", &settings.monospace),
            Processor::Headers(settings.headers.clone()),
            tag("links", &settings.links),
            tag("superscript", &settings.superscript),
            tag("subscript", &settings.subscript),
        ];
        Self::new(processors, settings.escape)
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn escape(&self) -> char {
        self.escape
    }

    pub fn run(&self, lines: &mut [Line]) {
        for processor in &self.processors {
            debug!(processor = processor.name(), lines = lines.len(), "running processor");
            processor.process(lines, self.escape);
        }
    }
}
