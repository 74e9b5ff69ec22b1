//! # Response Rendering
//!
//! Serializes a value and writes it, together with a caption, into a display
//! surface. Surfaces are injected rather than discovered through globals, so
//! the renderer is testable against an in-memory buffer; the driver still
//! addresses its surface through a registry keyed by [`RESPONSE_SURFACE`],
//! and a missing surface is a reported diagnostic, not a failure.
//!
//! Serialization strategy, in order:
//! 1. the standard indented form ([`DocValue::to_pretty`]);
//! 2. on a circular-structure error, the identity-guarded form
//!    ([`DocValue::to_pretty_lossy`]);
//! 3. on any other failure, a placeholder embedding the error text.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::messages::OpMessage;
use crate::value::DocValue;

/// Well-known id of the surface the driver renders responses into.
pub const RESPONSE_SURFACE: &str = "api-response";

/// Receives rendered output. Each write fully replaces prior content, so
/// concurrent writers would race; callers serialize calls if order matters.
pub trait DisplaySurface {
    fn replace_content(&mut self, content: &str);
}

/// Prints each rendered block to stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySurface for TerminalSurface {
    fn replace_content(&mut self, content: &str) {
        println!("{content}");
    }
}

/// Keeps only the most recent write.
#[derive(Debug, Default)]
pub struct BufferSurface {
    content: String,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl DisplaySurface for BufferSurface {
    fn replace_content(&mut self, content: &str) {
        self.content = content.to_string();
    }
}

// Lets a caller keep a handle to a registered surface and inspect it later.
impl<S: DisplaySurface> DisplaySurface for Rc<RefCell<S>> {
    fn replace_content(&mut self, content: &str) {
        self.borrow_mut().replace_content(content);
    }
}

/// Named display surfaces, looked up by the renderer before each write.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<String, Box<dyn DisplaySurface>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, surface: Box<dyn DisplaySurface>) {
        self.surfaces.insert(id.into(), surface);
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn DisplaySurface + '_)> {
        self.surfaces
            .get_mut(id)
            .map(|surface| &mut **surface as &mut dyn DisplaySurface)
    }
}

/// Builds the caption + serialized body block for one response.
pub fn format_response(caption: &str, value: &DocValue) -> String {
    let body = match value.to_pretty() {
        Ok(text) => text,
        Err(err) if err.to_string().contains("circular") => value.to_pretty_lossy(),
        Err(err) => format!("[Error serializing object: {err}]"),
    };
    format!("{caption}\n{body}\n")
}

/// Serializes `value` and writes it into `surface`, replacing prior content.
pub fn show_response(surface: &mut dyn DisplaySurface, caption: &str, value: &DocValue) {
    surface.replace_content(&format_response(caption, value));
}

/// Renders into the surface registered under `surface_id`. A missing surface
/// produces a diagnostic for the caller to log and skips the write.
pub fn show_response_in(
    surfaces: &mut SurfaceRegistry,
    surface_id: &str,
    caption: &str,
    value: &DocValue,
) -> Option<OpMessage> {
    match surfaces.get_mut(surface_id) {
        Some(surface) => {
            show_response(surface, caption, value);
            None
        }
        None => Some(OpMessage::error(format!(
            "Display surface \"{surface_id}\" not found"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CIRCULAR_PLACEHOLDER;
    use serde_json::json;

    fn shared_buffer() -> (Rc<RefCell<BufferSurface>>, SurfaceRegistry) {
        let buffer = Rc::new(RefCell::new(BufferSurface::new()));
        let mut surfaces = SurfaceRegistry::new();
        surfaces.register(RESPONSE_SURFACE, Box::new(buffer.clone()));
        (buffer, surfaces)
    }

    #[test]
    fn acyclic_value_renders_caption_and_standard_form() {
        let value = DocValue::from(json!({"a": 1, "b": ["x"]}));
        let expected_body = value.to_pretty().unwrap();

        let output = format_response("Result", &value);
        assert_eq!(output, format!("Result\n{expected_body}\n"));
    }

    #[test]
    fn cyclic_value_renders_placeholder() {
        let value = DocValue::new_map();
        value.insert("a", 1);
        value.insert("self", value.clone());

        let output = format_response("Result", &value);
        assert!(output.starts_with("Result\n"));
        assert!(output.contains(CIRCULAR_PLACEHOLDER));
        assert!(output.contains("\"a\": 1"));
    }

    #[test]
    fn write_replaces_prior_content() {
        let (buffer, mut surfaces) = shared_buffer();

        show_response_in(&mut surfaces, RESPONSE_SURFACE, "First", &DocValue::Int(1));
        show_response_in(&mut surfaces, RESPONSE_SURFACE, "Second", &DocValue::Int(2));

        let content = buffer.borrow().content().to_string();
        assert!(content.contains("Second"));
        assert!(!content.contains("First"));
    }

    #[test]
    fn missing_surface_is_a_diagnostic_not_a_write() {
        let (buffer, mut surfaces) = shared_buffer();

        let diagnostic =
            show_response_in(&mut surfaces, "wrong-id", "Result", &DocValue::Int(1));

        let message = diagnostic.expect("missing surface should be reported");
        assert!(message.content.contains("wrong-id"));
        assert_eq!(buffer.borrow().content(), "");
    }
}
