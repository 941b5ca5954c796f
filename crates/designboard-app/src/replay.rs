//! Replays recorded input logs through an editor session.

use anyhow::Context;
use designboard_core::{Editor, ImageRequest, InputEvent, Key};
use std::fs;
use std::path::Path;

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub events: usize,
    pub keys_handled: usize,
    pub image_requests: usize,
    pub images_assigned: usize,
    /// Entries that had nothing to act on, e.g. image data with no request.
    pub ignored: usize,
}

/// Read an input log: a JSON array of events.
pub fn read_log(path: &Path) -> anyhow::Result<Vec<InputEvent>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let events = serde_json::from_str(&text).with_context(|| format!("Malformed input log {}", path.display()))?;
    Ok(events)
}

/// Drives an editor from logged events, remembering the most recent image
/// request so a later `image_data` entry can answer it.
pub struct Replayer<'a> {
    editor: &'a mut Editor,
    pending_image: Option<ImageRequest>,
    report: ReplayReport,
}

impl<'a> Replayer<'a> {
    pub fn new(editor: &'a mut Editor) -> Self {
        Self {
            editor,
            pending_image: None,
            report: ReplayReport::default(),
        }
    }

    pub fn apply(&mut self, event: &InputEvent) {
        self.report.events += 1;
        if let Some(pointer) = event.as_pointer() {
            if let Some(request) = self.editor.pointer(pointer) {
                self.image_requested(request);
            }
            return;
        }
        match event {
            InputEvent::DoubleClick { position } => {
                if !self.editor.double_click(*position) {
                    self.report.ignored += 1;
                }
            }
            InputEvent::Key { key } => {
                if self.editor.key(&Key::from_name(key)) {
                    self.report.keys_handled += 1;
                }
            }
            InputEvent::TextInput { text } => {
                if !self.editor.set_text_edit_buffer(text) {
                    self.report.ignored += 1;
                }
            }
            InputEvent::SelectTool { tool } => {
                self.editor.select_tool(*tool);
            }
            InputEvent::ImageData { data_url } => match self.pending_image.take() {
                Some(request) => match self.editor.complete_image_request(request, data_url) {
                    Ok(()) => self.report.images_assigned += 1,
                    Err(_) => self.report.ignored += 1,
                },
                None => {
                    log::warn!("Image data without a pending request");
                    self.report.ignored += 1;
                }
            },
            InputEvent::PointerDown { .. } | InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => {}
        }
    }

    fn image_requested(&mut self, request: ImageRequest) {
        log::debug!("Image requested for {}", request.element_id());
        self.report.image_requests += 1;
        self.pending_image = Some(request);
    }

    pub fn finish(self) -> ReplayReport {
        self.report
    }
}

/// Apply every event in order.
pub fn replay(editor: &mut Editor, events: &[InputEvent]) -> ReplayReport {
    let mut replayer = Replayer::new(editor);
    for event in events {
        replayer.apply(event);
    }
    replayer.finish()
}
