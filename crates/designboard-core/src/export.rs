//! Export of a layout as structured JSON or as a standalone HTML page.

use crate::element::{Element, ElementKind};
use crate::snapshot::{self, SnapshotError};
use kurbo::Size;
use std::fmt::Write;
use std::str::FromStr;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Indented JSON with every element field.
    Json,
    /// Self-contained HTML document.
    Html,
}

impl ExportFormat {
    /// Conventional file name for the format.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "design.json",
            ExportFormat::Html => "design.html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Export elements in the given format.
pub fn export(elements: &[Element], canvas: Size, format: ExportFormat) -> Result<String, SnapshotError> {
    let out = match format {
        ExportFormat::Json => to_json(elements)?,
        ExportFormat::Html => to_html(elements, canvas),
    };
    log::info!("Exported {} elements as {:?}", elements.len(), format);
    Ok(out)
}

/// Indented JSON, in store order.
pub fn to_json(elements: &[Element]) -> Result<String, SnapshotError> {
    snapshot::encode_pretty(elements)
}

/// Standalone HTML page reproducing the layout with absolutely positioned
/// boxes, bottom to top.
pub fn to_html(elements: &[Element], canvas: Size) -> String {
    let mut sorted: Vec<&Element> = elements.iter().collect();
    sorted.sort_by_key(|e| e.z_index);

    let mut body = String::new();
    for element in sorted {
        render_element_html(&mut body, element);
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>Exported Design</title>\n</head>\n\
         <body style=\"margin: 0; display: flex; justify-content: center; align-items: center; min-height: 100vh; background: #1e1e1e;\">\n  \
         <div style=\"position: relative; width: {}px; height: {}px; background: #ffffff; border-radius: 2px; box-shadow: 0 8px 32px rgba(0,0,0,0.5);\">\n\
         {body}  </div>\n</body>\n</html>",
        canvas.width, canvas.height
    )
}

fn render_element_html(out: &mut String, element: &Element) {
    let fill = escape_html(&element.styles.background);
    let mut styles = vec![
        "position: absolute".to_string(),
        format!("left: {}px", element.x),
        format!("top: {}px", element.y),
        format!("width: {}px", element.width),
        format!("height: {}px", element.height),
        format!("z-index: {}", element.z_index),
        format!("transform: rotate({}deg)", element.rotation),
    ];
    let mut content = String::new();

    match element.kind {
        ElementKind::Rect => {
            styles.push(format!("background: {fill}"));
            styles.push("border-radius: 4px".to_string());
        }
        ElementKind::Circle | ElementKind::Ellipse => {
            styles.push(format!("background: {fill}"));
            styles.push("border-radius: 9999px".to_string());
        }
        ElementKind::Diamond => {
            let _ = write!(
                content,
                "<div style=\"width:100%;height:100%;background:{fill};transform:rotate(45deg)\"></div>"
            );
        }
        ElementKind::Crescent => {
            let _ = write!(
                content,
                "<div style=\"position:relative;width:100%;height:100%;background:{fill};border-radius:9999px;overflow:hidden\">\
                 <div style=\"position:absolute;width:85%;height:85%;background:#fff;border-radius:9999px;top:-10%;left:25%\"></div></div>"
            );
        }
        ElementKind::Image => {
            if !element.image_src.is_empty() {
                let _ = write!(
                    content,
                    "<img src=\"{}\" style=\"width:100%;height:100%;object-fit:cover\">",
                    escape_html(&element.image_src)
                );
            }
            styles.push("overflow: hidden".to_string());
        }
        ElementKind::Text => {
            styles.extend(
                [
                    "display: flex",
                    "align-items: center",
                    "padding: 8px 12px",
                    "font-family: system-ui, sans-serif",
                    "font-size: 16px",
                    "color: #1a1a1a",
                ]
                .map(String::from),
            );
            content.push_str(&escape_html(&element.text));
        }
        ElementKind::Freehand => {
            let color = escape_html(&element.draw_color);
            for point in &element.draw_points {
                let _ = write!(
                    content,
                    "<div style=\"position:absolute;left:{}px;top:{}px;width:{size}px;height:{size}px;background:{color};border-radius:50%\"></div>",
                    point.x,
                    point.y,
                    size = element.draw_size,
                );
            }
            styles.push("overflow: visible".to_string());
        }
    }

    let _ = writeln!(out, "    <div style=\"{}\">{}</div>", styles.join("; "), content);
}

/// Escape text for HTML content and double-quoted attributes.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
