//! Designboard Application
//!
//! Command-line shell over the editor: loads the saved layout, replays
//! input logs against it, and prints or exports the result.

mod cli;
mod replay;
mod shortcuts;

pub use cli::{CliArgs, Command};
pub use replay::{ReplayReport, Replayer, read_log, replay};
pub use shortcuts::{Shortcut, ShortcutRegistry};

use anyhow::Context;
use designboard_core::{Editor, EditorConfig};
use designboard_render::{RenderContext, Renderer, SceneRecorder, ViewMaterializer, VisualBody};
use std::fs;
use std::io::Write;

/// Run a parsed command, writing its output to `out`.
pub fn run(args: CliArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let Some(command) = args.command.clone() else {
        let mut cmd = <CliArgs as clap::CommandFactory>::command();
        cmd.print_help()?;
        writeln!(out)?;
        return Ok(());
    };
    if let Command::Shortcuts = command {
        writeln!(out, "{}", ShortcutRegistry::describe())?;
        return Ok(());
    }

    let mut editor = Editor::new(EditorConfig::from(&args), args.open_storage()?);
    let outcome = editor.load();
    if let Some(notice) = outcome.notice() {
        log::warn!("{}", notice);
    }

    match command {
        Command::Layers => print_layers(&editor, out)?,
        Command::View => print_view(&editor, out)?,
        Command::Export { format, out: path } => {
            let text = editor.export(format)?;
            match path {
                Some(path) => {
                    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Exported to {}", path.display())?;
                }
                None => writeln!(out, "{}", text)?,
            }
        }
        Command::Replay { log } => {
            let events = read_log(&log)?;
            let report = replay(&mut editor, &events);
            if !editor.save() {
                anyhow::bail!("Failed to save layout under '{}'", args.key);
            }
            writeln!(
                out,
                "Replayed {} events ({} keys, {} images); {} elements",
                report.events,
                report.keys_handled,
                report.images_assigned,
                editor.elements().len()
            )?;
            writeln!(out, "{}", editor.selection_label())?;
        }
        Command::Clear => {
            editor.clear();
            writeln!(out, "Cleared '{}'", args.key)?;
        }
        Command::Shortcuts => {}
    }
    Ok(())
}

fn print_layers(editor: &Editor, out: &mut dyn Write) -> anyhow::Result<()> {
    let layers = editor.layers();
    if layers.is_empty() {
        writeln!(out, "No elements")?;
        return Ok(());
    }
    for layer in layers {
        writeln!(
            out,
            "{:>3}  {} {:<22} {:<12} {}{}",
            layer.z_index,
            layer.icon,
            layer.name,
            layer.dimensions,
            layer.id,
            if layer.locked { "  [locked]" } else { "" }
        )?;
    }
    Ok(())
}

fn print_view(editor: &Editor, out: &mut dyn Write) -> anyhow::Result<()> {
    let materializer = ViewMaterializer::for_editor(editor);
    let tree = materializer.tree();
    for visual in tree.paint_order() {
        let body = match &visual.body {
            VisualBody::Shape { .. } => "shape",
            VisualBody::Diamond { .. } => "diamond",
            VisualBody::Crescent { .. } => "crescent",
            VisualBody::Image { .. } => "image",
            VisualBody::ImagePlaceholder { .. } => "placeholder",
            VisualBody::Text { .. } => "text",
            VisualBody::Dots { .. } => "dots",
        };
        writeln!(
            out,
            "{} {:<11} ({}, {}) {}x{} rot {}",
            visual.id,
            body,
            visual.frame.x0,
            visual.frame.y0,
            visual.frame.width(),
            visual.frame.height(),
            visual.rotation
        )?;
    }

    let mut recorder = SceneRecorder::new();
    recorder.build_scene(&RenderContext::new(tree))?;
    writeln!(out, "{} visuals, {} draw commands", tree.len(), recorder.commands().len())?;
    Ok(())
}
