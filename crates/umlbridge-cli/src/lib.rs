//! CLI logic for the umlbridge tool.
//!
//! Both subcommands work on a fresh in-memory workspace: `import` lays the
//! text out and prints where every element went, `export` re-serializes the
//! imported model.

pub mod error_adapter;

mod args;
mod config;
mod stream;

pub use args::{Args, Command};

use log::{info, warn};

use umlbridge::{
    Bridge, BridgeError, ImportOutcome,
    model::{ElementId, ElementKind, ModelElement, RelationshipKind},
    store::{MemoryWorkspace, ModelStore},
};
use umlbridge_parser::Diagnostic;

use error_adapter::WarningAdapter;
use stream::StreamClipboard;

/// Run the umlbridge CLI application
///
/// # Errors
///
/// Returns `BridgeError` for:
/// - Configuration loading errors
/// - Input and output file errors
/// - SVG preview errors
///
/// Lines the parser skips are reported as warnings and do not fail the run.
pub fn run(args: &Args) -> Result<(), BridgeError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let bridge = Bridge::new(app_config);

    match &args.command {
        Command::Import { input, svg } => import(&bridge, input, svg.as_deref()),
        Command::Export {
            input,
            output,
            select,
        } => export(&bridge, input, output.as_deref(), select),
    }
}

fn import(bridge: &Bridge, input: &str, svg: Option<&str>) -> Result<(), BridgeError> {
    info!(input_path = input; "Importing diagram");

    let mut clipboard = StreamClipboard::new(input, None);
    let mut workspace = MemoryWorkspace::new(project_name(input));
    let Some(outcome) = bridge.import_clipboard(&mut workspace, &mut clipboard)? else {
        return Ok(());
    };
    report_warnings(outcome.diagnostics(), clipboard.text());

    print_summary(&workspace, &outcome);

    if let Some(path) = svg {
        bridge.write_svg(&workspace, &outcome.layout, path)?;
        info!(output_file = path; "SVG preview exported successfully");
    }
    Ok(())
}

fn export(
    bridge: &Bridge,
    input: &str,
    output: Option<&str>,
    names: &[String],
) -> Result<(), BridgeError> {
    info!(input_path = input, output_path:? = output; "Exporting diagram");

    let mut clipboard = StreamClipboard::new(input, output);
    let mut workspace = MemoryWorkspace::new(project_name(input));
    let Some(outcome) = bridge.import_clipboard(&mut workspace, &mut clipboard)? else {
        return Ok(());
    };
    report_warnings(outcome.diagnostics(), clipboard.text());

    let selection = select_for_export(&workspace, &outcome, names);
    workspace.select(selection);
    bridge.export_selection(&workspace, &mut clipboard)?;
    Ok(())
}

/// Named elements, or every top-level class, plus the associations between
/// them.
fn select_for_export(
    workspace: &MemoryWorkspace,
    outcome: &ImportOutcome,
    names: &[String],
) -> Vec<ElementId> {
    let root = workspace.project_root();
    let mut selected: Vec<ElementId> = if names.is_empty() {
        workspace
            .elements()
            .filter(|element| element.is_kind(ElementKind::Class) && element.parent() == Some(root))
            .map(ModelElement::id)
            .collect()
    } else {
        names
            .iter()
            .filter_map(|name| {
                let found = outcome
                    .parse
                    .element(name)
                    .or_else(|| workspace.find_by_name(name).map(ModelElement::id));
                if found.is_none() {
                    warn!(name = name.as_str(); "No element to export with this name");
                }
                found
            })
            .collect()
    };

    let associations: Vec<ElementId> = outcome
        .layout
        .relationships
        .iter()
        .filter_map(|view| workspace.element(view.model))
        .filter(|element| {
            element.relationship().is_some_and(|relationship| {
                relationship.kind == RelationshipKind::Association
                    && selected.contains(&relationship.source())
                    && selected.contains(&relationship.target())
            })
        })
        .map(ModelElement::id)
        .collect();
    selected.extend(associations);
    selected
}

fn print_summary(workspace: &MemoryWorkspace, outcome: &ImportOutcome) {
    let layout = &outcome.layout;
    println!(
        "{} diagram, {} layout: {} elements, {} relationships",
        outcome.diagram_kind(),
        layout.strategy,
        layout.entries.len(),
        layout.relationships.len()
    );
    for entry in &layout.entries {
        let name = workspace
            .element(entry.element)
            .map_or("?", |element| element.name.as_str());
        println!(
            "  {name:<24} x={:<6} y={:<6} {}x{}",
            entry.x, entry.y, entry.width, entry.height
        );
    }
    if !layout.skipped_elements.is_empty() || layout.skipped_relationships > 0 {
        println!(
            "  skipped: {} elements, {} relationships",
            layout.skipped_elements.len(),
            layout.skipped_relationships
        );
    }
}

fn report_warnings(diagnostics: &[Diagnostic], src: &str) {
    let reporter = miette::GraphicalReportHandler::new();
    for warning in WarningAdapter::all(diagnostics, src) {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, &warning).is_ok() {
            warn!("{writer}");
        }
    }
}

fn project_name(input: &str) -> &str {
    std::path::Path::new(input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|_| input != "-")
        .unwrap_or("stdin")
}
