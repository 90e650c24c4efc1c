//! Example: Exporting a model built in code, then importing it again
//!
//! This example creates two classes directly through the store traits,
//! serializes them to diagram text and imports that text into a second
//! workspace, where it is laid out and rendered as an SVG preview.

use umlbridge::{
    Bridge,
    clipboard::MemoryClipboard,
    model::{Attribute, ElementKind, Operation, Parameter, Visibility},
    store::{MemoryWorkspace, ModelStore, NewElement},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bridge = Bridge::default();

    let mut model = MemoryWorkspace::new("Accounts");
    let root = model.project_root();

    let account = model.create_element(NewElement::new(ElementKind::Class, root, "Account"))?;
    model.add_attribute(
        account,
        Attribute {
            name: "balance".to_string(),
            type_name: Some("decimal".to_string()),
            visibility: Visibility::Private,
            default_value: None,
        },
    )?;
    model.add_operation(
        account,
        Operation {
            name: "deposit".to_string(),
            visibility: Visibility::Public,
            parameters: vec![
                Parameter::input("amount", Some("decimal".to_string())),
                Parameter::returning("bool"),
            ],
        },
    )?;
    let owner = model.create_element(NewElement::new(ElementKind::Class, root, "Account Owner"))?;

    model.select([account, owner]);
    let mut clipboard = MemoryClipboard::new();
    let text = bridge.export_selection(&model, &mut clipboard)?;
    println!("Exported text:\n{text}\n");

    let mut copy = MemoryWorkspace::new("Copy");
    let Some(outcome) = bridge.import_clipboard(&mut copy, &mut clipboard)? else {
        return Ok(());
    };

    for entry in &outcome.layout.entries {
        let name = copy.element(entry.element).map_or("?", |e| e.name.as_str());
        println!("{name} placed at ({}, {})", entry.x, entry.y);
    }

    let svg = bridge.render_svg(&copy, &outcome.layout)?;
    println!("\nSVG preview is {} bytes", svg.len());

    Ok(())
}
