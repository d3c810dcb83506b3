//! Text and JSON output for the subcommands.

use anyhow::Result;
use colorfun_engine::{ColorWall, NibblePicker, NoisePalette, PlaygroundSession};
use colorfun_types::{Color, Language, NamedColorCatalog, NoiseGroup};
use serde_json::{Value, json};

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn rgb(color: Color) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

pub fn print_noise_types(language: Language, json: bool) -> Result<()> {
    if json {
        let groups: Vec<Value> = NoiseGroup::ALL
            .iter()
            .map(|group| {
                let types: Vec<Value> = group
                    .types()
                    .map(|noise_type| {
                        json!({
                            "id": noise_type.as_str(),
                            "label": noise_type.label(language),
                            "description": noise_type.description(language),
                        })
                    })
                    .collect();
                json!({ "group": group.label(language), "types": types })
            })
            .collect();
        return print_json(&Value::Array(groups));
    }

    for group in NoiseGroup::ALL {
        println!("{}", group.label(language));
        for noise_type in group.types() {
            println!("  {:<14} {}", noise_type.as_str(), noise_type.description(language));
        }
    }
    Ok(())
}

pub fn print_named(catalog: &NamedColorCatalog, group: Option<&str>, language: Language, json: bool) -> Result<()> {
    let fallback = match language {
        Language::En => "group",
        Language::Es => "grupo",
    };

    let Some(id) = group else {
        if json {
            let groups: Vec<Value> = catalog
                .groups
                .iter()
                .map(|group| {
                    json!({
                        "group": group.group,
                        "label": group.display_label(fallback),
                        "count": group.colors.len(),
                    })
                })
                .collect();
            return print_json(&Value::Array(groups));
        }
        for group in &catalog.groups {
            println!("{:<10} {:<16} {}", group.group, group.display_label(fallback), group.colors.len());
        }
        return Ok(());
    };

    let Some(group) = catalog.group(id) else {
        anyhow::bail!("no named-color group '{id}'");
    };
    if json {
        return print_json(&serde_json::to_value(&group.colors)?);
    }
    println!("{}", group.display_label(fallback));
    for named in &group.colors {
        println!("  {:<22} {}", named.name, named.hex);
    }
    Ok(())
}

pub fn print_wall(wall: &ColorWall, language: Language, json: bool) -> Result<()> {
    let chips = wall.chips();
    let label = wall.group_label(language).unwrap_or_default();
    if json {
        let chips: Vec<Value> = chips
            .iter()
            .enumerate()
            .map(|(index, chip)| {
                json!({
                    "index": index,
                    "name": chip.name,
                    "hex": chip.color.to_hex(),
                    "textColor": chip.text_color.to_hex(),
                })
            })
            .collect();
        return print_json(&json!({
            "group": wall.group_index(),
            "label": label,
            "chips": chips,
        }));
    }

    println!("[{}] {label}", wall.group_index());
    for (index, chip) in chips.iter().enumerate() {
        println!("  {index:>2}  {}  {}", chip.color, chip.name);
    }
    Ok(())
}

pub fn print_nibble(picker: &NibblePicker, json: bool) -> Result<()> {
    let (r, g, b) = picker.channels();
    let color = picker.current_color();
    if json {
        return print_json(&json!({
            "channels": [r, g, b],
            "short": picker.short_hex(),
            "hex": color.to_hex(),
            "rgb": rgb(color),
        }));
    }
    println!("{} -> {}  {}", picker.short_hex(), color, rgb(color));
    Ok(())
}

pub fn print_noise_chips(chips: &NoisePalette, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "style": chips.style().as_str(),
            "noise": chips.noise().get(),
            "chips": chips.chips().iter().map(Color::to_hex).collect::<Vec<_>>(),
        }));
    }
    println!("{} {}", chips.style(), chips.noise());
    for (index, chip) in chips.chips().iter().enumerate() {
        println!("  {index:>2}  {chip}  {}", rgb(*chip));
    }
    Ok(())
}

pub fn print_history(session: &PlaygroundSession, json: bool) -> Result<()> {
    let history = session.history();
    if json {
        return print_json(&json!({
            "cursor": history.cursor_index(),
            "entries": serde_json::to_value(history.entries())?,
        }));
    }

    if history.is_empty() {
        println!("(empty)");
        return Ok(());
    }
    for (index, entry) in history.entries().iter().enumerate() {
        let marker = if history.cursor() == Some(index) { '>' } else { ' ' };
        println!(
            "{marker} {index:>3}  {}  {:<14} {:>3}",
            entry.color,
            entry.noise_type.as_str(),
            entry.noise_amount.get()
        );
    }
    Ok(())
}

pub fn print_session(session: &PlaygroundSession, json: bool) -> Result<()> {
    let color = session.color();
    let history = session.history();
    if json {
        return print_json(&json!({
            "color": color.to_hex(),
            "rgb": rgb(color),
            "textColor": color.text_color().to_hex(),
            "noiseType": session.noise_type().as_str(),
            "noise": session.noise_amount().get(),
            "palette": session.palette().to_hex_strings(),
            "historyIndex": history.cursor_index(),
            "historyLength": history.len(),
        }));
    }

    println!("{color}  {}", rgb(color));
    println!("noise {} {}", session.noise_type().as_str(), session.noise_amount());
    let swatches: Vec<String> = session.palette().to_hex_strings();
    println!("{}", swatches.join(" "));
    println!("history {}/{}", history.cursor_index() + 1, history.len());
    Ok(())
}

/// Drain pending notices to stderr in the session language.
pub fn print_notices(session: &mut PlaygroundSession) {
    let language = session.language();
    for notice in session.take_notices() {
        eprintln!("{}", notice.message(language));
    }
}
