use crate::band::band_for;
use crate::cli::commands::*;
use crate::cli::context::CLIContext;
use crate::config::Config;
use crate::db::card_repo;
use crate::dmr;
use crate::error::{RolodexError, RolodexResult};
use crate::hints::HintMode;
use crate::model::*;
use crate::sorts::{SortKey, SORTS, STAR_TAG};
use crate::validation;
use crate::view::{self, Row};

use tracing::warn;

pub fn list(ctx: &CLIContext, cmd: &ListCommand) -> RolodexResult<()> {
    let sort = cmd.sort.unwrap_or(ctx.config.display.sort).sort();
    let view_mode = cmd.view.unwrap_or(ctx.config.display.view);
    let rows = view::arrange(ctx.store.cards(), sort, cmd.query.as_deref(), view_mode);

    if cmd.json {
        let cards: Vec<&Card> = rows.iter().map(|r| r.card).collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if ctx.store.cards().is_empty() {
        println!("No cards yet. Use 'rolodex add' to add one.");
        return Ok(());
    }
    if rows.is_empty() {
        println!("No cards match.");
        return Ok(());
    }

    println!("Cards by {} ({}):", sort.name, rows.len());
    for Row { card, tag } in &rows {
        if let Some(tag) = tag {
            println!();
            println!("{}", tag);
        }
        println!("  {}", summary(card));
        if cmd.hints {
            if let Some(hint) = ctx.config.display.hint.render(&card.callsign) {
                println!("      {}", hint);
            }
        }
    }
    Ok(())
}

pub fn show(ctx: &CLIContext, cmd: &ShowCommand) -> RolodexResult<()> {
    let card = ctx.find_card(&cmd.card)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    let star = if card.star { format!(" {}", STAR_TAG) } else { String::new() };
    println!("{}{}", card.callsign, star);
    if let Some(hint) = cmd.hint.unwrap_or(ctx.config.display.hint).render(&card.callsign) {
        println!("{}", hint);
    }
    println!();
    println!("  Type:       {}", card.card_type().display_name());
    if !card.name.is_empty() {
        println!("  Name:       {}", card.name);
    }

    if let Some(info) = card.repeater_info() {
        if !info.location.is_empty() {
            println!("  Location:   {}", info.location);
        }
        if let Some(mhz) = info.frequency {
            let band = band_for(mhz).map(|b| format!(" ({})", b.name)).unwrap_or_default();
            println!("  Frequency:  {} MHz{}", mhz, band);
        }
        if let Some(offset) = info.offset {
            println!("  Offset:     {:+} MHz", offset);
        }
        if let Some(tone) = format_tone(info.tx_tone_mode, info.tx_tone) {
            println!("  TX tone:    {}", tone);
        }
        if let Some(tone) = format_tone(info.rx_tone_mode, info.rx_tone) {
            println!("  RX tone:    {}", tone);
        }
    }

    if let Some(website) = &card.website {
        println!("  Website:    {}", website);
    }
    if cmd.dmr || ctx.config.display.dmr_lookup {
        match dmr::lookup(&card.callsign) {
            Ok(Some(id)) => println!("  DMR:        {} {}", id, id.database_url()),
            Ok(None) => {}
            Err(e) => warn!(callsign = %card.callsign, error = %e, "DMR lookup failed"),
        }
    }
    println!("  Id:         {}", card.id);
    if let Some((created, updated)) = card_repo::timestamps(ctx.store.conn(), ctx.store.collection(), card.id)? {
        println!("  Added:      {}", created.format("%Y-%m-%d %H:%M"));
        if updated != created {
            println!("  Updated:    {}", updated.format("%Y-%m-%d %H:%M"));
        }
    }
    Ok(())
}

pub fn add(ctx: &mut CLIContext, cmd: AddCommand) -> RolodexResult<()> {
    let mut contact = if cmd.repeater {
        let mut info = RepeaterInfo::default();
        apply_repeater_fields(&mut info, &cmd.fields);
        Contact::repeater(cmd.callsign, cmd.name, info)
    } else {
        if cmd.fields.has_repeater_fields() {
            return Err(repeater_fields_on_person());
        }
        Contact::person(cmd.callsign, cmd.name)
    };
    contact.star = cmd.star;
    contact.website = validation::trim_optional(cmd.fields.website.as_deref());

    let card = ctx.store.add_card(contact)?;
    println!("Added {} {} ({})", card.card_type().display_name().to_lowercase(), card.callsign, card.id);
    Ok(())
}

pub fn edit(ctx: &mut CLIContext, cmd: EditCommand) -> RolodexResult<()> {
    let card = ctx.find_card(&cmd.card)?;
    let mut contact = card.contact.clone();

    if let Some(callsign) = cmd.callsign {
        contact.callsign = callsign;
    }
    if let Some(name) = cmd.name {
        contact.name = name;
    }
    match cmd.card_type {
        Some(CardTypeArg::Person) => contact.kind = CardKind::Person,
        Some(CardTypeArg::Repeater) if contact.is_person() => {
            contact.kind = CardKind::Repeater(RepeaterInfo::default())
        }
        _ => {}
    }
    if let Some(website) = &cmd.fields.website {
        contact.website = Some(website.clone());
    }

    match &mut contact.kind {
        CardKind::Repeater(info) => apply_repeater_fields(info, &cmd.fields),
        CardKind::Person if cmd.fields.has_repeater_fields() => return Err(repeater_fields_on_person()),
        CardKind::Person => {}
    }

    for field in &cmd.clear {
        clear_field(&mut contact, *field);
    }

    let updated = ctx.store.edit_card(card.id, contact)?;
    println!("Updated {}", updated.display_name());
    Ok(())
}

pub fn delete(ctx: &mut CLIContext, cmd: &CardSelector) -> RolodexResult<()> {
    let card = ctx.find_card(&cmd.card)?;
    ctx.store.delete_card(card.id)?;
    println!("Deleted {}", card.display_name());
    Ok(())
}

pub fn star(ctx: &mut CLIContext, cmd: &CardSelector, star: bool) -> RolodexResult<()> {
    let card = ctx.find_card(&cmd.card)?;
    let updated = ctx.store.set_star(card.id, star)?;
    if star {
        println!("Starred {}", updated.display_name());
    } else {
        println!("Unstarred {}", updated.display_name());
    }
    Ok(())
}

/// Prints the sort table by group, marking the configured sort.
pub fn sorts(current: SortKey) {
    let mut group = "";
    for (index, sort) in SORTS.iter().enumerate() {
        if sort.group != group {
            group = sort.group;
            println!("{}", group);
        }
        let marker = if sort.key == current { " (current)" } else { "" };
        println!("  {} {:<12} {}{}", index, sort.key.as_str(), sort.name, marker);
    }
}

pub fn hint(config: &Config, cmd: &HintCommand) {
    let callsign = validation::canonical_callsign(&cmd.callsign);
    match cmd.mode.unwrap_or(config.display.hint) {
        HintMode::None => println!("{}", callsign),
        mode => println!("{}  {}", callsign, mode.render(&callsign).unwrap_or_default()),
    }
}

/// One-line card summary for list output.
pub fn summary(card: &Card) -> String {
    let star = if card.star { STAR_TAG } else { " " };
    match card.repeater_info() {
        Some(info) => {
            let freq = info.frequency.map(|f| format!("{} MHz", f)).unwrap_or_default();
            format!("{} {:<10} {:<24} {:<12} {}", star, card.callsign, card.name, freq, info.location)
                .trim_end()
                .to_string()
        }
        None => format!("{} {:<10} {}", star, card.callsign, card.name).trim_end().to_string(),
    }
}

fn format_tone(mode: Option<ToneMode>, tone: Option<f64>) -> Option<String> {
    match (mode, tone) {
        (Some(mode), Some(tone)) => Some(format!("{} {}", mode.as_str(), tone)),
        (Some(mode), None) => Some(mode.as_str().to_string()),
        (None, Some(tone)) => Some(tone.to_string()),
        (None, None) => None,
    }
}

fn apply_repeater_fields(info: &mut RepeaterInfo, fields: &CardFields) {
    if let Some(location) = &fields.location {
        info.location = location.clone();
    }
    if fields.frequency.is_some() {
        info.frequency = fields.frequency;
    }
    if fields.offset.is_some() {
        info.offset = fields.offset;
    }
    if fields.tx_tone_mode.is_some() {
        info.tx_tone_mode = fields.tx_tone_mode;
    }
    if fields.tx_tone.is_some() {
        info.tx_tone = fields.tx_tone;
    }
    if fields.rx_tone_mode.is_some() {
        info.rx_tone_mode = fields.rx_tone_mode;
    }
    if fields.rx_tone.is_some() {
        info.rx_tone = fields.rx_tone;
    }
}

fn clear_field(contact: &mut Contact, field: ClearField) {
    if field == ClearField::Website {
        contact.website = None;
        return;
    }
    if let CardKind::Repeater(info) = &mut contact.kind {
        match field {
            ClearField::Frequency => info.frequency = None,
            ClearField::Offset => info.offset = None,
            ClearField::TxToneMode => info.tx_tone_mode = None,
            ClearField::TxTone => info.tx_tone = None,
            ClearField::RxToneMode => info.rx_tone_mode = None,
            ClearField::RxTone => info.rx_tone = None,
            ClearField::Website => {}
        }
    }
}

fn repeater_fields_on_person() -> RolodexError {
    RolodexError::Other("Location, frequency, offset and tones only apply to repeaters (use --repeater or --type repeater)".into())
}
