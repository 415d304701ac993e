use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::keys::{key_from_link, to_key};
use crate::model::{AbilityRecord, EntryLink, MoveRecord, ReferenceRecord, Section};

lazy_static! {
    static ref LINK: Selector = sel("a[href]");
    static ref SPAN: Selector = sel("span");
    static ref INNER_DIV: Selector = sel("div");
    static ref MOVE_NAME: Selector = sel("div.MoveRow-name");
    static ref MOVE_TYPE: Selector = sel("div.MoveRow-type");
    static ref MOVE_DAMAGE: Selector = sel("div.MoveRow-damage");
    static ref MOVE_POWER: Selector = sel("div.MoveRow-power");
    static ref MOVE_ACCURACY: Selector = sel("div.MoveRow-accuracy");
    static ref MOVE_PP: Selector = sel("div.MoveRow-pp");
    static ref MOVE_DESC: Selector = sel("div.MoveRow-description");
    static ref ABILITY_NAME: Selector = sel("div.AbilityRow-name");
    static ref ABILITY_DESC: Selector = sel("div.AbilityRow-description");
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// A rendered row that did not have the expected structure.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("{field}: {problem}")]
pub struct RowError {
    pub field: &'static str,
    pub problem: &'static str,
}

fn missing(field: &'static str) -> RowError {
    RowError { field, problem: "missing" }
}

/// Parse the inner HTML of one listing row into a record of the section's variant.
pub fn parse_row(section: Section, inner_html: &str) -> Result<ReferenceRecord, RowError> {
    let fragment = Html::parse_fragment(inner_html);
    match section {
        Section::Moves => parse_move(&fragment).map(ReferenceRecord::Move),
        Section::Abilities => parse_ability(&fragment).map(ReferenceRecord::Ability),
    }
}

fn parse_move(row: &Html) -> Result<MoveRecord, RowError> {
    let name_cell = first(row, &MOVE_NAME, "name")?;
    let (url, name) = link(name_cell, "name")?;
    let id = key_from_link(&url);
    if id.is_empty() {
        return Err(RowError { field: "name", problem: "link has no final segment" });
    }

    let (type_url, type_name) = link(first(row, &MOVE_TYPE, "type")?, "type")?;
    let kind = EntryLink { id: key_from_link(&type_url), url: type_url, name: type_name };

    // <div class="MoveRow-damage"><div class="DamageCategory physical">
    let damage = first(row, &MOVE_DAMAGE, "damage")?
        .select(&INNER_DIV)
        .next()
        .and_then(|d| d.value().attr("class"))
        .and_then(|c| c.split_whitespace().nth(1))
        .map(str::to_string)
        .ok_or_else(|| missing("damage"))?;

    let power = numeric(&span_text(first(row, &MOVE_POWER, "power")?));
    let accuracy = numeric(span_text(first(row, &MOVE_ACCURACY, "accuracy")?).trim_end_matches('%'));
    let pp = numeric(&span_text(first(row, &MOVE_PP, "pp")?)).ok_or(RowError { field: "pp", problem: "not a number" })?;
    let description = text(first(row, &MOVE_DESC, "description")?);

    Ok(MoveRecord { id, url, name, kind, damage, power, accuracy, pp, description })
}

fn parse_ability(row: &Html) -> Result<AbilityRecord, RowError> {
    let (url, name) = link(first(row, &ABILITY_NAME, "name")?, "name")?;
    let id = to_key(&name);
    if id.is_empty() {
        return Err(RowError { field: "name", problem: "empty after normalization" });
    }
    let description = text(first(row, &ABILITY_DESC, "description")?);
    Ok(AbilityRecord { id, url, name, description })
}

fn first<'a>(row: &'a Html, selector: &Selector, field: &'static str) -> Result<ElementRef<'a>, RowError> {
    row.select(selector).next().ok_or_else(|| missing(field))
}

/// `(href, text)` of the first link inside `cell`; the text must be non-empty.
fn link(cell: ElementRef<'_>, field: &'static str) -> Result<(String, String), RowError> {
    let a = cell.select(&LINK).next().ok_or_else(|| missing(field))?;
    let href = a.value().attr("href").unwrap_or_default().to_string();
    let label = text(cell);
    if label.is_empty() {
        return Err(RowError { field, problem: "empty label" });
    }
    Ok((href, label))
}

fn span_text(cell: ElementRef<'_>) -> String {
    cell.select(&SPAN).next().map(text).unwrap_or_default()
}

fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Placeholders such as "—" become `None`.
fn numeric(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const THUNDER_PUNCH: &str = r#"
        <div class="MoveRow-name"><a href="/dex/sm/moves/thunder_punch/">Thunder Punch</a></div>
        <div class="MoveRow-type"><a href="/dex/sm/types/electric/">Electric</a></div>
        <div class="MoveRow-damage"><div class="DamageCategory physical"></div></div>
        <div class="MoveRow-power"><span>75</span></div>
        <div class="MoveRow-accuracy"><span>100%</span></div>
        <div class="MoveRow-pp"><span>15</span></div>
        <div class="MoveRow-description">10% chance to paralyze the target.</div>
    "#;

    const GROWL: &str = r#"
        <div class="MoveRow-name"><a href="/dex/sm/moves/growl/">Growl</a></div>
        <div class="MoveRow-type"><a href="/dex/sm/types/normal/">Normal</a></div>
        <div class="MoveRow-damage"><div class="DamageCategory non-damaging"></div></div>
        <div class="MoveRow-power"><span>—</span></div>
        <div class="MoveRow-accuracy"><span>—</span></div>
        <div class="MoveRow-pp"><span>40</span></div>
        <div class="MoveRow-description">Lowers the foe(s) Attack by 1.</div>
    "#;

    #[test]
    fn parses_damaging_move() {
        let ReferenceRecord::Move(m) = parse_row(Section::Moves, THUNDER_PUNCH).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(m.id, "thunderpunch");
        assert_eq!(m.url, "/dex/sm/moves/thunder_punch/");
        assert_eq!(m.name, "Thunder Punch");
        assert_eq!(m.kind, EntryLink { id: "electric".into(), url: "/dex/sm/types/electric/".into(), name: "Electric".into() });
        assert_eq!(m.damage, "physical");
        assert_eq!(m.power, Some(75));
        assert_eq!(m.accuracy, Some(100));
        assert_eq!(m.pp, 15);
        assert_eq!(m.description, "10% chance to paralyze the target.");
    }

    #[test]
    fn placeholder_power_and_accuracy_are_absent() {
        let ReferenceRecord::Move(m) = parse_row(Section::Moves, GROWL).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(m.power, None);
        assert_eq!(m.accuracy, None);
        assert_eq!(m.damage, "non-damaging");
    }

    #[test]
    fn parses_ability_with_name_derived_id() {
        let html = r#"
            <div class="AbilityRow-name"><a href="/dex/sm/abilities/shadow_tag/">Shadow Tag</a></div>
            <div class="AbilityRow-description">Prevents adjacent foes from choosing to switch.</div>
        "#;
        let rec = parse_row(Section::Abilities, html).unwrap();
        assert_eq!(rec.id(), "shadowtag");
        assert_eq!(rec.name(), "Shadow Tag");
        assert_eq!(rec.url(), "/dex/sm/abilities/shadow_tag/");
    }

    #[test]
    fn rejects_incomplete_rows() {
        let err = parse_row(Section::Moves, r#"<div class="MoveRow-name"><a href="/x/">X</a></div>"#).unwrap_err();
        assert_eq!(err, missing("type"));
        let err = parse_row(Section::Abilities, "<div>loading…</div>").unwrap_err();
        assert_eq!(err.field, "name");
    }
}
