use dexcore::{AbilityRecord, MoveRecord, ReferenceRecord};
use url::Url;

/// Human-readable card for one record; relative links are resolved against `origin`.
pub fn format_record(record: &ReferenceRecord, origin: &Url) -> String {
    match record {
        ReferenceRecord::Move(m) => format_move(m, origin),
        ReferenceRecord::Ability(a) => format_ability(a, origin),
    }
}

pub fn format_move(m: &MoveRecord, origin: &Url) -> String {
    let mut s = header(&m.name, &m.url, origin);
    s.push_str(&format!(
        "Type: {} -- {}\nDamage: {}\nPower: {}\nAccuracy: {}\nPP: {}\nDesc: {}\n",
        m.kind.name,
        absolute(origin, &m.kind.url),
        m.damage,
        optional(m.power),
        optional(m.accuracy.map(|a| format!("{a}%"))),
        m.pp,
        m.description,
    ));
    s
}

pub fn format_ability(a: &AbilityRecord, origin: &Url) -> String {
    let mut s = header(&a.name, &a.url, origin);
    s.push_str(&format!("Desc: {}\n", a.description));
    s
}

fn header(name: &str, url: &str, origin: &Url) -> String {
    format!(
        "\n===================\n * {name} -- {}\n===================\n",
        absolute(origin, url)
    )
}

fn absolute(origin: &Url, link: &str) -> String {
    origin.join(link).map(|u| u.to_string()).unwrap_or_else(|_| link.to_string())
}

fn optional<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}
