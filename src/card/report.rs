//! Read-only views over the cards: totals, punch listings and the card list.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::utils::time::{format_hours_minutes, format_timestamp, TIMESTAMP_WIDTH};

use super::{
    entities::{CardEntity, Subtotal},
    id::{CardId, Selector},
    store::CardStore,
};

const RULE_WIDTH: usize = 50;

pub fn write_total(
    out: &mut impl Write,
    store: &CardStore,
    selector: &Selector,
    now: DateTime<Utc>,
) -> io::Result<()> {
    match selector {
        Selector::All => {
            for (id, card) in store.iter() {
                let Subtotal {
                    duration,
                    clocked_in,
                } = card.subtotal(now);
                let suffix = if clocked_in { " and clocked in" } else { "" };
                writeln!(
                    out,
                    "Total card {id}: {}{suffix}",
                    format_hours_minutes(duration)
                )?;
            }
            Ok(())
        }
        Selector::Single(id) => write_single_total(out, store, id, now),
    }
}

fn write_single_total(
    out: &mut impl Write,
    store: &CardStore,
    id: &CardId,
    now: DateTime<Utc>,
) -> io::Result<()> {
    match store.subtotal(id, now) {
        Ok(Subtotal {
            duration,
            clocked_in,
        }) => {
            let suffix = if clocked_in { " and is clocked in" } else { "" };
            writeln!(
                out,
                "Card {id} has {}{suffix}",
                format_hours_minutes(duration)
            )
        }
        Err(e) => writeln!(out, "{e}"),
    }
}

pub fn write_show(
    out: &mut impl Write,
    store: &CardStore,
    selector: &Selector,
    now: DateTime<Utc>,
) -> io::Result<()> {
    match selector {
        Selector::All => {
            for id in store.ids() {
                write_card(out, store, id, now)?;
                writeln!(out)?;
            }
            Ok(())
        }
        Selector::Single(id) => write_card(out, store, id, now),
    }
}

/// Prints every punch of a card followed by its total. A missing card is reported in place, so a
/// sweep over several cards keeps going.
pub fn write_card(
    out: &mut impl Write,
    store: &CardStore,
    id: &CardId,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "{}", banner(id))?;
    let Some(card) = store.get(id) else {
        writeln!(out, "Card {id} does not exist.")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        return Ok(());
    };

    write_punches(out, card)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    write_single_total(out, store, id, now)
}

fn write_punches(out: &mut impl Write, card: &CardEntity) -> io::Result<()> {
    for punch in &card.history {
        writeln!(
            out,
            "In: {}   Out: {}{}",
            format_timestamp(punch.start),
            format_timestamp(punch.end),
            message_suffix(punch.message.as_deref())
        )?;
    }
    if let Some(current) = &card.current {
        let end = current
            .end
            .map(format_timestamp)
            .unwrap_or_else(|| format!("{:<TIMESTAMP_WIDTH$}", "--"));
        writeln!(
            out,
            "In: {}   Out: {end}{}",
            format_timestamp(current.start),
            message_suffix(current.message.as_deref())
        )?;
    }
    Ok(())
}

fn message_suffix(message: Option<&str>) -> String {
    message.map(|v| format!(" : {v}")).unwrap_or_default()
}

/// `===== Card <id> =====` centred in the rule width.
fn banner(id: &CardId) -> String {
    let title = format!(" Card {id} ");
    let padding = RULE_WIDTH.saturating_sub(title.chars().count());
    let before = padding.div_ceil(2);
    let after = padding / 2;
    format!("{}{title}{}", "=".repeat(before), "=".repeat(after))
}

pub fn write_list(out: &mut impl Write, store: &CardStore) -> io::Result<()> {
    writeln!(out, "The following cards are available:")?;
    for id in store.ids() {
        writeln!(out, "  {id}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::DateTime;

    use super::{banner, write_card, write_list, write_show, write_total};
    use crate::{
        card::{
            entities::{CardEntity, CurrentPunchEntity, PunchEntity},
            id::{CardId, Selector},
            store::CardStore,
        },
        utils::time::format_timestamp,
    };

    fn id(value: &str) -> CardId {
        value.parse().unwrap()
    }

    fn sample_store() -> CardStore {
        let at = |s| DateTime::from_timestamp(s, 0).unwrap();
        let mut store = CardStore::new();
        store.insert(
            id("1"),
            CardEntity {
                current: Some(CurrentPunchEntity::open(at(7_200), Some("review".into()))),
                history: vec![PunchEntity {
                    start: at(0),
                    end: at(3_600),
                    message: Some("design".into()),
                }],
            },
        );
        store.insert(
            id("2"),
            CardEntity {
                current: Some(CurrentPunchEntity {
                    start: at(100),
                    end: Some(at(160)),
                    message: None,
                }),
                history: vec![],
            },
        );
        store
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> Result<String> {
        let mut buffer = Vec::new();
        f(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    #[test]
    fn test_banner_is_centred() {
        assert_eq!(banner(&id("1")), format!("{} Card 1 {}", "=".repeat(21), "=".repeat(21)));
        assert_eq!(banner(&id("12")), format!("{} Card 12 {}", "=".repeat(21), "=".repeat(20)));
        assert_eq!(banner(&id("1")).len(), 50);
    }

    #[test]
    fn test_total_all() -> Result<()> {
        let store = sample_store();
        let now = DateTime::from_timestamp(9_000, 0).unwrap();
        let text = render(|out| write_total(out, &store, &Selector::All, now))?;
        assert_eq!(
            text,
            "Total card 1: 1:30 and clocked in\nTotal card 2: 0:01\n"
        );
        Ok(())
    }

    #[test]
    fn test_total_single() -> Result<()> {
        let store = sample_store();
        let now = DateTime::from_timestamp(9_000, 0).unwrap();
        let text = render(|out| write_total(out, &store, &Selector::Single(id("1")), now))?;
        assert_eq!(text, "Card 1 has 1:30 and is clocked in\n");
        let text = render(|out| write_total(out, &store, &Selector::Single(id("3")), now))?;
        assert_eq!(text, "Card 3 does not exist\n");
        Ok(())
    }

    #[test]
    fn test_show_card() -> Result<()> {
        let store = sample_store();
        let now = DateTime::from_timestamp(9_000, 0).unwrap();
        let text = render(|out| write_card(out, &store, &id("1"), now))?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[1],
            format!(
                "In: {}   Out: {} : design",
                format_timestamp(DateTime::from_timestamp(0, 0).unwrap()),
                format_timestamp(DateTime::from_timestamp(3_600, 0).unwrap())
            )
        );
        assert_eq!(
            lines[2],
            format!(
                "In: {}   Out: --                  : review",
                format_timestamp(DateTime::from_timestamp(7_200, 0).unwrap())
            )
        );
        assert_eq!(lines[3], "-".repeat(50));
        assert_eq!(lines[4], "Card 1 has 1:30 and is clocked in");
        Ok(())
    }

    #[test]
    fn test_show_missing_card_in_sweep() -> Result<()> {
        let store = sample_store();
        let now = DateTime::from_timestamp(9_000, 0).unwrap();
        let text = render(|out| write_show(out, &store, &Selector::Single(id("8")), now))?;
        assert!(text.contains("Card 8 does not exist."));

        let text = render(|out| write_show(out, &store, &Selector::All, now))?;
        assert!(text.contains("Card 1 has 1:30 and is clocked in"));
        assert!(text.contains("Card 2 has 0:01\n"));
        Ok(())
    }

    #[test]
    fn test_list() -> Result<()> {
        let store = sample_store();
        let text = render(|out| write_list(out, &store))?;
        assert_eq!(text, "The following cards are available:\n  1\n  2\n");
        Ok(())
    }
}
