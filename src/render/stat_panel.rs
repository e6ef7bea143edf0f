use image::RgbaImage;

use super::canvas::{rgb, Align, Painter, Typeface};
use super::format::format_stat_value;
use crate::assets::AssetMirror;
use crate::snapshot::StatAttribute;

pub const MAX_STAT_ROWS: usize = 12;
pub const STAT_PANEL_WIDTH: u32 = 400;
const ROW_HEIGHT: u32 = 36;
const PADDING: u32 = 10;
const ICON_SIZE: u32 = 28;

const NAME_COLOR: [u8; 3] = [255, 255, 255];
const ADDITION_COLOR: [u8; 3] = [144, 238, 144];

/// One line of the derived-stat panel
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub field: String,
    pub name: String,
    pub icon: String,
    pub total_text: String,
    pub addition_text: Option<String>,
}

struct MergedStat<'a> {
    source: &'a StatAttribute,
    base: f64,
    addition: Option<f64>,
}

/// Merges base attributes with additions by stat field, keeping the first
/// `MAX_STAT_ROWS` distinct fields in first-seen order
pub fn build_stat_rows(attributes: &[StatAttribute], additions: &[StatAttribute]) -> Vec<StatRow> {
    let mut merged: Vec<MergedStat> = Vec::new();

    for attribute in attributes {
        match merged.iter_mut().find(|m| m.source.field == attribute.field) {
            Some(existing) => existing.base += attribute.value,
            None => merged.push(MergedStat {
                source: attribute,
                base: attribute.value,
                addition: None,
            }),
        }
    }

    for addition in additions {
        match merged.iter_mut().find(|m| m.source.field == addition.field) {
            Some(existing) => {
                existing.addition = Some(existing.addition.unwrap_or(0.0) + addition.value)
            }
            None => merged.push(MergedStat {
                source: addition,
                base: 0.0,
                addition: Some(addition.value),
            }),
        }
    }

    merged
        .into_iter()
        .take(MAX_STAT_ROWS)
        .map(|stat| {
            let percent = stat.source.percent;
            StatRow {
                field: stat.source.field.clone(),
                name: stat.source.name.clone(),
                icon: stat.source.icon.clone(),
                total_text: format_stat_value(stat.base + stat.addition.unwrap_or(0.0), percent),
                addition_text: stat
                    .addition
                    .map(|delta| format!("+{}", format_stat_value(delta, percent))),
            }
        })
        .collect()
}

pub fn stat_panel_height(rows: usize) -> u32 {
    PADDING * 2 + ROW_HEIGHT * rows as u32
}

pub fn render_stat_panel(
    rows: &[StatRow],
    mirror: &AssetMirror,
    typeface: Option<&Typeface>,
) -> RgbaImage {
    let mut panel = RgbaImage::new(STAT_PANEL_WIDTH, stat_panel_height(rows.len()));
    let mut painter = Painter::new(&mut panel, typeface);
    painter.fill_blended(0, 0, STAT_PANEL_WIDTH, stat_panel_height(rows.len()), [28, 28, 28], 0.8);

    for (i, row) in rows.iter().enumerate() {
        let top = PADDING + ROW_HEIGHT * i as u32;
        let center = (top + ROW_HEIGHT / 2) as i32;

        painter.draw_asset(
            &mirror.resolve_asset(&row.icon),
            i64::from(PADDING),
            i64::from(top + (ROW_HEIGHT - ICON_SIZE) / 2),
            ICON_SIZE,
            ICON_SIZE,
        );
        painter.text(
            &row.name,
            (PADDING + ICON_SIZE + 8) as i32,
            center,
            20.0,
            rgb(NAME_COLOR),
            Align::Left,
        );

        let right = (STAT_PANEL_WIDTH - PADDING) as i32;
        match &row.addition_text {
            Some(addition) => {
                painter.text(addition, right, center, 16.0, rgb(ADDITION_COLOR), Align::Right);
                painter.text(&row.total_text, right - 90, center, 20.0, rgb(NAME_COLOR), Align::Right);
            }
            None => painter.text(&row.total_text, right, center, 20.0, rgb(NAME_COLOR), Align::Right),
        }
    }

    panel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(field: &str, value: f64, percent: bool) -> StatAttribute {
        StatAttribute {
            field: field.to_string(),
            name: field.to_uppercase(),
            icon: format!("icon/property/{}.png", field),
            value,
            display: String::new(),
            percent,
        }
    }

    #[test]
    fn test_addition_is_merged_into_total() {
        let rows = build_stat_rows(&[stat("atk", 100.0, false)], &[stat("atk", 25.0, false)]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_text, "125");
        assert_eq!(rows[0].addition_text.as_deref(), Some("+25"));
    }

    #[test]
    fn test_rows_without_addition_have_no_delta() {
        let rows = build_stat_rows(&[stat("hp", 3000.7, false)], &[]);

        assert_eq!(rows[0].total_text, "3000");
        assert_eq!(rows[0].addition_text, None);
    }

    #[test]
    fn test_addition_only_fields_are_appended() {
        let rows = build_stat_rows(
            &[stat("atk", 100.0, false)],
            &[stat("crit_rate", 0.05, true), stat("atk", 10.0, false)],
        );

        let fields: Vec<&str> = rows.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["atk", "crit_rate"]);
        assert_eq!(rows[0].total_text, "110");
        assert_eq!(rows[1].total_text, "5.0%");
        assert_eq!(rows[1].addition_text.as_deref(), Some("+5.0%"));
    }

    #[test]
    fn test_rows_are_capped() {
        let attributes: Vec<StatAttribute> = (0..15)
            .map(|i| stat(&format!("field{}", i), i as f64, false))
            .collect();

        let rows = build_stat_rows(&attributes, &[]);

        assert_eq!(rows.len(), MAX_STAT_ROWS);
        assert_eq!(rows.last().unwrap().field, "field11");
    }

    #[test]
    fn test_panel_height_follows_rows() {
        assert_eq!(stat_panel_height(0), 20);
        assert_eq!(stat_panel_height(12), 20 + 36 * 12);
    }
}
