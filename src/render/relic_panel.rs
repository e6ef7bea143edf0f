use image::RgbaImage;

use super::canvas::{rgb, Align, Painter, Typeface};
use super::format::{format_score, format_stat_value};
use crate::assets::AssetMirror;
use crate::scoring::RelicScore;
use crate::snapshot::Relic;

pub const RELIC_PANEL_WIDTH: u32 = 630;
pub const MAX_RELICS: usize = 6;
pub const MAX_SUB_AFFIX_ROWS: usize = 4;
pub const CELL_WIDTH: u32 = 300;
pub const CELL_HEIGHT: u32 = 200;
const GUTTER: u32 = 10;
const COLUMNS: usize = 2;
const AFFIX_ROW_HEIGHT: u32 = 37;

const CELL_BACKGROUND: [u8; 3] = [28, 28, 28];
const MAIN_AFFIX_COLOR: [u8; 3] = [218, 165, 32];
const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const SCORE_COLOR: [u8; 3] = [170, 170, 170];

#[derive(Debug, Clone, PartialEq)]
pub struct AffixLine {
    pub icon: String,
    pub name: String,
    pub value_text: String,
    /// Absent when the affix contributed nothing
    pub score_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelicFooter {
    pub text: String,
    pub color: [u8; 3],
}

/// Layout of one relic in the grid; `x`/`y` are the cell's top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct RelicCell {
    pub x: u32,
    pub y: u32,
    pub icon: String,
    pub rarity_badge: String,
    pub level_text: String,
    pub main_affix: AffixLine,
    pub sub_affixes: Vec<AffixLine>,
    pub footer: Option<RelicFooter>,
}

pub fn cell_origin(index: usize) -> (u32, u32) {
    let column = (index % COLUMNS) as u32;
    let row = (index / COLUMNS) as u32;
    (
        GUTTER + (CELL_WIDTH + GUTTER) * column,
        GUTTER + (CELL_HEIGHT + GUTTER) * row,
    )
}

/// Panel height cropped to the populated rows
pub fn relic_panel_height(relic_count: usize) -> u32 {
    let rows = relic_count.div_ceil(COLUMNS) as u32;
    if rows == 0 {
        return 0;
    }
    GUTTER * 2 + CELL_HEIGHT * rows + GUTTER * (rows - 1)
}

fn score_text(score: f64) -> Option<String> {
    (score != 0.0).then(|| format_score(score))
}

fn display_or_format(display: &str, value: f64, percent: bool) -> String {
    if display.is_empty() {
        format_stat_value(value, percent)
    } else {
        display.to_string()
    }
}

/// Lays out at most `MAX_RELICS` cells with up to `MAX_SUB_AFFIX_ROWS` sub-affixes each
pub fn build_relic_cells(relics: &[Relic], scores: &[RelicScore]) -> Vec<RelicCell> {
    relics
        .iter()
        .zip(scores)
        .take(MAX_RELICS)
        .enumerate()
        .map(|(index, (relic, score))| {
            let (x, y) = cell_origin(index);
            let main = &relic.main_affix;
            let sub_affixes = relic
                .sub_affix
                .iter()
                .zip(score.sub_scores.iter().copied().chain(std::iter::repeat(0.0)))
                .take(MAX_SUB_AFFIX_ROWS)
                .map(|(affix, sub_score)| AffixLine {
                    icon: affix.icon.clone(),
                    name: affix.name.clone(),
                    value_text: display_or_format(&affix.display, affix.value, affix.percent),
                    score_text: score_text(sub_score),
                })
                .collect();

            RelicCell {
                x,
                y,
                icon: relic.icon.clone(),
                rarity_badge: format!("icon/deco/Rarity{}.png", relic.rarity),
                level_text: format!("+{}", relic.level),
                main_affix: AffixLine {
                    icon: main.icon.clone(),
                    name: main.name.clone(),
                    value_text: display_or_format(&main.display, main.value, main.percent),
                    score_text: score_text(score.main_score),
                },
                sub_affixes,
                footer: score.is_scored().then(|| RelicFooter {
                    text: format!("{}% - {}", score.aggregate, score.rank),
                    color: score.rank.color(),
                }),
            }
        })
        .collect()
}

fn draw_affix_line(
    painter: &mut Painter,
    mirror: &AssetMirror,
    line: &AffixLine,
    x: u32,
    top: u32,
    name_color: [u8; 3],
) {
    let center = (top + 16) as i32;
    painter.draw_asset(&mirror.resolve_asset(&line.icon), i64::from(x + 116), i64::from(top), 32, 32);
    painter.text(&line.name, (x + 150) as i32, center, 18.0, rgb(name_color), Align::Left);

    let right = (x + CELL_WIDTH - 10) as i32;
    match &line.score_text {
        Some(score) => {
            painter.text(score, right, center, 14.0, rgb(SCORE_COLOR), Align::Right);
            painter.text(&line.value_text, right - 40, center, 18.0, rgb(TEXT_COLOR), Align::Right);
        }
        None => painter.text(&line.value_text, right, center, 18.0, rgb(TEXT_COLOR), Align::Right),
    }
}

pub fn render_relic_panel(
    cells: &[RelicCell],
    mirror: &AssetMirror,
    typeface: Option<&Typeface>,
) -> RgbaImage {
    let mut panel = RgbaImage::new(RELIC_PANEL_WIDTH, relic_panel_height(cells.len()));
    let mut painter = Painter::new(&mut panel, typeface);

    for cell in cells {
        let (x, y) = (cell.x, cell.y);
        painter.fill_blended(x, y, CELL_WIDTH, CELL_HEIGHT, CELL_BACKGROUND, 0.8);

        painter.draw_asset(
            &mirror.resolve_asset(&cell.icon),
            i64::from(x + 10),
            i64::from(y + 25),
            96,
            96,
        );
        painter.draw_asset(
            &mirror.resolve_asset(&cell.rarity_badge),
            i64::from(x) - 5,
            i64::from(y + 116),
            128,
            32,
        );
        painter.text(
            &cell.level_text,
            (x + 5 + 48) as i32,
            (y + 146) as i32,
            18.0,
            rgb(TEXT_COLOR),
            Align::Center,
        );

        draw_affix_line(&mut painter, mirror, &cell.main_affix, x, y + 10, MAIN_AFFIX_COLOR);
        for (i, line) in cell.sub_affixes.iter().enumerate() {
            let top = y + 10 + AFFIX_ROW_HEIGHT * (i as u32 + 1);
            draw_affix_line(&mut painter, mirror, line, x, top, TEXT_COLOR);
        }

        if let Some(footer) = &cell.footer {
            painter.text(
                &footer.text,
                (x + 10 + 48) as i32,
                (y + 178) as i32,
                18.0,
                rgb(footer.color),
                Align::Center,
            );
        }
    }

    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Rank;
    use crate::shared::test_utils::empty_mirror;
    use crate::snapshot::{MainAffix, SubAffix};
    use rstest::rstest;

    fn relic(level: u8) -> Relic {
        Relic {
            id: "61011".to_string(),
            name: "Head".to_string(),
            set_name: "Passerby".to_string(),
            icon: "icon/relic/101_0.png".to_string(),
            rarity: 5,
            level,
            main_affix: MainAffix {
                affix_type: "HPDelta".to_string(),
                name: "HP".to_string(),
                icon: "icon/property/IconMaxHP.png".to_string(),
                value: 705.6,
                display: "705".to_string(),
                percent: false,
            },
            sub_affix: vec![SubAffix {
                affix_type: "CriticalChanceBase".to_string(),
                name: "CRIT Rate".to_string(),
                icon: "icon/property/IconCriticalChance.png".to_string(),
                value: 0.0324,
                display: String::new(),
                percent: true,
                count: 1,
                step: 0,
            }],
        }
    }

    fn score(main: f64, aggregate: f64) -> RelicScore {
        RelicScore {
            slot: Some(1),
            main_score: main,
            sub_scores: vec![0.0],
            total_sub_score: 0.0,
            normalized_sub_score: 0.0,
            aggregate,
            rank: Rank::from_aggregate(aggregate),
        }
    }

    #[rstest]
    #[case(0, (10, 10))]
    #[case(1, (320, 10))]
    #[case(2, (10, 220))]
    #[case(5, (320, 430))]
    fn test_cell_origin(#[case] index: usize, #[case] expected: (u32, u32)) {
        assert_eq!(cell_origin(index), expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 220)]
    #[case(2, 220)]
    #[case(3, 430)]
    #[case(6, 640)]
    fn test_panel_height_crops_to_rows(#[case] relics: usize, #[case] expected: u32) {
        assert_eq!(relic_panel_height(relics), expected);
    }

    #[test]
    fn test_scored_cell_has_footer_in_rank_color() {
        let cells = build_relic_cells(&[relic(15)], &[score(1.0, 50.0)]);
        let cell = &cells[0];

        assert_eq!(cell.level_text, "+15");
        assert_eq!(cell.rarity_badge, "icon/deco/Rarity5.png");
        assert_eq!(cell.main_affix.value_text, "705");
        assert_eq!(cell.main_affix.score_text.as_deref(), Some("1"));
        assert_eq!(cell.sub_affixes[0].value_text, "3.2%");
        assert_eq!(cell.sub_affixes[0].score_text, None);

        let footer = cell.footer.as_ref().unwrap();
        assert_eq!(footer.text, "50% - B");
        assert_eq!(footer.color, Rank::B.color());
    }

    #[test]
    fn test_unscored_cell_has_blank_footer() {
        let cells = build_relic_cells(&[relic(3)], &[score(0.0, 0.0)]);

        assert_eq!(cells[0].footer, None);
        assert_eq!(cells[0].main_affix.score_text, None);
    }

    #[test]
    fn test_cells_are_capped_to_grid_and_rows() {
        let mut crowded = relic(15);
        let extra = crowded.sub_affix[0].clone();
        crowded.sub_affix = vec![extra; 5];
        let relics = vec![crowded; 8];
        let scores = vec![score(1.0, 50.0); 8];

        let cells = build_relic_cells(&relics, &scores);

        assert_eq!(cells.len(), MAX_RELICS);
        assert_eq!(cells[5].y, cell_origin(5).1);
        assert!(cells
            .iter()
            .all(|cell| cell.sub_affixes.len() == MAX_SUB_AFFIX_ROWS));
        // last sub-affix row still ends inside the cell
        let last_top = 10 + AFFIX_ROW_HEIGHT * MAX_SUB_AFFIX_ROWS as u32;
        assert!(last_top + 32 <= CELL_HEIGHT);
    }

    #[test]
    fn test_render_without_assets_or_font_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = empty_mirror(dir.path());
        let relics = vec![relic(15); 3];
        let scores = vec![score(1.0, 50.0); 3];
        let cells = build_relic_cells(&relics, &scores);

        let panel = render_relic_panel(&cells, &mirror, None);

        assert_eq!(panel.dimensions(), (RELIC_PANEL_WIDTH, 430));
        // gutter stays transparent, cells are filled
        assert_eq!(panel.get_pixel(5, 5)[3], 0);
        assert!(panel.get_pixel(20, 20)[3] > 0);
    }
}
