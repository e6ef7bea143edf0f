use image::RgbaImage;

use super::canvas::{rgb, Align, Painter, Typeface};
use crate::assets::AssetMirror;
use crate::snapshot::{CharacterSnapshot, LightCone};

pub const HEADER_WIDTH: u32 = 400;
pub const HEADER_HEIGHT: u32 = 200;

const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const DETAIL_COLOR: [u8; 3] = [200, 200, 200];
const DEFAULT_ELEMENT_COLOR: [u8; 3] = [190, 190, 190];

/// "Name (Lv.80 A6 E1)"
pub fn character_title(character: &CharacterSnapshot) -> String {
    format!(
        "{} (Lv.{} A{} E{})",
        character.display_name(),
        character.level,
        character.promotion,
        character.rank
    )
}

/// "Name (Lv.80 S1)"
pub fn light_cone_line(light_cone: &LightCone) -> String {
    format!(
        "{} (Lv.{} S{})",
        light_cone.name, light_cone.level, light_cone.rank
    )
}

/// Name, level line, element and light cone; the background stays
/// transparent so the portrait shows through
pub fn render_header_panel(
    character: &CharacterSnapshot,
    mirror: &AssetMirror,
    typeface: Option<&Typeface>,
) -> RgbaImage {
    let mut panel = RgbaImage::new(HEADER_WIDTH, HEADER_HEIGHT);
    let mut painter = Painter::new(&mut panel, typeface);

    let element_color = character
        .element
        .as_ref()
        .and_then(|element| element.rgb())
        .unwrap_or(DEFAULT_ELEMENT_COLOR);
    painter.fill_blended(0, 0, 6, 80, element_color, 1.0);

    if let Some(element) = &character.element {
        painter.draw_asset(
            &mirror.resolve_asset(&element.icon),
            i64::from(HEADER_WIDTH - 42),
            10,
            32,
            32,
        );
    }

    painter.text(character.display_name(), 16, 28, 30.0, rgb(TEXT_COLOR), Align::Left);
    painter.text(
        &format!(
            "Lv.{}  Ascension {}  Eidolon {}",
            character.level, character.promotion, character.rank
        ),
        16,
        62,
        18.0,
        rgb(element_color),
        Align::Left,
    );

    if let Some(light_cone) = &character.light_cone {
        painter.draw_asset(&mirror.resolve_asset(&light_cone.icon), 10, 94, 96, 96);
        painter.text(&light_cone.name, 116, 122, 20.0, rgb(TEXT_COLOR), Align::Left);
        painter.text(
            &format!("Lv.{}  Superimposition {}", light_cone.level, light_cone.rank),
            116,
            152,
            16.0,
            rgb(DETAIL_COLOR),
            Align::Left,
        );
    }

    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{character, empty_mirror};

    #[test]
    fn test_character_title_uses_display_name() {
        let mut trailblazer = character("8002");
        trailblazer.name = "{NICKNAME}".to_string();
        trailblazer.level = 80;
        trailblazer.promotion = 6;
        trailblazer.rank = 1;

        assert_eq!(character_title(&trailblazer), "Trailblazer (Lv.80 A6 E1)");
    }

    #[test]
    fn test_light_cone_line() {
        let light_cone = LightCone {
            id: "23001".to_string(),
            name: "In the Night".to_string(),
            level: 80,
            promotion: 6,
            rank: 1,
            icon: "icon/light_cone/23001.png".to_string(),
        };

        assert_eq!(light_cone_line(&light_cone), "In the Night (Lv.80 S1)");
    }

    #[test]
    fn test_header_marks_element_strip() {
        let dir = tempfile::tempdir().unwrap();
        let panel = render_header_panel(&character("1102"), &empty_mirror(dir.path()), None);

        assert_eq!(panel.dimensions(), (HEADER_WIDTH, HEADER_HEIGHT));
        assert_eq!(panel.get_pixel(2, 2)[3], 255);
        assert_eq!(panel.get_pixel(200, 100)[3], 0);
    }
}
