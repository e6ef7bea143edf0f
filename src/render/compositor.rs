use image::codecs::jpeg::JpegEncoder;
use image::{imageops, imageops::FilterType, DynamicImage, RgbaImage};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::canvas::{fade, load_asset, rgb, Painter, Typeface};
use super::errors::RenderError;
use super::header_panel::{render_header_panel, HEADER_HEIGHT, HEADER_WIDTH};
use super::relic_panel::{
    build_relic_cells, relic_panel_height, render_relic_panel, RELIC_PANEL_WIDTH,
};
use super::stat_panel::{build_stat_rows, render_stat_panel, stat_panel_height};
use crate::assets::AssetMirror;
use crate::scoring::{score_character, CharacterScores, WeightEntry};
use crate::snapshot::CharacterSnapshot;

const CANVAS_BACKGROUND: [u8; 3] = [79, 79, 79];
const PORTRAIT_OPACITY: f32 = 0.35;
const JPEG_QUALITY: u8 = 90;

/// Width and height of a card with the given number of stat rows and relics
pub fn card_dimensions(stat_rows: usize, relic_count: usize) -> (u32, u32) {
    let left = HEADER_HEIGHT + stat_panel_height(stat_rows);
    (
        HEADER_WIDTH + RELIC_PANEL_WIDTH,
        left.max(relic_panel_height(relic_count)),
    )
}

/// Assembles the header, stat and relic panels into one JPEG card
pub struct CardCompositor {
    mirror: Arc<AssetMirror>,
    typeface: Option<Arc<Typeface>>,
}

impl CardCompositor {
    pub fn new(mirror: Arc<AssetMirror>, typeface: Option<Arc<Typeface>>) -> Self {
        if typeface.is_none() {
            debug!("No typeface configured; cards render without text");
        }
        Self { mirror, typeface }
    }

    /// Returns `None` when the character has no relics or no weight table was
    /// ever loaded. A missing entry for this character still renders, unscored.
    #[instrument(skip_all, fields(character_id = %character.id))]
    pub fn compose(
        &self,
        character: &CharacterSnapshot,
        weights: Option<&WeightEntry>,
        table_loaded: bool,
    ) -> Result<Option<Vec<u8>>, RenderError> {
        if character.relics.is_empty() {
            debug!("Character has no relics; nothing to render");
            return Ok(None);
        }
        if !table_loaded {
            debug!("Weight table not loaded yet; nothing to render");
            return Ok(None);
        }
        let scores = score_character(character, weights);
        self.compose_scored(character, &scores).map(Some)
    }

    /// Renders a card from precomputed scores
    pub fn compose_scored(
        &self,
        character: &CharacterSnapshot,
        scores: &CharacterScores,
    ) -> Result<Vec<u8>, RenderError> {
        let typeface = self.typeface.as_deref();
        let mirror = self.mirror.as_ref();

        let header = render_header_panel(character, mirror, typeface);
        let rows = build_stat_rows(&character.attributes, &character.additions);
        let stats = render_stat_panel(&rows, mirror, typeface);
        let cells = build_relic_cells(&character.relics, &scores.relics);
        let relics = render_relic_panel(&cells, mirror, typeface);

        let (width, height) = card_dimensions(rows.len(), cells.len());
        let stat_top = height - stats.height();

        let mut canvas = RgbaImage::from_pixel(width, height, rgb(CANVAS_BACKGROUND));
        let mut painter = Painter::new(&mut canvas, typeface);
        if let Some(portrait) = self.portrait(character, stat_top) {
            let offset = (HEADER_WIDTH - portrait.width()) / 2;
            painter.draw_image(&portrait, i64::from(offset), 0);
        }
        painter.draw_image(&header, 0, 0);
        painter.draw_image(&stats, 0, i64::from(stat_top));
        painter.draw_image(&relics, i64::from(HEADER_WIDTH), 0);

        encode_jpeg(canvas)
    }

    /// Portrait scaled to `area_height`, cropped to the header width and faded
    fn portrait(&self, character: &CharacterSnapshot, area_height: u32) -> Option<RgbaImage> {
        if character.portrait.is_empty() || area_height == 0 {
            return None;
        }
        let source = load_asset(&self.mirror.resolve_asset(&character.portrait))?;
        if source.height() == 0 {
            return None;
        }

        let scaled_width = (u64::from(source.width()) * u64::from(area_height)
            / u64::from(source.height()))
        .max(1) as u32;
        let scaled = imageops::resize(&source, scaled_width, area_height, FilterType::Triangle);

        let mut portrait = if scaled_width > HEADER_WIDTH {
            let left = (scaled_width - HEADER_WIDTH) / 2;
            imageops::crop_imm(&scaled, left, 0, HEADER_WIDTH, area_height).to_image()
        } else {
            scaled
        };
        fade(&mut portrait, PORTRAIT_OPACITY);
        Some(portrait)
    }
}

fn encode_jpeg(canvas: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{character_with_relics, empty_mirror};
    use image::Rgba;

    fn compositor(dir: &std::path::Path) -> CardCompositor {
        CardCompositor::new(Arc::new(empty_mirror(dir)), None)
    }

    #[test]
    fn test_nothing_rendered_before_table_loads() {
        let dir = tempfile::tempdir().unwrap();
        let character = character_with_relics(2);

        let card = compositor(dir.path()).compose(&character, None, false).unwrap();

        assert!(card.is_none());
    }

    #[test]
    fn test_nothing_rendered_without_relics() {
        let dir = tempfile::tempdir().unwrap();
        let character = character_with_relics(0);
        let weights = WeightEntry::default();

        let card = compositor(dir.path())
            .compose(&character, Some(&weights), true)
            .unwrap();

        assert!(card.is_none());
    }

    #[test]
    fn test_missing_weight_entry_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let character = character_with_relics(3);

        let card = compositor(dir.path())
            .compose(&character, None, true)
            .unwrap()
            .expect("card rendered");

        let decoded = image::load_from_memory(&card).unwrap();
        let expected = card_dimensions(0, 3);
        assert_eq!((decoded.width(), decoded.height()), expected);
        assert_eq!(expected, (1030, 430));
    }

    #[test]
    fn test_relic_icon_is_drawn_from_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = empty_mirror(dir.path());
        let icon_path = mirror.resolve_asset("icon/relic/101_0.png");
        std::fs::create_dir_all(icon_path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))
            .save(&icon_path)
            .unwrap();

        let character = character_with_relics(1);
        let card = CardCompositor::new(Arc::new(mirror), None)
            .compose(&character, None, true)
            .unwrap()
            .unwrap();

        let decoded = image::load_from_memory(&card).unwrap().to_rgb8();
        // first cell starts at (10, 10) inside the relic panel; icon at +10/+25, 96px
        let pixel = decoded.get_pixel(HEADER_WIDTH + 10 + 10 + 48, 10 + 25 + 48);
        assert!(pixel[0] > 200, "expected red icon, got {:?}", pixel);
        assert!(pixel[1] < 60);
    }
}
