use std::path::Path;

/// Stems starting with this character are the four-piece relic category
const PRIMARY_CATEGORY_MARKER: char = '1';
const PRIMARY_OFFSET: u8 = 1;
const ALTERNATE_OFFSET: u8 = 5;

/// 1-based slot index of a relic, derived from its icon file name.
///
/// `icon/relic/101_2.png` is slot 3 (primary category, offset 1);
/// `icon/relic/301_1.png` is slot 6 (alternate category, offset 5).
pub fn slot_index_of(icon_path: &str) -> Option<u8> {
    let stem = Path::new(icon_path).file_stem()?.to_str()?;
    let first = stem.chars().next()?;
    let trailing = stem.chars().last()?.to_digit(10)? as u8;

    let offset = if first == PRIMARY_CATEGORY_MARKER {
        PRIMARY_OFFSET
    } else {
        ALTERNATE_OFFSET
    };
    Some(trailing + offset)
}
