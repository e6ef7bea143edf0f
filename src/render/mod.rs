pub mod canvas;
pub mod compositor;
pub mod format;
pub mod header_panel;
pub mod relic_panel;
pub mod stat_panel;

mod errors;

pub use canvas::Typeface;
pub use compositor::{card_dimensions, CardCompositor};
pub use errors::RenderError;
pub use format::format_stat_value;
pub use header_panel::{character_title, light_cone_line};
pub use relic_panel::{build_relic_cells, RelicCell};
pub use stat_panel::{build_stat_rows, StatRow};
