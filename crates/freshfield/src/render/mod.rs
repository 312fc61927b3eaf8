//! Pure projections from feed data to render trees.

mod projector;
mod styles;
mod theme;

pub use projector::{
    DateStyle, EMPTY_LIST_TEXT, FALLBACK_GLYPH, feature_icon, feature_label, format_date,
    project_feature, project_update, project_update_list,
};
pub use styles::StyleTheme;
pub use theme::{CLOSE_BUTTON_CLASS, ModalTheme};
