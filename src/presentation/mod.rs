pub mod app_theme;
mod region_selector_view;

pub use region_selector_view::{RegionSelectorMessage, RegionSelectorView};
