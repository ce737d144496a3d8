pub mod formatter;
pub mod html;

pub use formatter::{
    format_element_table, format_factors, format_family_summary, format_failures, format_gdf_formula,
    format_level, format_report, format_structure, format_value, should_use_colors,
};
pub use html::{escape_html, image_data_uri, render_report, save_report};
