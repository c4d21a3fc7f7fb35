pub mod band_scale;
pub mod curve;
pub mod primitives;
pub mod scale;
pub mod types;

pub use band_scale::BandScale;
pub use curve::{PathCommand, monotone_x_path, path_length};
pub use primitives::{
    MISSING_VALUE_LABEL, format_fixed, format_optional_fixed, format_optional_percent,
    format_percent, parse_decimal,
};
pub use scale::{
    DomainFloor, LinearScale, ScalePadding, build_linear_scale, build_year_scale, extent,
};
pub use types::{DataPoint, Margins, PlotArea, Viewport};
