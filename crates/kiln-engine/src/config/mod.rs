//! String-keyed parameter dictionaries and typed value parsing.
//!
//! Description files and emitter definitions arrive as `key -> string`
//! pairs. Constructors pull the keys they understand and convert them with
//! the `parse_*` helpers.

mod error;
mod params;
mod parse;

pub use error::ConfigError;
pub use params::ParamDictionary;
pub use parse::{
    parse_anchor, parse_bool, parse_colour, parse_f32, parse_finite_f32, parse_u32, parse_unified_vec2, parse_vec2,
    parse_vec3,
};
