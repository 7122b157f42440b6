//! Names that are in scope in every Quill module without an import.
//!
//! ## Notes
//! - Values are lower-case functions; constructors are capitalized.
//! - Built-in operators are listed in [`crate::lang::operators`], not here.

/// Prelude functions.
pub const VALUES: &[&str] = &[
    "identity", "always", "not", "negate", "toString", "fst", "snd", "min", "max", "abs", "compare", "flip",
];

/// Prelude constructors.
pub const CONSTRUCTORS: &[&str] = &["True", "False", "Just", "Nothing", "Ok", "Err", "LT", "EQ", "GT"];

/// Return `true` if `name` is a prelude value or constructor.
pub fn contains(name: &str) -> bool {
    VALUES.contains(&name) || CONSTRUCTORS.contains(&name)
}
