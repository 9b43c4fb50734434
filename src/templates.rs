//! Handlebars templates for the generated C code, embedded by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/templates.rs"));
