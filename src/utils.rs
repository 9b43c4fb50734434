use std::{fmt::Display, path::PathBuf};

use anyhow::{Context, Result};
use handlebars::{no_escape, Handlebars};
use serde::Serialize;

use crate::{table::Table, templates::TEMPLATES};

/// State of one run, threaded through every stage.
pub(crate) struct Ctx<'l> {
    pub(crate) src: PathBuf,
    /// Output prefix, `.h` and `.c` are appended.
    pub(crate) dest: PathBuf,
    pub(crate) gzip: bool,
    pub(crate) reg: Handlebars<'l>,
    pub(crate) table: Table,
    pub(crate) skipped: usize,
}

impl Ctx<'_> {
    pub(crate) fn new(src: PathBuf, dest: PathBuf, gzip: bool) -> Result<Self> {
        Ok(Self {
            src,
            dest,
            gzip,
            reg: registry()?,
            table: Table::default(),
            skipped: 0,
        })
    }

    /// Reports a per-file failure; the run goes on without that file.
    pub(crate) fn skip(&mut self, err: impl Display) {
        self.skipped += 1;
        log::error!("{err:#}");
    }
}

fn registry<'l>() -> Result<Handlebars<'l>> {
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    reg.register_escape_fn(no_escape);
    for (name, template) in TEMPLATES {
        reg.register_template_string(name, template)
            .with_context(|| format!("failed to register template {name}"))?;
    }
    Ok(reg)
}

pub(crate) fn render<T>(reg: &Handlebars, name: &str, data: &T) -> Result<String>
where
    T: Serialize,
{
    reg.render(name, data)
        .with_context(|| format!("failed to render template {name}"))
}
