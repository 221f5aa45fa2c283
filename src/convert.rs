//! One conversion: read → parse → render → format → write.
use std::io::{Read, Write};

use tracing::{debug, info};

use crate::codegen::{self, RenderOptions};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{Formatter, GoFmt, Verbatim};
use crate::lang::Lang;
use crate::source::create_parser;

/// Formats are validated before the input is touched; decoder errors come
/// back unwrapped.
pub fn convert(config: &Config, mut input: impl Read, mut output: impl Write) -> Result<()> {
    let src = config.source()?;
    let dst = config.destination()?;
    if src == dst {
        return Err(Error::SameSourceDestination(src));
    }
    info!(%src, %dst, root = %config.root_name(), "converting");

    let mut data = Vec::new();
    input.read_to_end(&mut data)?;

    let structs = create_parser(src, config).parse(&data).inspect_err(|err| {
        if err.is_decode() {
            debug!(%src, bytes = data.len(), "input rejected by the {src} front-end");
        }
    })?;
    let options = RenderOptions { acronyms: config.acronym_table() };
    let rendered = codegen::render(dst, &structs, &options)?;

    let formatter: Box<dyn Formatter> = if dst == Lang::Go && config.gofmt {
        Box::new(GoFmt::default())
    } else {
        Box::new(Verbatim)
    };
    let text = formatter.format(rendered);

    output.write_all(text.as_bytes())?;
    output.flush()?;
    Ok(())
}
