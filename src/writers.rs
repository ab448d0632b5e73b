use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub trait OutWriter<T> {
    fn write(&mut self, item: T) -> anyhow::Result<()>;
}

/// Writes a document as pretty JSON with four-space indentation and a
/// trailing newline.
pub struct JsonWriter<W: Write> {
    buf_writer: BufWriter<W>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { buf_writer: BufWriter::new(writer) }
    }
}

impl JsonWriter<File> {
    /// Refuses to clobber an existing file unless `force`.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        force: bool,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let created =
            if force { File::create(path) } else { File::create_new(path) };
        let fh = created.with_context(|| {
            format!("failed to open output file {}", path.display())
        })?;
        Ok(Self::new(fh))
    }
}

impl<W: Write, T: Serialize> OutWriter<&T> for JsonWriter<W> {
    fn write(&mut self, item: &T) -> anyhow::Result<()> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(
            &mut self.buf_writer,
            formatter,
        );
        item.serialize(&mut ser).context("failed to serialize output")?;
        self.buf_writer.write_all(b"\n")?;
        self.buf_writer.flush().context("failed to write output")?;
        Ok(())
    }
}
