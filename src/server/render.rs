// src/server/render.rs
// JSON text with `", "` and `": "` separators and non-ASCII escaped as
// `\uXXXX`.
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` with spaced separators and ASCII-only output. Object
/// keys keep their insertion order.
pub fn spaced_json<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_formatter(Vec::new(), SpacedFormatter);
    value.serialize(&mut serializer)?;
    // The formatter only ever writes ASCII.
    String::from_utf8(serializer.into_inner()).map_err(|e| {
        serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e))
    })
}
