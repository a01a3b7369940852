//! JSON layout of the output files
//!
//! Objects are indented with tabs, one member per line. An array is laid out
//! according to its first element: arrays of objects or arrays get one element
//! per line, arrays of scalars stay on a single line. This keeps the numeric
//! arrays of large spectra compact while the record structure stays readable.

use std::io::{self, Write};

use serde_json::ser::{CompactFormatter, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object { has_members: bool },
    Array(Layout),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// No element written yet
    Pending,
    Inline,
    Block,
}

/// [`Formatter`] producing the tab-indented output layout
#[derive(Debug, Default)]
pub struct TabbedFormatter {
    stack: Vec<Frame>,
}

impl TabbedFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent<W: ?Sized + Write>(&self, writer: &mut W) -> io::Result<()> {
        for _ in 0..self.stack.len() {
            writer.write_all(b"\t")?;
        }
        Ok(())
    }

    /// Fix the layout of the enclosing array when its first element begins
    fn settle<W: ?Sized + Write>(&mut self, writer: &mut W, block: bool) -> io::Result<()> {
        if let Some(Frame::Array(layout @ Layout::Pending)) = self.stack.last_mut() {
            if block {
                *layout = Layout::Block;
                writer.write_all(b"\n")?;
                self.indent(writer)?;
            } else {
                *layout = Layout::Inline;
            }
        }
        Ok(())
    }
}

macro_rules! scalar {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<W: ?Sized + Write>(&mut self, writer: &mut W, value: $ty) -> io::Result<()> {
                self.settle(writer, false)?;
                CompactFormatter.$method(writer, value)
            }
        )*
    };
}

impl Formatter for TabbedFormatter {
    fn write_null<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.settle(writer, false)?;
        writer.write_all(b"null")
    }

    scalar!(
        write_bool(bool),
        write_i8(i8),
        write_i16(i16),
        write_i32(i32),
        write_i64(i64),
        write_u8(u8),
        write_u16(u16),
        write_u32(u32),
        write_u64(u64),
        write_f32(f32),
        write_f64(f64),
    );

    fn write_number_str<W: ?Sized + Write>(&mut self, writer: &mut W, value: &str) -> io::Result<()> {
        self.settle(writer, false)?;
        writer.write_all(value.as_bytes())
    }

    fn begin_string<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.settle(writer, false)?;
        writer.write_all(b"\"")
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.settle(writer, true)?;
        self.stack.push(Frame::Array(Layout::Pending));
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if let Some(Frame::Array(Layout::Block)) = self.stack.pop() {
            writer.write_all(b"\n")?;
            self.indent(writer)?;
        }
        writer.write_all(b"]")
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            return Ok(());
        }
        match self.stack.last() {
            Some(Frame::Array(Layout::Block)) => {
                writer.write_all(b",\n")?;
                self.indent(writer)
            }
            _ => writer.write_all(b","),
        }
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        Ok(())
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.settle(writer, true)?;
        self.stack.push(Frame::Object { has_members: false });
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if let Some(Frame::Object { has_members: true }) = self.stack.pop() {
            writer.write_all(b"\n")?;
            self.indent(writer)?;
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if let Some(Frame::Object { has_members }) = self.stack.last_mut() {
            *has_members = true;
        }
        writer.write_all(if first { b"\n" } else { b",\n" })?;
        self.indent(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    fn render<T: Serialize>(value: &T) -> String {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, TabbedFormatter::new());
        value.serialize(&mut serializer).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_layout() {
        let value = json!({
            "a": [1, 2.5, null],
            "b": [{"c": "x"}],
            "d": {},
            "e": [],
        });
        assert_eq!(
            render(&value),
            "{\n\t\"a\": [1,2.5,null],\n\t\"b\": [\n\t\t{\n\t\t\t\"c\": \"x\"\n\t\t}\n\t],\n\t\"d\": {},\n\t\"e\": []\n}"
        );
    }

    #[test]
    fn test_nested_arrays_are_blocks() {
        assert_eq!(render(&json!([[1], []])), "[\n\t[1],\n\t[]\n]");
    }

    #[test]
    fn test_non_finite_numbers_are_null() {
        assert_eq!(render(&vec![1.0, f64::NAN, f64::INFINITY]), "[1.0,null,null]");
    }

    #[test]
    fn test_output_is_valid_json() {
        let value = json!({"id": "x", "spectrum": [{"array": {"mz": [1.5, 2.5]}}]});
        let parsed: serde_json::Value = serde_json::from_str(&render(&value)).unwrap();
        assert_eq!(parsed, value);
    }
}
