//! Little-endian wire primitives shared by the writer and reader.

use std::io::{Read, Write};

use boreal_foundation::{Error, LocalValue, ObjectId, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec3;

/// Longest string the reader will allocate for. Anything bigger is treated
/// as corruption, not a request for gigabytes.
const MAX_STRING_BYTES: u32 = 1 << 20;

pub(crate) struct SaveWriter<W: Write> {
    out: W,
}

impl<W: Write> SaveWriter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    pub(crate) fn write_u8(&mut self, value: u8) -> Result<()> {
        self.out.write_u8(value)?;
        Ok(())
    }

    pub(crate) fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub(crate) fn write_u32(&mut self, value: u32) -> Result<()> {
        self.out.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_i32(&mut self, value: i32) -> Result<()> {
        self.out.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_f32(&mut self, value: f32) -> Result<()> {
        self.out.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_f64(&mut self, value: f64) -> Result<()> {
        self.out.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        Ok(())
    }

    /// Length-prefixed UTF-8.
    pub(crate) fn write_string(&mut self, value: &str) -> Result<()> {
        let length = u32::try_from(value.len())
            .map_err(|_| Error::argument("string exceeds the u32 length prefix"))?;
        self.write_u32(length)?;
        self.write_bytes(value.as_bytes())
    }

    pub(crate) fn write_object_id(&mut self, id: ObjectId) -> Result<()> {
        self.write_u32(id.raw())
    }

    pub(crate) fn write_vec3(&mut self, value: Vec3) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// Tag byte then the payload the tag dictates.
    pub(crate) fn write_value(&mut self, value: &LocalValue) -> Result<()> {
        self.write_u8(value.tag())?;
        match value {
            LocalValue::Null => Ok(()),
            LocalValue::Int(int) => self.write_i32(*int),
            LocalValue::Float(float) => self.write_f32(*float),
            LocalValue::String(string) => self.write_string(string),
            LocalValue::Bool(flag) => self.write_bool(*flag),
            LocalValue::Object(id) => self.write_object_id(*id),
        }
    }
}

pub(crate) struct SaveReader<R: Read> {
    input: R,
}

impl<R: Read> SaveReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self { input }
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.input.read_u8()?)
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::corrupt_data(format!(
                "flag byte out of range: {other}"
            ))),
        }
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        Ok(self.input.read_u32::<LittleEndian>()?)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(self.input.read_i32::<LittleEndian>()?)
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        Ok(self.input.read_f32::<LittleEndian>()?)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        Ok(self.input.read_f64::<LittleEndian>()?)
    }

    pub(crate) fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; length];
        self.input.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        let length = self.read_u32()?;
        if length > MAX_STRING_BYTES {
            return Err(Error::corrupt_data(format!(
                "string length {length} exceeds the {MAX_STRING_BYTES} byte cap"
            )));
        }
        let bytes = self.read_bytes(length as usize)?;
        String::from_utf8(bytes).map_err(|_| Error::corrupt_data("string is not UTF-8"))
    }

    pub(crate) fn read_object_id(&mut self) -> Result<ObjectId> {
        Ok(ObjectId::from_raw(self.read_u32()?))
    }

    pub(crate) fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    pub(crate) fn read_value(&mut self) -> Result<LocalValue> {
        let tag = self.read_u8()?;
        Ok(match tag {
            0 => LocalValue::Null,
            1 => LocalValue::Int(self.read_i32()?),
            2 => LocalValue::Float(self.read_f32()?),
            3 => LocalValue::String(self.read_string()?),
            4 => LocalValue::Bool(self.read_bool()?),
            5 => LocalValue::Object(self.read_object_id()?),
            other => {
                return Err(Error::corrupt_data(format!("unknown value tag {other}")));
            }
        })
    }
}
