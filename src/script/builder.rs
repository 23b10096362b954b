use crate::script::opcodes::*;
use crate::script::stack::MAX_ELEMENT_SIZE;
use crate::script::Script;
use crate::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// ScriptBuilder can be used to build [Script]s.
///
/// Data pushes always use the minimal form: a direct push where the length fits, otherwise the
/// smallest OP_PUSHDATA variant.
pub struct ScriptBuilder {
    buffer: BytesMut,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBuilder {
    /// Create a new ScriptBuilder for constructing a [Script].
    pub fn new() -> ScriptBuilder {
        Self {
            // initial capacity - 1000 bytes should hold most scripts
            buffer: BytesMut::with_capacity(1000),
        }
    }

    /// Add an opcode to the script.
    pub fn add(&mut self, opcode: u8) -> &mut ScriptBuilder {
        self.buffer.put_u8(opcode);
        self
    }

    /// Add a data push of the given bytes to the script.
    pub fn push_data(&mut self, data: &[u8]) -> Result<&mut ScriptBuilder> {
        if data.len() > MAX_ELEMENT_SIZE {
            return Err(Error::ElementTooLarge);
        }
        match data.len() {
            0..=0x4b => self.buffer.put_u8(data.len() as u8),
            0x4c..=0xff => {
                self.buffer.put_u8(OP_PUSHDATA1);
                self.buffer.put_u8(data.len() as u8);
            }
            _ => {
                self.buffer.put_u8(OP_PUSHDATA2);
                self.buffer.put_u16_le(data.len() as u16);
            }
        }
        self.buffer.put_slice(data);
        Ok(self)
    }

    /// Add the minimal push of the given number to the script.
    pub fn push_int(&mut self, val: i64) -> Result<&mut ScriptBuilder> {
        match val {
            0 => {
                self.add(OP_0);
                Ok(self)
            }
            -1 => {
                self.add(OP_1NEGATE);
                Ok(self)
            }
            1..=16 => {
                self.add(OP_1 + (val - 1) as u8);
                Ok(self)
            }
            _ => {
                let encoded = crate::script::num::encode_num(val);
                self.push_data(&encoded)
            }
        }
    }

    /// Build the script.
    pub fn build(&self) -> Script {
        Script::new(Bytes::from(self.buffer.to_vec()))
    }
}
