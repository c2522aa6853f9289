//! Script chunk parsing.
//!
//! A script is a sequence of chunks: either a data push (with its bytes) or
//! a bare opcode. Parsing never executes anything.

use std::fmt;

use crate::ScriptError;

/// A single script opcode byte.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    pub const OP_0: Opcode = Opcode(0x00);
    pub const OP_PUSHBYTES_75: Opcode = Opcode(0x4b);
    pub const OP_PUSHDATA1: Opcode = Opcode(0x4c);
    pub const OP_PUSHDATA2: Opcode = Opcode(0x4d);
    pub const OP_PUSHDATA4: Opcode = Opcode(0x4e);
    pub const OP_1NEGATE: Opcode = Opcode(0x4f);
    pub const OP_1: Opcode = Opcode(0x51);
    pub const OP_16: Opcode = Opcode(0x60);
    pub const OP_IF: Opcode = Opcode(0x63);
    pub const OP_NOTIF: Opcode = Opcode(0x64);
    pub const OP_VERIF: Opcode = Opcode(0x65);
    pub const OP_VERNOTIF: Opcode = Opcode(0x66);
    pub const OP_ENDIF: Opcode = Opcode(0x68);
    pub const OP_RETURN: Opcode = Opcode(0x6a);
    pub const OP_2DROP: Opcode = Opcode(0x6d);
    pub const OP_DROP: Opcode = Opcode(0x75);
    pub const OP_DUP: Opcode = Opcode(0x76);
    pub const OP_EQUALVERIFY: Opcode = Opcode(0x88);
    pub const OP_HASH160: Opcode = Opcode(0xa9);
    pub const OP_CHECKSIG: Opcode = Opcode(0xac);
    pub const OP_CHECKSIGVERIFY: Opcode = Opcode(0xad);

    /// Opcodes 0x01..=0x4e carry data.
    pub fn is_push(self) -> bool {
        self.0 >= 0x01 && self.0 <= Self::OP_PUSHDATA4.0
    }

    /// OP_1..=OP_16.
    pub fn is_small_int(self) -> bool {
        self >= Self::OP_1 && self <= Self::OP_16
    }

    /// The value a minimal push of one of the constant opcodes stands for.
    pub fn constant_value(self) -> Option<Vec<u8>> {
        match self {
            Self::OP_0 => Some(vec![0]),
            Self::OP_1NEGATE => Some(vec![0x81]),
            op if op.is_small_int() => Some(vec![op.0 - Self::OP_1.0 + 1]),
            _ => None,
        }
    }

    fn opens_conditional(self) -> bool {
        matches!(
            self,
            Self::OP_IF | Self::OP_NOTIF | Self::OP_VERIF | Self::OP_VERNOTIF
        )
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode(0x{:02x})", self.0)
    }
}

/// One parsed script element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub op: Opcode,
    /// Pushed bytes, or for a top-level OP_RETURN the remainder of the script.
    pub data: Option<Vec<u8>>,
}

impl Chunk {
    /// The bytes this chunk contributes as a data field, if it is a push or
    /// one of the constant opcodes.
    pub fn field_value(&self) -> Option<Vec<u8>> {
        match &self.data {
            Some(data) if self.op.is_push() => Some(data.clone()),
            _ => self.op.constant_value(),
        }
    }
}

/// Split a script into chunks.
///
/// An OP_RETURN outside any conditional ends the executable script; the
/// rest of the bytes become that chunk's data.
pub fn parse_chunks(script: &[u8]) -> Result<Vec<Chunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pc = 0usize;
    let mut depth = 0usize;

    while pc < script.len() {
        let op = Opcode(script[pc]);
        let start = pc;
        pc += 1;

        if op == Opcode::OP_RETURN && depth == 0 {
            chunks.push(Chunk {
                op,
                data: Some(script[pc..].to_vec()),
            });
            break;
        }

        let len = match op {
            Opcode::OP_PUSHDATA1 => Some(usize::from(take(script, pc, 1, start)?[0])),
            Opcode::OP_PUSHDATA2 => {
                let b = take(script, pc, 2, start)?;
                Some(usize::from(u16::from_le_bytes([b[0], b[1]])))
            }
            Opcode::OP_PUSHDATA4 => {
                let b = take(script, pc, 4, start)?;
                let n = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
                Some(usize::try_from(n).map_err(|_| ScriptError::TruncatedPush { position: start })?)
            }
            o if o.0 >= 0x01 && o <= Opcode::OP_PUSHBYTES_75 => Some(usize::from(o.0)),
            _ => None,
        };

        match len {
            Some(len) => {
                pc += match op {
                    Opcode::OP_PUSHDATA1 => 1,
                    Opcode::OP_PUSHDATA2 => 2,
                    Opcode::OP_PUSHDATA4 => 4,
                    _ => 0,
                };
                let data = take(script, pc, len, start)?.to_vec();
                pc += len;
                chunks.push(Chunk {
                    op,
                    data: Some(data),
                });
            }
            None => {
                if op.opens_conditional() {
                    depth += 1;
                } else if op == Opcode::OP_ENDIF {
                    depth = depth.saturating_sub(1);
                }
                chunks.push(Chunk { op, data: None });
            }
        }
    }

    Ok(chunks)
}

fn take(script: &[u8], offset: usize, len: usize, start: usize) -> Result<&[u8], ScriptError> {
    offset
        .checked_add(len)
        .and_then(|end| script.get(offset..end))
        .ok_or(ScriptError::TruncatedPush { position: start })
}

/// Append a minimally encoded push of `data`.
pub fn push_data(out: &mut Vec<u8>, data: &[u8]) {
    match data {
        [] | [0] => out.push(Opcode::OP_0.0),
        [n @ 1..=16] => out.push(Opcode::OP_1.0 + n - 1),
        [0x81] => out.push(Opcode::OP_1NEGATE.0),
        _ if data.len() <= usize::from(Opcode::OP_PUSHBYTES_75.0) => {
            out.push(data.len() as u8);
            out.extend_from_slice(data);
        }
        _ if data.len() <= 0xff => {
            out.push(Opcode::OP_PUSHDATA1.0);
            out.push(data.len() as u8);
            out.extend_from_slice(data);
        }
        _ if data.len() <= 0xffff => {
            out.push(Opcode::OP_PUSHDATA2.0);
            out.extend_from_slice(&(data.len() as u16).to_le_bytes());
            out.extend_from_slice(data);
        }
        _ => {
            out.push(Opcode::OP_PUSHDATA4.0);
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p2pkh() -> Vec<u8> {
        let mut script = vec![Opcode::OP_DUP.0, Opcode::OP_HASH160.0, 20];
        script.extend_from_slice(&[0x42; 20]);
        script.extend_from_slice(&[Opcode::OP_EQUALVERIFY.0, Opcode::OP_CHECKSIG.0]);
        script
    }

    #[test]
    fn parses_p2pkh() {
        let chunks = parse_chunks(&p2pkh()).unwrap();
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0].op, Opcode::OP_DUP);
        assert_eq!(chunks[2].data.as_deref(), Some(&[0x42; 20][..]));
        assert_eq!(chunks[4].op, Opcode::OP_CHECKSIG);
    }

    #[test]
    fn parses_pushdata_forms() {
        for len in [1usize, 75, 76, 255, 256, 70_000] {
            let data = vec![0x07; len];
            let mut script = Vec::new();
            push_data(&mut script, &data);
            let chunks = parse_chunks(&script).unwrap();
            assert_eq!(chunks.len(), 1, "len {len}");
            assert_eq!(chunks[0].field_value(), Some(data));
        }
    }

    #[test]
    fn minimal_constants_roundtrip() {
        for value in [vec![], vec![0u8], vec![1], vec![16], vec![0x81]] {
            let mut script = Vec::new();
            push_data(&mut script, &value);
            assert_eq!(script.len(), 1);
            let chunk = &parse_chunks(&script).unwrap()[0];
            let expected = if value.is_empty() { vec![0] } else { value };
            assert_eq!(chunk.field_value(), Some(expected));
        }
    }

    #[test]
    fn truncated_push_is_an_error() {
        assert_eq!(
            parse_chunks(&[0x05, 1, 2]),
            Err(ScriptError::TruncatedPush { position: 0 })
        );
        assert_eq!(
            parse_chunks(&[Opcode::OP_CHECKSIG.0, Opcode::OP_PUSHDATA2.0, 0x01]),
            Err(ScriptError::TruncatedPush { position: 1 })
        );
    }

    #[test]
    fn top_level_op_return_swallows_the_rest() {
        let script = [Opcode::OP_RETURN.0, 0x05, 0xff];
        let chunks = parse_chunks(&script).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].data.as_deref(), Some(&[0x05, 0xff][..]));
    }

    #[test]
    fn op_return_inside_conditional_is_an_opcode() {
        let script = [
            Opcode::OP_IF.0,
            Opcode::OP_RETURN.0,
            Opcode::OP_ENDIF.0,
            Opcode::OP_DROP.0,
        ];
        let chunks = parse_chunks(&script).unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[1].data, None);
    }

    #[test]
    fn empty_script_has_no_chunks() {
        assert!(parse_chunks(&[]).unwrap().is_empty());
    }
}
