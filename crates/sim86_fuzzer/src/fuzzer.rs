use rand::{rngs::StdRng, Rng};
use sim86_decode::{FieldRole, InstructionEncoding, OperationKind};

use crate::{error::FuzzerError, mode_fuzzer::ModeFuzzer};

/// Random bytes appended after the encoded fields, enough for a 16-bit displacement and 16-bit
/// immediate.
pub const INSTRUCTION_POST_LEN: usize = 4;

pub struct FuzzerOptions {
    /// Restrict generation to these operations.
    pub ops: Option<Vec<OperationKind>>,
    pub allow_reg_form: bool,
    pub allow_memory_form: bool,
}

impl Default for FuzzerOptions {
    fn default() -> Self {
        Self {
            ops: None,
            allow_reg_form: true,
            allow_memory_form: true,
        }
    }
}

/// Generates random, well-formed byte sequences for the encodings of a table.
pub struct InstructionFuzzer {
    encodings: Vec<InstructionEncoding>,
}

#[derive(Clone, Debug)]
pub struct FuzzerInstruction {
    pub op: OperationKind,
    pub encoding_index: usize,
    pub bytes: Vec<u8>,
    /// The generated MOD value, if the encoding has a MOD field in the stream.
    pub r#mod: Option<u8>,
}

impl FuzzerInstruction {
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }
}

/// Packs fields into bytes, most significant bit first.
#[derive(Default)]
struct BitPacker {
    bytes: Vec<u8>,
    current: u8,
    filled: u32,
}

impl BitPacker {
    fn push(&mut self, value: u8, bit_count: u32) {
        for bit in (0..bit_count).rev() {
            self.current = (self.current << 1) | ((value >> bit) & 0x01);
            self.filled += 1;
            if self.filled == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.filled = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
        }
        self.bytes
    }
}

impl InstructionFuzzer {
    pub fn new(encodings: &[InstructionEncoding]) -> Self {
        InstructionFuzzer {
            encodings: encodings.to_vec(),
        }
    }

    pub fn random_instruction(
        &self,
        rng: &mut StdRng,
        options: &FuzzerOptions,
    ) -> Result<FuzzerInstruction, FuzzerError> {
        if !options.allow_reg_form && !options.allow_memory_form {
            return Err(FuzzerError::InvalidOptions(
                "at least one of register or memory forms must be allowed".into(),
            ));
        }

        let candidates: Vec<usize> = self
            .encodings
            .iter()
            .enumerate()
            .filter(|(_, enc)| options.ops.as_ref().map_or(true, |ops| ops.contains(&enc.op)))
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return Err(FuzzerError::InvalidOptions(
                "No encodings match the provided filter options".into(),
            ));
        }

        let encoding_index = candidates[rng.random_range(0..candidates.len())];
        let encoding = &self.encodings[encoding_index];
        let mode_fuzzer = ModeFuzzer::new()
            .with_reg_form(options.allow_reg_form)
            .with_memory_form(options.allow_memory_form);

        let mut packer = BitPacker::default();
        let mut r#mod = None;
        for field in encoding.fields.iter().filter(|f| f.bit_count > 0) {
            let width = field.bit_count as u32;
            let value = match field.role {
                FieldRole::Literal => field.value,
                FieldRole::Mod => {
                    let value = mode_fuzzer.build(rng);
                    r#mod = Some(value);
                    value
                }
                _ => rng.random_range(0..(1u16 << width)) as u8,
            };
            packer.push(value, width);
        }

        let mut bytes = packer.finish();
        for _ in 0..INSTRUCTION_POST_LEN {
            bytes.push(rng.random());
        }

        Ok(FuzzerInstruction {
            op: encoding.op,
            encoding_index,
            bytes,
            r#mod,
        })
    }
}
