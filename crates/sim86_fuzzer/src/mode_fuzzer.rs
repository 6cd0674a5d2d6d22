/*
    sim86
    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.
*/
use rand::{rngs::StdRng, Rng};

/// Picks values for a MOD field, optionally restricted to register or memory forms.
#[derive(Copy, Clone, Debug)]
pub struct ModeFuzzer {
    allow_reg_form: bool,
    allow_memory_form: bool,
    r#mod: Option<u8>,
}

impl Default for ModeFuzzer {
    fn default() -> Self {
        Self {
            allow_reg_form: true,
            allow_memory_form: true,
            r#mod: None,
        }
    }
}

impl ModeFuzzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reg_form(mut self, allow_reg_form: bool) -> Self {
        self.allow_reg_form = allow_reg_form;
        self
    }

    pub fn with_memory_form(mut self, allow_memory_form: bool) -> Self {
        self.allow_memory_form = allow_memory_form;
        self
    }

    pub fn with_mod(mut self, r#mod: u8) -> Self {
        self.r#mod = Some(r#mod & 0x03);
        self
    }

    pub fn build(&self, rng: &mut StdRng) -> u8 {
        // A specific mod takes priority over the form restrictions.
        if let Some(r#mod) = self.r#mod {
            return r#mod;
        }
        match (self.allow_reg_form, self.allow_memory_form) {
            (true, true) => rng.random_range(0..=3),
            (false, true) => rng.random_range(0..=2),
            _ => 0b11,
        }
    }
}
