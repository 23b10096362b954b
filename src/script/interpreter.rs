use crate::script::num::bytes_to_bool;
use crate::script::opcodes::*;
use crate::script::signature::{check_pubkey_encoding, check_signature_encoding, SignatureChecker};
use crate::script::stack::{Stack, MAX_ELEMENT_SIZE};
use crate::script::{Script, VerifyFlags, MAX_SCRIPT_SIZE};
use crate::hash::Hash;
use crate::{Error, Result};
use bytes::Bytes;
use log::trace;
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Maximum combined depth of the main and alt stacks.
const MAX_STACK_SIZE: usize = 1000;

/// Script interpreter for evaluating scripts.
///
/// The interpreter owns the two stacks and drives the fetch-decode-execute loop over the script
/// bytes. A single call to [eval_script](Self::eval_script) runs to termination; it performs no
/// IO and never blocks. Execution ends normally at the end of the script or abnormally with a
/// typed failure, leaving the stacks available for inspection either way.
///
/// Whether the terminal stack state constitutes success is the caller's judgment, typically
/// "top of the main stack is true", see [stack_top_true](Self::stack_top_true) and
/// [verify_script].
pub struct ScriptInterpreter {
    pub(crate) main_stack: Stack,
    pub(crate) alt_stack: Stack,
    exec_stack: Vec<bool>,
    flags: VerifyFlags,
    steps: u64,
}

impl Default for ScriptInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptInterpreter {
    pub fn new() -> Self {
        Self::with_flags(VerifyFlags::default())
    }

    pub fn with_flags(flags: VerifyFlags) -> Self {
        Self {
            main_stack: Stack::new(),
            alt_stack: Stack::new(),
            exec_stack: Vec::new(),
            flags,
            steps: 0,
        }
    }

    /// Replace the verification flags.
    pub fn set_flags(&mut self, flags: VerifyFlags) {
        self.flags = flags;
    }

    /// Evaluate a script without a signature checker.
    ///
    /// OP_CHECKSIG fails with [Error::RequiresContext] on this path.
    pub fn eval_script(&mut self, script: &Script) -> Result<()> {
        self.eval_script_with_checker(script, None)
    }

    /// Evaluate a script with an optional signature checker.
    pub fn eval_script_with_checker(
        &mut self,
        script: &Script,
        checker: Option<&dyn SignatureChecker>,
    ) -> Result<()> {
        if script.len() > MAX_SCRIPT_SIZE {
            return Err(Error::ScriptTooLarge);
        }
        trace!("evaluating script of {} bytes", script.len());

        let bytes = script.as_bytes();
        let mut pc = 0usize;
        while pc < bytes.len() {
            let opcode = bytes[pc];
            pc += 1;
            self.steps += 1;

            if (0x01..=OP_PUSHDATA4).contains(&opcode) {
                // pushdata operands must be consumed even in unexecuted branches so that the
                // program counter stays aligned with the opcode stream
                self.pushdata(bytes, &mut pc, opcode)?;
            } else {
                match opcode {
                    OP_IF | OP_NOTIF => {
                        let condition = if self.executing() {
                            if self.main_stack.is_empty() {
                                opcode == OP_NOTIF
                            } else {
                                let top = self.main_stack.pop()?;
                                bytes_to_bool(&top) == (opcode == OP_IF)
                            }
                        } else {
                            false
                        };
                        self.exec_stack.push(condition);
                    }
                    OP_ELSE => {
                        let last = self.exec_stack.last_mut().ok_or(Error::UnbalancedConditional)?;
                        *last = !*last;
                    }
                    OP_ENDIF => {
                        self.exec_stack.pop().ok_or(Error::UnbalancedConditional)?;
                    }
                    _ => {
                        // Skip non-flow-control operations in unexecuted branches
                        if self.executing() {
                            self.execute_op(opcode, checker)?;
                        }
                    }
                }
            }

            if self.main_stack.len() + self.alt_stack.len() > MAX_STACK_SIZE {
                return Err(Error::StackOverflow);
            }
        }

        if !self.exec_stack.is_empty() {
            return Err(Error::UnbalancedConditional);
        }
        if self.flags.require_clean_stack && self.main_stack.len() != 1 {
            return Err(Error::CleanStack);
        }
        Ok(())
    }

    /// Handle the pushdata family: direct pushes of 1-75 bytes and OP_PUSHDATA1/2/4.
    fn pushdata(&mut self, bytes: &[u8], pc: &mut usize, opcode: u8) -> Result<()> {
        let len = match opcode {
            OP_PUSHDATA1 => {
                if *pc + 1 > bytes.len() {
                    return Err(Error::ScriptTooShort);
                }
                let len = bytes[*pc] as usize;
                *pc += 1;
                len
            }
            OP_PUSHDATA2 => {
                if *pc + 2 > bytes.len() {
                    return Err(Error::ScriptTooShort);
                }
                let len = u16::from_le_bytes([bytes[*pc], bytes[*pc + 1]]) as usize;
                *pc += 2;
                len
            }
            OP_PUSHDATA4 => {
                if *pc + 4 > bytes.len() {
                    return Err(Error::ScriptTooShort);
                }
                let len = u32::from_le_bytes([
                    bytes[*pc],
                    bytes[*pc + 1],
                    bytes[*pc + 2],
                    bytes[*pc + 3],
                ]) as usize;
                *pc += 4;
                len
            }
            _ => opcode as usize,
        };

        if *pc + len > bytes.len() {
            return Err(Error::ScriptTooShort);
        }
        if len > MAX_ELEMENT_SIZE {
            return Err(Error::ElementTooLarge);
        }

        if self.executing() {
            let data = &bytes[*pc..*pc + len];
            if self.flags.verify_minimal_push && !minimal_push(opcode, data) {
                return Err(Error::MinimalEncoding);
            }
            self.main_stack.push(Bytes::copy_from_slice(data))?;
        }
        *pc += len;
        Ok(())
    }

    /// Execute a single non-push, non-flow operation.
    fn execute_op(&mut self, opcode: u8, checker: Option<&dyn SignatureChecker>) -> Result<()> {
        match opcode {
            // Push value operations
            OP_0 => self.main_stack.push(Bytes::new())?,
            OP_1NEGATE => self.main_stack.push(Bytes::from_static(&[0x81]))?,
            OP_1..=OP_16 => {
                self.main_stack.push(Bytes::from(vec![opcode - OP_1 + 1]))?;
            }

            // Flow control
            OP_NOP => {}
            OP_VERIFY => {
                if !self.main_stack.pop_bool()? {
                    return Err(Error::VerifyFailed);
                }
            }
            OP_RETURN => return Err(Error::EarlyReturn),

            // Stack operations
            OP_TOALTSTACK => {
                let item = self.main_stack.pop()?;
                self.alt_stack.push(item)?;
            }
            OP_FROMALTSTACK => {
                let item = self.alt_stack.pop()?;
                self.main_stack.push(item)?;
            }
            OP_IFDUP => {
                let dup = {
                    let top = self.main_stack.peek(0)?;
                    if bytes_to_bool(top) {
                        Some(top.clone())
                    } else {
                        None
                    }
                };
                if let Some(top) = dup {
                    self.main_stack.push(top)?;
                }
            }
            OP_DEPTH => {
                let depth = self.main_stack.len();
                self.main_stack.push_int(depth as i64)?;
            }
            OP_DROP => {
                self.main_stack.pop()?;
            }
            OP_DUP => {
                let top = self.main_stack.peek(0)?.clone();
                self.main_stack.push(top)?;
            }
            OP_NIP => {
                self.main_stack.pop_nth(1)?;
            }
            OP_OVER => {
                let item = self.main_stack.peek(1)?.clone();
                self.main_stack.push(item)?;
            }
            OP_PICK => {
                let depth = self.pop_index()?;
                let item = self.main_stack.peek(depth)?.clone();
                self.main_stack.push(item)?;
            }
            OP_ROLL => {
                let depth = self.pop_index()?;
                let item = self.main_stack.pop_nth(depth)?;
                self.main_stack.push(item)?;
            }
            OP_ROT => {
                self.main_stack.swap(2, 1)?;
                self.main_stack.swap(1, 0)?;
            }
            OP_SWAP => {
                self.main_stack.swap(1, 0)?;
            }
            OP_TUCK => {
                let top = self.main_stack.peek(0)?.clone();
                self.main_stack.insert(2, top)?;
            }
            OP_2DROP => {
                self.main_stack.pop()?;
                self.main_stack.pop()?;
            }
            OP_2DUP => {
                let a = self.main_stack.peek(1)?.clone();
                let b = self.main_stack.peek(0)?.clone();
                self.main_stack.push(a)?;
                self.main_stack.push(b)?;
            }
            OP_3DUP => {
                let a = self.main_stack.peek(2)?.clone();
                let b = self.main_stack.peek(1)?.clone();
                let c = self.main_stack.peek(0)?.clone();
                self.main_stack.push(a)?;
                self.main_stack.push(b)?;
                self.main_stack.push(c)?;
            }
            OP_2OVER => {
                let a = self.main_stack.peek(3)?.clone();
                let b = self.main_stack.peek(2)?.clone();
                self.main_stack.push(a)?;
                self.main_stack.push(b)?;
            }
            OP_2ROT => {
                // rotate left twice: [x1 x2 x3 x4 x5 x6] -> [x3 x4 x5 x6 x1 x2]
                if self.main_stack.len() < 6 {
                    return Err(Error::StackUnderflow);
                }
                let a = self.main_stack.pop_nth(5)?;
                let b = self.main_stack.pop_nth(4)?;
                self.main_stack.push(a)?;
                self.main_stack.push(b)?;
            }
            OP_2SWAP => {
                self.main_stack.swap(3, 1)?;
                self.main_stack.swap(2, 0)?;
            }

            // Splice operations
            OP_SIZE => {
                let size = self.main_stack.peek(0)?.len();
                self.main_stack.push_int(size as i64)?;
            }

            // Bitwise logic
            OP_EQUAL => {
                let b = self.main_stack.pop()?;
                let a = self.main_stack.pop()?;
                self.main_stack.push_bool(a == b)?;
            }
            OP_EQUALVERIFY => {
                let b = self.main_stack.pop()?;
                let a = self.main_stack.pop()?;
                if a != b {
                    return Err(Error::VerifyFailed);
                }
            }

            // Arithmetic
            OP_1ADD => {
                let n = self.pop_num()?;
                self.main_stack.push_int(n + 1)?;
            }
            OP_1SUB => {
                let n = self.pop_num()?;
                self.main_stack.push_int(n - 1)?;
            }
            OP_NEGATE => {
                let n = self.pop_num()?;
                self.main_stack.push_int(-n)?;
            }
            OP_ABS => {
                let n = self.pop_num()?;
                self.main_stack.push_int(n.abs())?;
            }
            OP_NOT => {
                let n = self.pop_num()?;
                self.main_stack.push_bool(n == 0)?;
            }
            OP_0NOTEQUAL => {
                let n = self.pop_num()?;
                self.main_stack.push_bool(n != 0)?;
            }
            OP_ADD => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_int(a + b)?;
            }
            OP_SUB => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_int(a - b)?;
            }
            OP_BOOLAND => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a != 0 && b != 0)?;
            }
            OP_BOOLOR => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a != 0 || b != 0)?;
            }
            OP_NUMEQUAL => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a == b)?;
            }
            OP_NUMEQUALVERIFY => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                if a != b {
                    return Err(Error::VerifyFailed);
                }
            }
            OP_NUMNOTEQUAL => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a != b)?;
            }
            OP_LESSTHAN => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a < b)?;
            }
            OP_GREATERTHAN => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a > b)?;
            }
            OP_LESSTHANOREQUAL => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a <= b)?;
            }
            OP_GREATERTHANOREQUAL => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_bool(a >= b)?;
            }
            OP_MIN => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_int(a.min(b))?;
            }
            OP_MAX => {
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.main_stack.push_int(a.max(b))?;
            }
            OP_WITHIN => {
                let max = self.pop_num()?;
                let min = self.pop_num()?;
                let x = self.pop_num()?;
                self.main_stack.push_bool(x >= min && x < max)?;
            }

            // Crypto operations
            OP_RIPEMD160 => {
                let data = self.main_stack.pop()?;
                self.main_stack.push(digest_cell::<Ripemd160>(&data))?;
            }
            OP_SHA1 => {
                let data = self.main_stack.pop()?;
                self.main_stack.push(digest_cell::<Sha1>(&data))?;
            }
            OP_SHA256 => {
                let data = self.main_stack.pop()?;
                self.main_stack.push(digest_cell::<Sha256>(&data))?;
            }
            OP_HASH160 => {
                let data = self.main_stack.pop()?;
                let sha = digest_cell::<Sha256>(&data);
                self.main_stack.push(digest_cell::<Ripemd160>(&sha))?;
            }
            OP_HASH256 => {
                let data = self.main_stack.pop()?;
                let hash = Hash::sha256d(&data);
                self.main_stack.push(Bytes::copy_from_slice(&hash.raw))?;
            }

            // Signature operations
            OP_CHECKSIG | OP_CHECKSIGVERIFY => {
                let pubkey = self.main_stack.pop()?;
                let sig = self.main_stack.pop()?;

                if self.flags.strict_encoding {
                    check_signature_encoding(&sig)?;
                    check_pubkey_encoding(&pubkey)?;
                }

                let checker = checker.ok_or(Error::RequiresContext)?;
                let valid = checker.check_sig(&sig, &pubkey)?;

                if opcode == OP_CHECKSIG {
                    self.main_stack.push_bool(valid)?;
                } else if !valid {
                    return Err(Error::VerifyFailed);
                }
            }

            // Reserved operations
            OP_RESERVED | OP_VER | OP_VERIF | OP_VERNOTIF | OP_RESERVED1 | OP_RESERVED2 => {
                return Err(Error::ReservedOpcode(opcode));
            }

            // Disabled operations
            OP_CAT | OP_SPLIT | OP_NUM2BIN | OP_BIN2NUM | OP_INVERT | OP_AND | OP_OR | OP_XOR
            | OP_2MUL | OP_2DIV | OP_MUL | OP_DIV | OP_MOD | OP_LSHIFT | OP_RSHIFT => {
                return Err(Error::DisabledOpcode(opcode));
            }

            _ => return Err(Error::UnknownOpcode(opcode)),
        }

        Ok(())
    }

    /// Pop a stack index for OP_PICK and OP_ROLL. Negative values are invalid.
    fn pop_index(&mut self) -> Result<usize> {
        let n = self.pop_num()?;
        if n < 0 {
            return Err(Error::InvalidNumber);
        }
        Ok(n as usize)
    }

    /// Pop a numeric operand, honoring the minimal encoding flag.
    fn pop_num(&mut self) -> Result<i64> {
        self.main_stack.pop_int(self.flags.verify_minimal_push)
    }

    /// Check if the current branch is executing.
    fn executing(&self) -> bool {
        self.exec_stack.iter().all(|&b| b)
    }

    /// The main stack.
    pub fn main_stack(&self) -> &Stack {
        &self.main_stack
    }

    /// The alt stack.
    pub fn alt_stack(&self) -> &Stack {
        &self.alt_stack
    }

    /// The number of opcodes dispatched so far.
    ///
    /// Monotonically increasing across evaluations. A host that wants to bound execution can
    /// evaluate scripts piecewise and check this counter between them.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Check if the top of the main stack is true.
    pub fn stack_top_true(&self) -> bool {
        self.main_stack.top_true()
    }

    /// Clear the interpreter state. The flags and the step counter are retained.
    pub fn clear(&mut self) {
        self.main_stack.clear();
        self.alt_stack.clear();
        self.exec_stack.clear();
    }
}

/// Hash a stack cell with the digest algorithm `D` and return the digest as a new cell.
fn digest_cell<D: Digest>(data: &[u8]) -> Bytes {
    Bytes::copy_from_slice(&D::digest(data))
}

/// Is `data` pushed with the minimal possible opcode?
fn minimal_push(opcode: u8, data: &[u8]) -> bool {
    if data.is_empty() {
        // an empty push must use OP_0, which is not a pushdata opcode
        return false;
    }
    if data.len() == 1 && (1..=16).contains(&data[0]) {
        return false; // OP_1 .. OP_16
    }
    if data.len() == 1 && data[0] == 0x81 {
        return false; // OP_1NEGATE
    }
    if data.len() <= 0x4b {
        return opcode as usize == data.len();
    }
    if data.len() <= 0xff {
        return opcode == OP_PUSHDATA1;
    }
    if data.len() <= 0xffff {
        return opcode == OP_PUSHDATA2;
    }
    true
}

/// Verify an unlocking script against a locking script.
///
/// Runs both scripts on one interpreter and applies the conventional success predicate. The
/// clean stack requirement, when enabled, is only judged after the locking script has run.
pub fn verify_script(
    script_sig: &Script,
    script_pubkey: &Script,
    flags: VerifyFlags,
    checker: Option<&dyn SignatureChecker>,
) -> Result<bool> {
    let mut sig_flags = flags;
    sig_flags.require_clean_stack = false;

    let mut interpreter = ScriptInterpreter::with_flags(sig_flags);
    interpreter.eval_script_with_checker(script_sig, checker)?;
    interpreter.set_flags(flags);
    interpreter.eval_script_with_checker(script_pubkey, checker)?;

    Ok(interpreter.stack_top_true())
}
