#![no_main]

use btcscript::script::{Script, ScriptInterpreter, VerifyFlags};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Create a script from the fuzzer input
    let script = Script::new(bytes::Bytes::from(data.to_vec()));

    // Try to execute the script
    let mut interpreter = ScriptInterpreter::new();
    let _ = interpreter.eval_script(&script);

    // Also execute under the strict flags
    let mut strict = ScriptInterpreter::with_flags(VerifyFlags::strict());
    let _ = strict.eval_script(&script);

    // Test script size limits
    let _ = script.len();
});
