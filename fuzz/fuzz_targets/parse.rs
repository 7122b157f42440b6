#![no_main]

use libfuzzer_sys::fuzz_target;
use quill::ParseMode;
use quill::frontend::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Single-file parse against the builtin operator table
        if let Ok(tokens) = lexer::lex(s) {
            let _ = parser::parse(&tokens);
        }
        // Full buffer pipeline, including the local fixity pass
        let _ = quill::parse_from("Fuzz", s.as_bytes(), ParseMode::FULL_PARSE);
    }
});
