//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async code in production MUST NOT use blocking I/O.
//! **Required**: `tokio::process`, `tokio::io`, `tokio::fs` inside async fns
//! **Acceptable**: non-async functions that run before the runtime needs to
//! stay responsive (config loading, log file setup)

use architectural_enforcement::{code_part, production_sources};

const FORBIDDEN: &[&str] = &[
    "std::fs::",
    "std::net::",
    "std::process::Command",
    "std::thread::sleep",
    ".read_line(",
];

/// Test that async production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_async_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking I/O calls found in async code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ REQUIRED async I/O:");
        eprintln!("  - tokio::process::Command for child processes");
        eprintln!("  - tokio::io::AsyncBufReadExt for reading their output");

        panic!(
            "\nFound {} blocking I/O violation(s) in async code.\nFix these before merging!",
            violations.len()
        );
    }
}

fn find_blocking_io_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for file in production_sources() {
        for (line_number, line) in file.production_lines() {
            let code = code_part(line);
            if code.trim_start().starts_with("use ") {
                continue;
            }
            if FORBIDDEN.iter().any(|pattern| code.contains(pattern))
                && file.in_async_fn(line_number)
            {
                violations.push(format!(
                    "{}:{} - {}",
                    file.path.display(),
                    line_number,
                    line.trim()
                ));
            }
        }
    }

    violations
}
