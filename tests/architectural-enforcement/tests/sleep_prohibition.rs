//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Timers wait on
//! a deadline (`sleep_until`) computed by the overlay state machine, and
//! everything else waits on I/O or channels.
//! **Exceptions**: test code

use architectural_enforcement::{code_part, production_sources};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE:");
        eprintln!("  - tokio::time::sleep_until(deadline) driven by LoadingMask::next_deadline()");
        eprintln!("  - Test code (#[cfg(test)] modules, tests/ directories)");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for file in production_sources() {
        for (line_number, line) in file.production_lines() {
            let code = code_part(line);
            if code.contains("::sleep(") || code.contains(".sleep(") {
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
