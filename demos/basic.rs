//! Validates a small sign-up form and prints every failure
//!
//! Run with: cargo run --example basic

use rulebook::{Engine, Entry, RuleSpec};
use serde_json::json;

fn main() {
    let engine = Engine::new();

    // Dynamic input, e.g. straight from a request body
    let form = json!([
        { "value": "jane@example", "rules": { "isEmail": { "msg": "Enter a valid email" } }, "name": "Email" },
        { "value": "hunter2", "rules": { "len": { "args": [8, 64], "msg": "Password needs 8 to 64 characters" } } },
        { "value": null, "rules": { "optional": ["isURL"] } },
    ]);

    match engine.validate_all(&form) {
        Ok(result) if result.is_valid() => println!("Form is valid"),
        Ok(result) => {
            for (key, rule, item) in result.failures() {
                println!("entry {key}, rule {rule}: {}", item.message());
            }
        }
        Err(e) => eprintln!("Bad rule configuration: {e}"),
    }

    // The same checks with typed entries
    let entries = [
        Entry::new("jane@example.com").rule("isEmail", true).named("Email"),
        Entry::new(21).rule("min", RuleSpec::args(18).with_message("Must be 18 or older")),
    ];
    match engine.validate_entries(&entries) {
        Ok(result) => println!("Typed entries valid: {}", result.is_valid()),
        Err(e) => eprintln!("Bad rule configuration: {e}"),
    }
}
