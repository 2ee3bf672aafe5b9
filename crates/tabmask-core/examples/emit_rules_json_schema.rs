use schemars::schema_for;
use tabmask_core::RuleSet;

fn main() {
    let schema = schema_for!(RuleSet);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
