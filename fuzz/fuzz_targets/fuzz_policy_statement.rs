//! Structure-aware fuzz target for bucket policy documents.
//!
//! Builds syntactically valid JSON with arbitrary principal, action, and condition
//! shapes so the fuzzer spends its time in statement normalisation instead of the
//! JSON tokenizer.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_statement
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{json, Value};

#[derive(Arbitrary, Debug)]
enum PrincipalShape {
    Missing,
    Star,
    Plain(String),
    Aws(Vec<String>),
    AwsStar,
    Service(String),
    Number(i64),
}

#[derive(Arbitrary, Debug)]
struct FuzzStatement {
    sid: Option<String>,
    effect: u8,
    principal: PrincipalShape,
    actions: Vec<String>,
    single_action: bool,
    condition: Option<String>,
}

#[derive(Arbitrary, Debug)]
struct FuzzPolicy {
    statements: Vec<FuzzStatement>,
    single_statement: bool,
    wrapped_as_string: bool,
}

fn principal_value(shape: &PrincipalShape) -> Option<Value> {
    match shape {
        PrincipalShape::Missing => None,
        PrincipalShape::Star => Some(json!("*")),
        PrincipalShape::Plain(s) => Some(json!(s)),
        PrincipalShape::Aws(list) => Some(json!({ "AWS": list })),
        PrincipalShape::AwsStar => Some(json!({ "AWS": ["arn:aws:iam::111122223333:root", "*"] })),
        PrincipalShape::Service(s) => Some(json!({ "Service": s })),
        PrincipalShape::Number(n) => Some(json!(n)),
    }
}

fn statement_value(stmt: &FuzzStatement) -> Value {
    let mut obj = serde_json::Map::new();
    if let Some(sid) = &stmt.sid {
        obj.insert("Sid".into(), json!(sid));
    }
    let effect = match stmt.effect % 3 {
        0 => "Allow",
        1 => "Deny",
        _ => "Audit",
    };
    obj.insert("Effect".into(), json!(effect));
    if let Some(principal) = principal_value(&stmt.principal) {
        obj.insert("Principal".into(), principal);
    }
    let action = match (stmt.single_action, stmt.actions.first()) {
        (true, Some(first)) => json!(first),
        _ => json!(stmt.actions),
    };
    obj.insert("Action".into(), action);
    if let Some(key) = &stmt.condition {
        let mut operands = serde_json::Map::new();
        operands.insert(key.clone(), json!("x"));
        obj.insert("Condition".into(), json!({ "StringEquals": operands }));
    }
    Value::Object(obj)
}

fuzz_target!(|policy: FuzzPolicy| {
    let statements: Vec<Value> = policy.statements.iter().map(statement_value).collect();
    let statement = match (policy.single_statement, statements.first()) {
        (true, Some(first)) => first.clone(),
        _ => Value::Array(statements),
    };
    let document = json!({ "Version": "2012-10-17", "Statement": statement });

    let text = if policy.wrapped_as_string {
        json!({ "Policy": document.to_string() }).to_string()
    } else {
        document.to_string()
    };

    let _ = bucketguard_inventory::fuzz::parse_policy(&text);
});
