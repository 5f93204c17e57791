use proptest::prelude::*;

/// Identifier in the shape the contract compiler emits.
pub fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,10}(_[a-z][a-z0-9]{0,6})?"
}

pub fn generated_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["bigint", "boolean", "string", "Uint8Array", "[]"])
}

/// Render one circuit line as the compiler would.
pub fn circuit_line(name: &str, params: &[(String, &str)], returns: &str) -> String {
    let mut rendered = vec!["context: __compactRuntime.CircuitContext<T>".to_string()];
    rendered.extend(
        params
            .iter()
            .enumerate()
            .map(|(i, (param, ty))| format!("{}_{}: {}", param, i, ty)),
    );
    format!(
        "  {}({}): __compactRuntime.CircuitResults<T, {}>;",
        name,
        rendered.join(", "),
        returns
    )
}

pub fn interface(circuits: &[String]) -> String {
    format!(
        "export type Circuits<T> = {{\n{}\n}}\n\nexport type Ledger = {{\n  readonly round: bigint;\n}}\n",
        circuits.join("\n")
    )
}
