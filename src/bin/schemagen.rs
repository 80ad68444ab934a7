//! Schema YAML Generator
//!
//! This binary prints the JSON schemas of the provider configuration and every declared
//! resource, as a multi-document YAML stream.
//!
//! Usage: cargo run --bin schemagen > schemas/all.yaml

use connect_resource_reconciler::resources::generate_schemas;

fn main() -> anyhow::Result<()> {
    for schema in generate_schemas()? {
        println!("---");
        print!("{}", schema);
    }
    Ok(())
}
