use crate::symbols::SymbolRow;
use protoscope_core::Context;

pub(crate) fn run(ctx: &Context, base: &str, reference: &str, json: bool) -> anyhow::Result<()> {
    let Some(entry) = ctx.resolve(base, reference) else {
        anyhow::bail!("'{}' does not resolve from '{}'", reference, base);
    };

    let row = SymbolRow::new(entry.full_name(), &entry);
    if json {
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        println!("{} ({}) {}", row.name, row.kind, row.detail);
    }
    Ok(())
}
