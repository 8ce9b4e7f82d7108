use protoscope_api::SymbolKind;
use protoscope_core::{Context, SymbolEntry};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Serialize, Tabled)]
pub(crate) struct SymbolRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: SymbolKind,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl SymbolRow {
    pub(crate) fn new(name: &str, entry: &SymbolEntry) -> Self {
        let detail = match entry {
            SymbolEntry::Message(def) => format!("{} ({} fields)", def.file, def.fields.len()),
            SymbolEntry::Enum(def) => format!("{} ({} values)", def.file, def.values.len()),
            SymbolEntry::Service(def) => format!("{} ({} methods)", def.file, def.methods.len()),
            SymbolEntry::Extension(def) => match &def.extendee {
                Some(extendee) => format!("extends {} = {}", extendee, def.number),
                None => def.number.to_string(),
            },
        };
        Self {
            name: name.to_string(),
            kind: entry.kind(),
            detail,
        }
    }
}

/// Snapshot of the public table, sorted by name.
pub(crate) fn collect(ctx: &Context, kind: Option<SymbolKind>) -> Vec<SymbolRow> {
    let mut rows = Vec::new();
    ctx.enumerate(|name, entry| {
        if kind.is_none_or(|k| k == entry.kind()) {
            rows.push(SymbolRow::new(name, entry));
        }
    });
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

pub(crate) fn run(ctx: &Context, kind: Option<SymbolKind>, json: bool) -> anyhow::Result<()> {
    let rows = collect(ctx, kind);
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("No symbols found.");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoscope_api::{
        DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldType,
        FileDescriptorProto, FileDescriptorSet,
    };

    fn context() -> Context {
        let ctx = Context::new();
        let file = FileDescriptorProto::new("demo.proto", "demo")
            .with_message(
                DescriptorProto::new("Msg")
                    .with_field(FieldDescriptorProto::scalar("id", 1, FieldType::Int32)),
            )
            .with_enum(EnumDescriptorProto::new("Mode").with_value("OFF", 0))
            .with_extension(
                FieldDescriptorProto::scalar("note", 50, FieldType::String).extending("Msg"),
            );
        ctx.add_definitions(&FileDescriptorSet::new(vec![file]))
            .unwrap();
        ctx
    }

    #[test]
    fn rows_are_sorted_and_filtered() {
        let ctx = context();
        let names: Vec<_> = collect(&ctx, None).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["demo.Mode", "demo.Msg", "demo.note"]);

        let enums = collect(&ctx, Some(SymbolKind::Enum));
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].detail, "demo.proto (1 values)");
    }

    #[test]
    fn extension_detail_names_the_extendee() {
        let ctx = context();
        let rows = collect(&ctx, Some(SymbolKind::Extension));
        assert_eq!(rows[0].detail, "extends demo.Msg = 50");
    }

    #[test]
    fn rows_serialize_with_lowercase_kinds() {
        let ctx = context();
        let json = serde_json::to_value(collect(&ctx, Some(SymbolKind::Message))).unwrap();
        assert_eq!(json[0]["kind"], "message");
        assert_eq!(json[0]["name"], "demo.Msg");
    }
}
