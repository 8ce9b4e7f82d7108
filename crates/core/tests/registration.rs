use protoscope_api::{
    Definition, DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldType,
    FileDescriptorProto, FileDescriptorSet, ServiceDescriptorProto, SymbolKind,
};
use protoscope_core::{Context, ContextError};

fn names(ctx: &Context) -> Vec<String> {
    let mut names = Vec::new();
    ctx.enumerate(|name, _| names.push(name.to_string()));
    names.sort();
    names
}

fn shop_file() -> FileDescriptorProto {
    FileDescriptorProto::new("shop/order.proto", "shop")
        .with_message(
            DescriptorProto::new("Order")
                .with_field(FieldDescriptorProto::scalar("id", 1, FieldType::Int64))
                .with_field(
                    FieldDescriptorProto::named("items", 2, Some(FieldType::Message), "Item")
                        .repeated(),
                )
                .with_field(FieldDescriptorProto::named(
                    "status",
                    3,
                    Some(FieldType::Enum),
                    "Status",
                ))
                .with_nested(
                    DescriptorProto::new("Item")
                        .with_field(FieldDescriptorProto::scalar("sku", 1, FieldType::String)),
                )
                .with_enum(
                    EnumDescriptorProto::new("Status")
                        .with_value("PENDING", 0)
                        .with_value("SHIPPED", 1),
                ),
        )
        .with_service(ServiceDescriptorProto::new("OrderService").with_method(
            "Get",
            "Order",
            ".shop.Order",
        ))
}

#[test]
fn test_nested_names_are_qualified() {
    let ctx = Context::new();
    let report = ctx
        .add_definitions(&FileDescriptorSet::new(vec![shop_file()]))
        .unwrap();

    assert_eq!(report.files, 1);
    assert_eq!(report.messages, 2);
    assert_eq!(report.enums, 1);
    assert_eq!(report.services, 1);
    assert_eq!(report.symbols(), 4);
    assert_eq!(
        names(&ctx),
        vec![
            "shop.Order",
            "shop.Order.Item",
            "shop.Order.Status",
            "shop.OrderService"
        ]
    );

    let order = ctx.lookup("shop.Order").unwrap();
    assert_eq!(order.kind(), SymbolKind::Message);
    let order = order.as_message().unwrap();
    assert_eq!(order.file, "shop/order.proto");
    assert_eq!(order.nested_types, vec!["shop.Order.Item"]);
    assert_eq!(order.nested_enums, vec!["shop.Order.Status"]);
}

#[test]
fn test_field_and_method_types_are_resolved() {
    let ctx = Context::new();
    ctx.add_definitions(&FileDescriptorSet::new(vec![shop_file()]))
        .unwrap();

    let order = ctx.lookup("shop.Order").unwrap();
    let order = order.as_message().unwrap();
    let items = order.field_by_name("items").unwrap();
    assert_eq!(items.type_name.as_deref(), Some("shop.Order.Item"));
    assert!(items.is_repeated());
    assert_eq!(
        order.field_by_number(3).unwrap().type_name.as_deref(),
        Some("shop.Order.Status")
    );
    assert_eq!(order.field_by_name("id").unwrap().type_name, None);

    let service = ctx.lookup("shop.OrderService").unwrap();
    let get = service.as_service().unwrap().method("Get").unwrap();
    assert_eq!(get.input_type, "shop.Order");
    assert_eq!(get.output_type, "shop.Order");
}

#[test]
fn test_missing_field_type_is_inferred() {
    let ctx = Context::new();
    let file = FileDescriptorProto::new("a.proto", "a")
        .with_enum(EnumDescriptorProto::new("Color").with_value("RED", 0))
        .with_message(
            DescriptorProto::new("Paint")
                .with_field(FieldDescriptorProto::named("color", 1, None, "Color"))
                .with_field(FieldDescriptorProto::named("next", 2, None, "Paint")),
        );
    ctx.add_definitions(&FileDescriptorSet::new(vec![file]))
        .unwrap();

    let paint = ctx.lookup("a.Paint").unwrap();
    let paint = paint.as_message().unwrap();
    assert_eq!(
        paint.field_by_name("color").unwrap().field_type,
        FieldType::Enum
    );
    assert_eq!(
        paint.field_by_name("next").unwrap().field_type,
        FieldType::Message
    );
}

#[test]
fn test_extensions_are_named_by_scope() {
    let ctx = Context::new();
    let file = FileDescriptorProto::new("ext.proto", "ext")
        .with_message(
            DescriptorProto::new("Base").with_extension(
                FieldDescriptorProto::scalar("inner_tag", 101, FieldType::String)
                    .extending("Base"),
            ),
        )
        .with_extension(FieldDescriptorProto::scalar("tag", 100, FieldType::Int32).extending("Base"));

    let report = ctx
        .add_definitions(&FileDescriptorSet::new(vec![file]))
        .unwrap();
    assert_eq!(report.extensions, 2);

    let tag = ctx.lookup("ext.tag").unwrap();
    assert_eq!(tag.kind(), SymbolKind::Extension);
    let tag = tag.as_extension().unwrap();
    assert!(tag.is_extension());
    assert_eq!(tag.extendee.as_deref(), Some("ext.Base"));
    assert_eq!(tag.name(), "tag");

    let inner = ctx.lookup("ext.Base.inner_tag").unwrap();
    assert_eq!(
        inner.as_extension().unwrap().extendee.as_deref(),
        Some("ext.Base")
    );
}

#[test]
fn test_forward_references_within_a_batch() {
    let ctx = Context::new();
    let user = FileDescriptorProto::new("user.proto", "app").with_message(
        DescriptorProto::new("User").with_field(FieldDescriptorProto::named(
            "address",
            1,
            Some(FieldType::Message),
            "Address",
        )),
    );
    let address = FileDescriptorProto::new("address.proto", "app")
        .with_message(DescriptorProto::new("Address"));

    ctx.add_definitions(&FileDescriptorSet::new(vec![user, address]))
        .unwrap();
    assert!(ctx.lookup("app.User").is_some());
    assert!(ctx.lookup("app.Address").is_some());
}

#[test]
fn test_later_batches_see_earlier_ones() {
    let ctx = Context::new();
    ctx.add_definitions(&FileDescriptorSet::new(vec![
        FileDescriptorProto::new("common.proto", "common").with_message(DescriptorProto::new("Id")),
    ]))
    .unwrap();

    let report = ctx
        .add_definitions(&FileDescriptorSet::new(vec![
            FileDescriptorProto::new("app.proto", "app").with_message(
                DescriptorProto::new("Thing").with_field(FieldDescriptorProto::named(
                    "id",
                    1,
                    Some(FieldType::Message),
                    ".common.Id",
                )),
            ),
        ]))
        .unwrap();
    assert_eq!(report.messages, 1);
    assert_eq!(ctx.len(), 2);
}

#[test]
fn test_duplicate_against_committed_rejects_whole_batch() {
    let ctx = Context::new();
    ctx.add_definitions(&FileDescriptorSet::new(vec![shop_file()]))
        .unwrap();
    let before = names(&ctx);

    let again = FileDescriptorProto::new("other.proto", "shop")
        .with_message(DescriptorProto::new("Fresh"))
        .with_message(DescriptorProto::new("Order"));
    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![again]))
        .unwrap_err();

    match err {
        ContextError::DuplicateDefinition { name } => assert_eq!(name, "shop.Order"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(names(&ctx), before);
    assert!(ctx.lookup("shop.Fresh").is_none());
}

#[test]
fn test_committed_entries_never_change() {
    let ctx = Context::new();
    let first = FileDescriptorProto::new("a.proto", "p").with_message(DescriptorProto::new("A"));
    ctx.add_definitions(&FileDescriptorSet::new(vec![first]))
        .unwrap();
    let original = ctx.lookup("p.A").unwrap();

    let later = FileDescriptorProto::new("b.proto", "p").with_message(
        DescriptorProto::new("B").with_field(FieldDescriptorProto::named(
            "a",
            1,
            Some(FieldType::Message),
            "A",
        )),
    );
    ctx.add_definitions(&FileDescriptorSet::new(vec![later]))
        .unwrap();

    let clash = FileDescriptorProto::new("c.proto", "p")
        .with_message(DescriptorProto::new("C"))
        .with_enum(EnumDescriptorProto::new("A"));
    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![clash]))
        .unwrap_err();
    assert_eq!(err.code(), "duplicate_definition");

    let current = ctx.lookup("p.A").unwrap();
    assert!(original.same_definition(&current));
    assert_eq!(current.kind(), SymbolKind::Message);
    assert_eq!(names(&ctx), vec!["p.A", "p.B"]);
}

#[test]
fn test_duplicate_within_batch() {
    let ctx = Context::new();
    let a = FileDescriptorProto::new("a.proto", "p").with_message(DescriptorProto::new("M"));
    let b = FileDescriptorProto::new("b.proto", "p").with_enum(EnumDescriptorProto::new("M"));

    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![a, b]))
        .unwrap_err();
    assert_eq!(err.code(), "duplicate_definition");
    assert!(ctx.is_empty());
}

#[test]
fn test_unresolved_reference_rejects_whole_batch() {
    let ctx = Context::new();
    let good = FileDescriptorProto::new("good.proto", "p").with_message(DescriptorProto::new("Ok"));
    let bad = FileDescriptorProto::new("bad.proto", "p").with_message(
        DescriptorProto::new("Broken").with_field(FieldDescriptorProto::named(
            "missing",
            1,
            Some(FieldType::Message),
            "DoesNotExist",
        )),
    );

    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![good, bad]))
        .unwrap_err();
    match err {
        ContextError::UnresolvedReference {
            referrer,
            reference,
        } => {
            assert_eq!(referrer, "p.Broken.missing");
            assert_eq!(reference, "DoesNotExist");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ctx.lookup("p.Ok").is_none());
    assert!(ctx.is_empty());
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let ctx = Context::new();
    let file = FileDescriptorProto::new("k.proto", "k")
        .with_message(DescriptorProto::new("Msg"))
        .with_message(DescriptorProto::new("Holder").with_field(FieldDescriptorProto::named(
            "e",
            1,
            Some(FieldType::Enum),
            "Msg",
        )));

    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![file]))
        .unwrap_err();
    match err {
        ContextError::KindMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, "enum");
            assert_eq!(found, SymbolKind::Message);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ctx.is_empty());
}

#[test]
fn test_method_types_must_be_messages() {
    let ctx = Context::new();
    let file = FileDescriptorProto::new("svc.proto", "svc")
        .with_enum(EnumDescriptorProto::new("Code"))
        .with_message(DescriptorProto::new("Req"))
        .with_service(ServiceDescriptorProto::new("Api").with_method("Call", "Req", "Code"));

    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![file]))
        .unwrap_err();
    assert_eq!(err.code(), "kind_mismatch");
}

#[test]
fn test_unnamed_definitions_are_invalid() {
    let ctx = Context::new();
    let file = FileDescriptorProto::new("x.proto", "x").with_message(DescriptorProto::default());
    let err = ctx
        .add_definitions(&FileDescriptorSet::new(vec![file]))
        .unwrap_err();
    assert!(matches!(err, ContextError::InvalidDescriptor(_)));
}

#[test]
fn test_empty_batch_is_accepted() {
    let ctx = Context::new();
    let report = ctx.add_definitions(&FileDescriptorSet::default()).unwrap();
    assert_eq!(report.symbols(), 0);
    assert!(ctx.is_empty());
}
