use mirror_model::{
    Flags, MemoryModel, MethodDescriptor, ModelProvider, TypeDescriptor, TypeParameter,
};
use mirror_resolve::GenericResolver;
use mirror_signature::Signature;
use pretty_assertions::assert_eq;

/// `app.PersonField extends AbstractListField<Person, Long>` with
/// `AbstractListField<E, ID> extends AbstractValueField<List<E>>`.
fn field_model() -> MemoryModel {
    let mut model = MemoryModel::new();
    model
        .add_type(
            TypeDescriptor::new("lib.AbstractValueField", Flags::PUBLIC | Flags::ABSTRACT)
                .with_type_parameter(TypeParameter::new("VALUE"))
                .with_method(
                    MethodDescriptor::new("setValue", Flags::PUBLIC, Signature::parse("V").unwrap())
                        .with_parameter("value", Signature::type_var("VALUE")),
                )
                .with_method(MethodDescriptor::new(
                    "getValue",
                    Flags::PUBLIC,
                    Signature::type_var("VALUE"),
                )),
        )
        .unwrap();
    model
        .add_type(
            TypeDescriptor::new("lib.AbstractListField", Flags::PUBLIC | Flags::ABSTRACT)
                .with_type_parameter(TypeParameter::new("E"))
                .with_type_parameter(TypeParameter::new("ID"))
                .with_super_class(Signature::generic(
                    "lib.AbstractValueField",
                    vec![Signature::generic(
                        "java.util.List",
                        vec![Signature::type_var("E")],
                    )],
                ))
                .with_method(
                    MethodDescriptor::new("select", Flags::PUBLIC, Signature::parse("V").unwrap())
                        .with_parameter("ids", Signature::vararg(Signature::type_var("ID"))),
                ),
        )
        .unwrap();
    model
        .add_type(TypeDescriptor::new("app.Person", Flags::PUBLIC))
        .unwrap();
    model
        .add_type(
            TypeDescriptor::new("app.PersonField", Flags::PUBLIC).with_super_class(
                Signature::parse("QAbstractListField<QPerson;QLong;>;").unwrap(),
            ),
        )
        .unwrap();
    model.add_import("app.PersonField", "lib.AbstractListField");
    model
}

#[test]
fn unresolved_super_names_are_qualified_in_subtype_scope() {
    let model = field_model();
    let resolver = GenericResolver::new(&model);
    let field = model.type_by_name("app.PersonField").unwrap();

    let list = resolver.resolve_for(field, &[], "lib.AbstractListField");
    assert_eq!(list.get("E"), Some(&Signature::class("app.Person")));
    assert_eq!(list.get("ID"), Some(&Signature::class("java.lang.Long")));

    assert_eq!(
        resolver.resolve_type_parameter(field, "lib.AbstractValueField", "VALUE"),
        Some(Signature::generic(
            "java.util.List",
            vec![Signature::class("app.Person")]
        ))
    );
}

#[test]
fn member_signatures_resolve_against_context() {
    let model = field_model();
    let resolver = GenericResolver::new(&model);
    let field = model.type_by_name("app.PersonField").unwrap();
    let value_field = model.type_by_name("lib.AbstractValueField").unwrap();
    let list_field = model.type_by_name("lib.AbstractListField").unwrap();

    let get_value = value_field.method("getValue").unwrap();
    assert_eq!(
        resolver
            .return_type(get_value, "lib.AbstractValueField", field)
            .to_string(),
        "java.util.List<app.Person>"
    );

    let set_value = value_field.method("setValue").unwrap();
    assert_eq!(
        resolver.method_parameter_signatures(set_value, "lib.AbstractValueField", field),
        vec![Signature::generic(
            "java.util.List",
            vec![Signature::class("app.Person")]
        )]
    );

    let select = list_field.method("select").unwrap();
    assert_eq!(
        resolver.method_parameter_signatures(select, "lib.AbstractListField", field),
        vec![Signature::vararg(Signature::class("java.lang.Long"))]
    );

    let array = Signature::array(Signature::type_var("E"), 2);
    assert_eq!(
        resolver
            .resolved_signature(&array, "lib.AbstractListField", field)
            .encode(),
        "[[Lapp.Person;"
    );
}

#[test]
fn unknown_type_variable_stays_unresolved() {
    let model = field_model();
    let resolver = GenericResolver::new(&model);
    let field = model.type_by_name("app.PersonField").unwrap();

    let sig = Signature::generic("java.util.Map", vec![Signature::type_var("NOPE")]);
    assert_eq!(
        resolver.resolved_signature(&sig, "lib.AbstractListField", field),
        sig
    );
    assert_eq!(
        resolver.resolve_type_parameter(field, "lib.AbstractListField", "NOPE"),
        None
    );
}

#[test]
fn instance_of_and_super_class_chain() {
    let model = field_model();
    let resolver = GenericResolver::new(&model);
    let field = model.type_by_name("app.PersonField").unwrap();

    assert!(resolver.is_instance_of(field, "app.PersonField"));
    assert!(resolver.is_instance_of(field, "lib.AbstractValueField"));
    assert!(!resolver.is_instance_of(field, "app.Person"));

    let chain: Vec<&str> = resolver
        .super_classes(field)
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(chain, vec!["lib.AbstractListField", "lib.AbstractValueField"]);
}
