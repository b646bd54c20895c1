use mirror_config::MirrorConfig;
use mirror_model::{
    Annotation, AnnotationValue, Flags, MemoryModel, ModelProvider, TypeDescriptor, ValueGenerator,
};
use mirror_signature::{PrimitiveType, Signature};
use mirror_synth::{SynthesizedType, Synthesizer};
use pretty_assertions::assert_eq;

use super::fixtures::*;

fn synthesize(model: &MemoryModel, name: &str) -> SynthesizedType {
    let config = MirrorConfig::default();
    let synth = Synthesizer::new(model, &config);
    let ty = model.type_by_name(name).unwrap();
    synth.synthesize(ty, &synth.directive_for(ty)).unwrap()
}

fn method_names(ty: &SynthesizedType) -> Vec<&str> {
    ty.methods().iter().map(|m| m.name.as_str()).collect()
}

fn field_names(ty: &SynthesizedType) -> Vec<&str> {
    ty.fields().iter().map(|f| f.name.as_str()).collect()
}

fn body(ty: &SynthesizedType, method: &str) -> String {
    ty.method(method)
        .and_then(|m| m.body.as_ref())
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn long_column(name: &str) -> TypeDescriptor {
    public(name).with_super_class(class("ui.AbstractLongColumn"))
}

/// Abstract table field template with its own `Table` of two columns.
fn person_table_template() -> TypeDescriptor {
    TypeDescriptor::new("app.AbstractPersonTableField", Flags::PUBLIC | Flags::ABSTRACT)
        .with_super_class(Signature::generic(
            "ui.AbstractTableField",
            vec![class("app.AbstractPersonTableField$Table")],
        ))
        .with_annotation(form_data(
            Some("app.AbstractPersonTableFieldData"),
            Some("CREATE"),
            Some("CREATE"),
        ))
        .with_type(
            public("Table")
                .with_super_class(class("ui.AbstractTable"))
                .with_type(string_column("NameColumn"))
                .with_type(long_column("IdColumn")),
        )
}

/// Derived type of the template, as compiled from an earlier run.
fn person_table_data() -> TypeDescriptor {
    TypeDescriptor::new("app.AbstractPersonTableFieldData", Flags::PUBLIC | Flags::ABSTRACT)
        .with_super_class(class("ui.data.AbstractTableFieldBeanData"))
}

#[test]
fn table_field_gets_typed_row_accessors() {
    let model = model_with(vec![my_form()]);
    let data = synthesize(&model, "app.MyForm");
    let table = data.find_type("Table").unwrap();

    assert_eq!(table.qualified_name, "app.MyFormData$Table");
    assert_eq!(table.flags, Flags::PUBLIC | Flags::STATIC);
    assert_eq!(
        method_names(table),
        vec![
            "Table",
            "addRow",
            "addRow",
            "createRow",
            "getRowType",
            "getRows",
            "rowAt",
            "setRows",
        ]
    );

    let row = class("app.MyFormData$Table$TableRowData");
    let create_row = table.method("createRow").unwrap();
    assert_eq!(create_row.return_type, Some(row.clone()));
    assert_eq!(body(table, "createRow"), "return new TableRowData();");
    assert_eq!(body(table, "getRows"), "return (TableRowData[]) super.getRows();");
    assert_eq!(body(table, "getRowType"), "return TableRowData.class;");
    assert_eq!(
        table.method("getRowType").unwrap().return_type,
        Some(Signature::generic(
            "java.lang.Class",
            vec![Signature::wildcard_extends(class("ui.data.AbstractTableRowData"))]
        ))
    );

    let add_row: Vec<String> = table
        .methods_named("addRow")
        .map(|m| m.body.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(
        add_row,
        vec![
            "return (TableRowData) super.addRow();",
            "return (TableRowData) super.addRow(rowState);",
        ]
    );
    assert_eq!(
        body(table, "rowAt"),
        "return (TableRowData) super.rowAt(index);"
    );

    let set_rows = table.method("setRows").unwrap();
    assert!(set_rows.annotations.is_empty());
    assert_eq!(set_rows.parameters[0].signature, Signature::array(row, 1));
    assert_eq!(body(table, "setRows"), "super.setRows(rows);");
    for name in ["createRow", "getRowType", "getRows", "rowAt"] {
        let annotations: Vec<String> = table
            .method(name)
            .unwrap()
            .annotations
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(annotations, vec!["@Override"], "{name}");
    }
}

#[test]
fn row_data_holds_one_member_per_column() {
    let model = model_with(vec![my_form()]);
    let data = synthesize(&model, "app.MyForm");
    let rows = data.find_type("Table").unwrap().find_type("TableRowData").unwrap();

    assert_eq!(rows.qualified_name, "app.MyFormData$Table$TableRowData");
    assert_eq!(rows.flags, Flags::PUBLIC | Flags::STATIC);
    assert_eq!(rows.super_type, Some(class("ui.data.AbstractTableRowData")));
    assert_eq!(field_names(rows), vec!["serialVersionUID", "default_", "m_default"]);
    assert_eq!(method_names(rows), vec!["TableRowData", "getDefault", "setDefault"]);

    let constant = rows.field("default_").unwrap();
    assert_eq!(constant.flags, Flags::PUBLIC | Flags::STATIC | Flags::FINAL);
    assert_eq!(constant.signature, string());
    assert_eq!(constant.initializer, Some(ValueGenerator::Str("default".to_owned())));

    let member = rows.field("m_default").unwrap();
    assert_eq!(member.flags, Flags::PRIVATE);
    assert_eq!(member.signature, string());
    assert_eq!(member.initializer, None);

    assert_eq!(body(rows, "getDefault"), "return m_default;");
    let setter = rows.method("setDefault").unwrap();
    assert_eq!(setter.parameters[0].name, "newDefault");
    assert_eq!(setter.parameters[0].signature, string());
    assert_eq!(setter.return_type, Some(primitive(PrimitiveType::Void)));
    assert_eq!(body(rows, "setDefault"), "m_default = newDefault;");
}

#[test]
fn abstract_template_leaves_row_factory_abstract() {
    let model = model_with(vec![person_table_template()]);
    let data = synthesize(&model, "app.AbstractPersonTableField");

    assert_eq!(data.qualified_name, "app.AbstractPersonTableFieldData");
    assert_eq!(data.flags, Flags::PUBLIC | Flags::ABSTRACT);
    assert_eq!(data.super_type, Some(class("ui.data.AbstractTableFieldBeanData")));

    let create_row = data.method("createRow").unwrap();
    assert!(create_row.is_abstract());
    assert_eq!(create_row.body, None);

    let rows = data.find_type("AbstractPersonTableRowData").unwrap();
    assert_eq!(rows.flags, Flags::PUBLIC | Flags::STATIC | Flags::ABSTRACT);
    assert_eq!(
        field_names(rows),
        vec!["serialVersionUID", "id", "name", "m_id", "m_name"]
    );
    assert_eq!(rows.field("m_id").unwrap().signature, class("java.lang.Long"));
    assert_eq!(
        method_names(rows),
        vec!["AbstractPersonTableRowData", "getId", "getName", "setId", "setName"]
    );
}

#[test]
fn subclassed_table_extends_the_inherited_row_data() {
    let form = form("app.PersonForm", "app.PersonFormData").with_type(
        group_box("MainBox").with_type(
            public("PersonsField")
                .with_super_class(class("app.AbstractPersonTableField"))
                .with_type(
                    public("Table")
                        .with_super_class(class("app.AbstractPersonTableField$Table"))
                        .with_type(string_column("CityColumn")),
                ),
        ),
    );
    let model = model_with(vec![person_table_template(), person_table_data(), form]);
    let data = synthesize(&model, "app.PersonForm");

    let persons = data.find_type("Persons").unwrap();
    assert_eq!(persons.super_type, Some(class("app.AbstractPersonTableFieldData")));
    assert_eq!(body(persons, "createRow"), "return new PersonsRowData();");

    let rows = persons.find_type("PersonsRowData").unwrap();
    assert_eq!(
        rows.super_type,
        Some(class("app.AbstractPersonTableFieldData$AbstractPersonTableRowData"))
    );
    assert_eq!(field_names(rows), vec!["serialVersionUID", "city", "m_city"]);
}

#[test]
fn table_declared_only_by_the_super_class_is_used() {
    let form = form("app.StaffForm", "app.StaffFormData").with_type(
        public("StaffField").with_super_class(class("app.AbstractPersonTableField")),
    );
    let model = model_with(vec![person_table_template(), person_table_data(), form]);
    let data = synthesize(&model, "app.StaffForm");

    let staff = data.find_type("Staff").unwrap();
    let rows = staff.find_type("StaffRowData").unwrap();
    assert_eq!(field_names(rows), vec!["serialVersionUID", "id", "name", "m_id", "m_name"]);
    assert_eq!(rows.super_type, Some(class("ui.data.AbstractTableRowData")));
}

#[test]
fn ignored_columns_are_skipped() {
    let ignored = string_column("SecretColumn").with_annotation(
        Annotation::new("ui.dto.ColumnData").with_element(
            "value",
            AnnotationValue::enum_constant("ui.dto.ColumnData$SdkCommand", "IGNORE"),
        ),
    );
    let form = form("app.ColumnForm", "app.ColumnFormData").with_type(table_field(
        "app.ColumnForm$ItemsField",
        vec![string_column("LabelColumn"), ignored],
    ));
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.ColumnForm");

    let rows = data.find_type("Items").unwrap().find_type("ItemsRowData").unwrap();
    assert_eq!(field_names(rows), vec!["serialVersionUID", "label", "m_label"]);
}

#[test]
fn container_without_table_gets_row_fallbacks() {
    let form = form("app.EmptyForm", "app.EmptyFormData").with_type(
        public("EmptyTableField").with_super_class(Signature::generic(
            "ui.AbstractTableField",
            vec![class("ui.api.ITable")],
        )),
    );
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.EmptyForm");

    let empty = data.find_type("EmptyTable").unwrap();
    assert!(empty.types().is_empty());
    assert_eq!(method_names(empty), vec!["EmptyTable", "createRow", "getRowType"]);
    assert_eq!(
        empty.method("createRow").unwrap().return_type,
        Some(class("ui.data.AbstractTableRowData"))
    );
    assert_eq!(
        body(empty, "createRow"),
        "return new AbstractTableRowData(){ private static final long serialVersionUID = 1L; };"
    );
    assert_eq!(body(empty, "getRowType"), "return AbstractTableRowData.class;");
}

#[test]
fn table_extension_row_data_points_at_the_extended_rows() {
    let form = form("app.ExtensionForm", "app.ExtensionFormData")
        .with_type(group_box("MainBox").with_type(table_field(
            "app.ExtensionForm$MainBox$TableField",
            vec![string_column("DefaultColumn")],
        )))
        .with_type(
            public("PersonTableExtension")
                .with_interface(Signature::generic(
                    "ui.api.ITableExtension",
                    vec![class("app.ExtensionForm$MainBox$TableField$Table")],
                ))
                .with_type(string_column("NickNameColumn")),
        );
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.ExtensionForm");

    let rows = data.find_type("PersonTableExtensionRowData").unwrap();
    assert_eq!(rows.super_type, Some(class("ui.data.AbstractTableRowData")));
    assert_eq!(field_names(rows), vec!["serialVersionUID", "nickName", "m_nickName"]);
    assert_eq!(
        method_names(rows),
        vec!["PersonTableExtensionRowData", "getNickName", "setNickName"]
    );

    let extends = &rows.annotations[0];
    assert_eq!(extends.to_string(), "@Extends(TableRowData.class)");
    assert_eq!(
        extends.element("value"),
        Some(&ValueGenerator::TypeRef(class(
            "app.ExtensionFormData$Table$TableRowData"
        )))
    );
}
