use mirror_config::MirrorConfig;
use mirror_model::{
    Annotation, AnnotationValue, Flags, MethodDescriptor, ModelProvider, TypeDescriptor,
    ValueGenerator,
};
use mirror_signature::{PrimitiveType, Signature};
use mirror_synth::{
    Counts, DirectiveSource, InclusionDirective, InclusionPolicy, SynthError, SynthesizedType,
    Synthesizer, GENERATED_COMMENT,
};
use pretty_assertions::assert_eq;

use super::fixtures::*;

fn synthesize(model: &mirror_model::MemoryModel, name: &str) -> SynthesizedType {
    let config = MirrorConfig::default();
    let synth = Synthesizer::new(model, &config);
    let ty = model.type_by_name(name).unwrap();
    synth.synthesize(ty, &synth.directive_for(ty)).unwrap()
}

fn method_names(ty: &SynthesizedType) -> Vec<&str> {
    ty.methods().iter().map(|m| m.name.as_str()).collect()
}

fn type_names(ty: &SynthesizedType) -> Vec<&str> {
    ty.types().iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn form_with_value_field_and_table_field() {
    let model = model_with(vec![my_form()]);
    let data = synthesize(&model, "app.MyForm");

    assert_eq!(data.qualified_name, "app.MyFormData");
    assert_eq!(data.flags, Flags::PUBLIC);
    assert_eq!(data.super_type, Some(class("ui.data.AbstractFormData")));
    assert_eq!(data.comment.as_deref(), Some(GENERATED_COMMENT));
    assert_eq!(
        data.annotations[0].to_string(),
        "@Generated(value = \"app.MyForm\", comments = \"This class is auto generated. No manual modifications recommended.\")"
    );
    assert_eq!(
        data.counts(),
        Counts {
            fields: 1,
            methods: 3,
            types: 2
        }
    );
    assert_eq!(method_names(&data), vec!["MyFormData", "getMyMaster", "getTable"]);
    assert_eq!(type_names(&data), vec!["MyMaster", "Table"]);

    let serial = data.field("serialVersionUID").unwrap();
    assert_eq!(serial.flags.bits(), 26);
    assert_eq!(serial.signature, primitive(PrimitiveType::Long));
    assert_eq!(serial.initializer, Some(ValueGenerator::Long(1)));

    let constructor = data.method("MyFormData").unwrap();
    assert!(constructor.is_constructor());

    let getter = data.method("getMyMaster").unwrap();
    assert_eq!(getter.return_type, Some(class("app.MyFormData$MyMaster")));
    assert_eq!(
        getter.body.as_ref().unwrap().to_string(),
        "return getFieldByClass(MyMaster.class);"
    );

    let my_master = data.find_type("MyMaster").unwrap();
    assert_eq!(my_master.qualified_name, "app.MyFormData$MyMaster");
    assert_eq!(my_master.flags.bits(), 9);
    assert_eq!(
        my_master.super_type,
        Some(Signature::generic("ui.data.AbstractValueFieldData", vec![string()]))
    );
    assert_eq!(
        my_master.counts(),
        Counts {
            fields: 1,
            methods: 1,
            types: 0
        }
    );
    assert!(my_master.field("serialVersionUID").is_some());
    assert_eq!(my_master.comment, None);

    let table = data.find_type("Table").unwrap();
    assert_eq!(table.super_type, Some(class("ui.data.AbstractTableFieldBeanData")));
    let rows = table.find_type("TableRowData").unwrap();
    let fields: Vec<&str> = rows.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["serialVersionUID", "default_", "m_default"]);
    assert_eq!(method_names(rows), vec!["TableRowData", "getDefault", "setDefault"]);
}

#[test]
fn synthesis_is_idempotent() {
    let model = model_with(vec![my_form()]);
    let config = MirrorConfig::default();
    let form = model.type_by_name("app.MyForm").unwrap();

    let synth = Synthesizer::new(&model, &config);
    let directive = synth.directive_for(form);
    let first = synth.synthesize(form, &directive).unwrap();
    let second = synth.synthesize(form, &directive).unwrap();
    assert_eq!(first, second);

    let fresh = Synthesizer::new(&model, &config);
    assert_eq!(first, fresh.synthesize(form, &directive).unwrap());
}

#[test]
fn value_field_generic_ordinal_uses_the_bound_value() {
    let model = model_with(vec![form("app.CountForm", "app.CountFormData").with_type(
        public("CountField").with_super_class(class("ui.AbstractIntegerField")),
    )]);
    let data = synthesize(&model, "app.CountForm");
    assert_eq!(
        data.find_type("Count").unwrap().super_type,
        Some(Signature::generic(
            "ui.data.AbstractValueFieldData",
            vec![class("java.lang.Integer")]
        ))
    );
}

#[test]
fn properties_are_promoted_when_both_accessors_are_marked() {
    let form = form("app.PropForm", "app.PropFormData");
    let form = property(form, "Active", primitive(PrimitiveType::Boolean));
    let form = property(form, "Count", primitive(PrimitiveType::Int));
    let form = property(form, "Label", string());
    let form = form
        .with_method(
            MethodDescriptor::new("getSkipped", Flags::PUBLIC, string())
                .with_annotation(Annotation::new(FORM_DATA)),
        )
        .with_method(
            MethodDescriptor::new("setSkipped", Flags::PUBLIC, primitive(PrimitiveType::Void))
                .with_parameter("value", string()),
        );
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.PropForm");

    assert_eq!(
        method_names(&data),
        vec![
            "PropFormData",
            "getActiveProperty",
            "getCount",
            "getCountProperty",
            "getLabel",
            "getLabelProperty",
            "isActive",
            "setActive",
            "setCount",
            "setLabel",
        ]
    );
    assert_eq!(
        type_names(&data),
        vec!["ActiveProperty", "CountProperty", "LabelProperty"]
    );

    let holder = data.find_type("ActiveProperty").unwrap();
    assert_eq!(holder.flags, Flags::PUBLIC | Flags::STATIC);
    assert_eq!(
        holder.super_type,
        Some(Signature::generic(
            "ui.data.AbstractPropertyData",
            vec![class("java.lang.Boolean")]
        ))
    );
    assert!(holder.field("serialVersionUID").is_some());

    let body = |name: &str| data.method(name).unwrap().body.as_ref().unwrap().to_string();
    assert_eq!(
        body("getActiveProperty"),
        "return getPropertyByClass(ActiveProperty.class);"
    );
    assert_eq!(
        body("isActive"),
        "return (getActiveProperty().getValue() == null) ? (false) : (getActiveProperty().getValue());"
    );
    assert_eq!(
        body("getCount"),
        "return (getCountProperty().getValue() == null) ? (0) : (getCountProperty().getValue());"
    );
    assert_eq!(body("getLabel"), "return getLabelProperty().getValue();");
    assert_eq!(body("setCount"), "getCountProperty().setValue(count);");

    let is_active = data.method("isActive").unwrap();
    assert_eq!(is_active.return_type, Some(primitive(PrimitiveType::Boolean)));
    assert_eq!(
        is_active.comment.as_deref(),
        Some("access method for property Active.")
    );
    let set_count = data.method("setCount").unwrap();
    assert_eq!(set_count.parameters[0].name, "count");
    assert_eq!(set_count.parameters[0].signature, primitive(PrimitiveType::Int));
}

#[test]
fn property_and_field_with_the_same_name_are_flagged() {
    let form = property(form("app.ClashForm", "app.ClashFormData"), "MyMaster", string())
        .with_type(group_box("MainBox").with_type(string_field("MyMasterField")));
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.ClashForm");

    let my_master = data.find_type("MyMaster").unwrap();
    assert_eq!(
        my_master.comment.as_deref(),
        Some("TODO [everyone] Duplicate names 'MyMaster'. Rename property or form field.")
    );
    assert!(data.find_type("MyMasterProperty").unwrap().comment.is_none());
}

#[test]
fn ignored_members_leave_no_trace() {
    let ignore = || form_data(None, Some("IGNORE"), None);
    let form = form("app.IgnoreForm", "app.IgnoreFormData").with_type(
        group_box("MainBox")
            .with_type(string_field("VisibleField"))
            .with_type(string_field("SecretField").with_annotation(ignore()))
            .with_type(
                group_box("IgnoredBox")
                    .with_annotation(ignore())
                    .with_type(string_field("HiddenField"))
                    .with_type(table_field(
                        "app.IgnoreForm$MainBox$IgnoredBox$ListField",
                        vec![string_column("NameColumn")],
                    ))
                    .with_type(
                        public("ListExtension")
                            .with_interface(Signature::generic(
                                "ui.api.ITableExtension",
                                vec![class("app.IgnoreForm$MainBox$IgnoredBox$ListField$Table")],
                            ))
                            .with_type(string_column("ExtraColumn")),
                    ),
            ),
    );
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.IgnoreForm");

    let all: Vec<&str> = data.walk().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(all, vec!["IgnoreFormData", "Visible"]);
    assert_eq!(method_names(&data), vec!["IgnoreFormData", "getVisible"]);
}

#[test]
fn composite_templates_get_their_own_unit() {
    let template = TypeDescriptor::new("app.AbstractAddressBox", Flags::PUBLIC | Flags::ABSTRACT)
        .with_super_class(class("ui.AbstractGroupBox"))
        .with_annotation(form_data(
            Some("app.AbstractAddressBoxData"),
            Some("CREATE"),
            Some("CREATE"),
        ))
        .with_type(string_field("StreetField"));
    let form = form("app.AddressForm", "app.AddressFormData").with_type(
        group_box("MainBox").with_type(
            public("AddressBox")
                .with_super_class(class("app.AbstractAddressBox"))
                .with_type(string_field("CityField")),
        ),
    );
    let model = model_with(vec![template, form]);
    let data = synthesize(&model, "app.AddressForm");

    assert_eq!(type_names(&data), vec!["AddressBox"]);
    let address = data.find_type("AddressBox").unwrap();
    assert_eq!(address.super_type, Some(class("app.AbstractAddressBoxData")));
    assert_eq!(type_names(address), vec!["City"]);
    assert_eq!(
        address.find_type("City").unwrap().qualified_name,
        "app.AddressFormData$AddressBox$City"
    );

    let template_data = synthesize(&model, "app.AbstractAddressBox");
    assert!(template_data.is_abstract());
    assert_eq!(type_names(&template_data), vec!["Street"]);
}

#[test]
fn use_existing_adds_only_the_accessor() {
    let form = form("app.SharedForm", "app.SharedFormData").with_type(
        group_box("MainBox").with_type(
            string_field("SharedField")
                .with_annotation(form_data(Some("app.CommonData"), Some("USE"), None)),
        ),
    );
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.SharedForm");

    assert!(data.types().is_empty());
    let getter = data.method("getCommonData").unwrap();
    assert_eq!(getter.return_type, Some(class("app.CommonData")));
}

#[test]
fn replacing_field_extends_the_replaced_data() {
    let base = form("app.BaseForm", "app.BaseFormData")
        .with_type(group_box("MainBox").with_type(string_field("NameField")));
    let extension = form("app.ExtForm", "app.ExtFormData")
        .with_super_class(class("app.BaseForm"))
        .with_type(
            public("NameExField")
                .with_super_class(class("app.BaseForm$MainBox$NameField"))
                .with_annotation(Annotation::new("ui.api.Replace")),
        );
    let model = model_with(vec![base, extension]);

    let base_data = synthesize(&model, "app.BaseForm");
    assert_eq!(
        base_data.find_type("Name").unwrap().qualified_name,
        "app.BaseFormData$Name"
    );

    let data = synthesize(&model, "app.ExtForm");
    assert_eq!(data.super_type, Some(class("app.BaseFormData")));
    let name_ex = data.find_type("NameEx").unwrap();
    assert_eq!(name_ex.super_type, Some(class("app.BaseFormData$Name")));
    let annotations: Vec<String> = name_ex.annotations.iter().map(|a| a.to_string()).collect();
    assert_eq!(annotations, vec!["@Replace"]);
}

#[test]
fn only_dto_relevant_annotations_are_copied() {
    let audited = TypeDescriptor::new("app.Audited", Flags::PUBLIC | Flags::INTERFACE)
        .with_annotation(Annotation::new("ui.dto.DtoRelevant"));
    let internal = TypeDescriptor::new("app.Internal", Flags::PUBLIC | Flags::INTERFACE);
    let form = form("app.AuditForm", "app.AuditFormData").with_type(
        string_field("AuditField")
            .with_annotation(Annotation::new("app.Audited").with_element("level", AnnotationValue::int(2)))
            .with_annotation(Annotation::new("app.Internal"))
            .with_annotation(Annotation::new("ui.api.Order").with_element("value", AnnotationValue::int(10))),
    );
    let model = model_with(vec![audited, internal, form]);
    let data = synthesize(&model, "app.AuditForm");

    let copied: Vec<String> = data
        .find_type("Audit")
        .unwrap()
        .annotations
        .iter()
        .map(|a| a.to_string())
        .collect();
    assert_eq!(copied, vec!["@Audited(level = 2)"]);
}

#[test]
fn top_level_requests_must_be_create_with_a_name() {
    let model = model_with(vec![my_form()]);
    let config = MirrorConfig::default();
    let synth = Synthesizer::new(&model, &config);
    let form = model.type_by_name("app.MyForm").unwrap();

    assert_eq!(
        synth.synthesize(form, &InclusionDirective::ignore()),
        Err(SynthError::NotCreate {
            ty: "app.MyForm".to_owned(),
            policy: InclusionPolicy::Ignore,
        })
    );
    assert_eq!(
        synth.synthesize(form, &InclusionDirective::new(InclusionPolicy::Create)),
        Err(SynthError::MissingDerivedType {
            ty: "app.MyForm".to_owned(),
        })
    );
}

struct FieldsIgnored;

impl DirectiveSource for FieldsIgnored {
    fn type_directive(&self, chain: &[&TypeDescriptor]) -> InclusionDirective {
        match chain.first() {
            Some(ty) if ty.name.ends_with("Field") => InclusionDirective::ignore(),
            _ => InclusionDirective::new(InclusionPolicy::Default),
        }
    }

    fn method_directive(&self, _method: &MethodDescriptor) -> InclusionPolicy {
        InclusionPolicy::Default
    }

    fn column_directive(&self, _chain: &[&TypeDescriptor]) -> InclusionPolicy {
        InclusionPolicy::Create
    }
}

#[test]
fn directive_source_can_be_replaced() {
    let model = model_with(vec![my_form()]);
    let config = MirrorConfig::default();
    let synth = Synthesizer::new(&model, &config).with_directives(FieldsIgnored);
    let form = model.type_by_name("app.MyForm").unwrap();

    let data = synth
        .synthesize(form, &InclusionDirective::create("app.PlainData"))
        .unwrap();
    assert_eq!(data.name, "PlainData");
    assert_eq!(data.super_type, Some(class("java.lang.Object")));
    assert_eq!(
        data.counts(),
        Counts {
            fields: 1,
            methods: 1,
            types: 0
        }
    );
}

#[test]
fn property_holder_copies_accessor_annotations() {
    let audited = TypeDescriptor::new("app.Audited", Flags::PUBLIC | Flags::INTERFACE)
        .with_annotation(Annotation::new("ui.dto.DtoRelevant"));
    let form = form("app.LabelForm", "app.LabelFormData")
        .with_method(
            MethodDescriptor::new("getLabel", Flags::PUBLIC, string())
                .with_annotation(Annotation::new(FORM_DATA))
                .with_annotation(
                    Annotation::new("app.Audited").with_element("level", AnnotationValue::int(2)),
                ),
        )
        .with_method(
            MethodDescriptor::new("setLabel", Flags::PUBLIC, primitive(PrimitiveType::Void))
                .with_parameter("value", string())
                .with_annotation(Annotation::new(FORM_DATA)),
        );
    let model = model_with(vec![audited, form]);
    let data = synthesize(&model, "app.LabelForm");

    let copied: Vec<String> = data
        .find_type("LabelProperty")
        .unwrap()
        .annotations
        .iter()
        .map(|a| a.to_string())
        .collect();
    assert_eq!(copied, vec!["@Audited(level = 2)"]);
}

#[test]
fn directive_interfaces_are_qualified_with_their_arguments() {
    let holder = TypeDescriptor::new(
        "app.IHolder",
        Flags::PUBLIC | Flags::INTERFACE | Flags::ABSTRACT,
    );
    let person = public("app.Person");
    let interfaces = AnnotationValue::array(vec![AnnotationValue::type_ref(
        Signature::parse("QIHolder<QPerson;>;").unwrap(),
    )])
    .unwrap();
    let form = public("app.HolderForm")
        .with_super_class(class("ui.AbstractForm"))
        .with_annotation(
            form_data(Some("app.HolderFormData"), Some("CREATE"), None)
                .with_element("interfaces", interfaces),
        );
    let model = model_with(vec![holder, person, form]);
    let data = synthesize(&model, "app.HolderForm");

    assert_eq!(
        data.interfaces,
        vec![Signature::generic("app.IHolder", vec![class("app.Person")])]
    );
}

#[test]
fn bare_suffix_names_are_kept() {
    let form = form("app.BareForm", "app.BareFormData").with_type(string_field("Field"));
    let model = model_with(vec![form]);
    let data = synthesize(&model, "app.BareForm");

    assert_eq!(type_names(&data), vec!["Field"]);
    assert_eq!(method_names(&data), vec!["BareFormData", "getField"]);
}
