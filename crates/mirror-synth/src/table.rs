//! Table containers: row data and the typed row accessors.

use mirror_model::{AnnotationGenerator, Flags, ModelProvider, TypeDescriptor, TypeModel, ValueGenerator};
use mirror_signature::{getter_prefix, PrimitiveType, Signature};

use crate::body::MethodBody;
use crate::capability::Capability;
use crate::directive::InclusionPolicy;
use crate::naming::{capitalize, decapitalize, escape_keyword, form_data_name, row_data_name, simple_name};
use crate::output::{MemberCategory, SortKey, SynthesizedField, SynthesizedMethod, SynthesizedType};
use crate::synth::{add_serialization_members, Synthesizer};

impl<'m, M: TypeModel + ?Sized> Synthesizer<'m, M> {
    pub(crate) fn add_rows(&self, unit: &mut SynthesizedType, container: &TypeDescriptor) {
        match self.find_table(container) {
            Some(table) => self.add_table_bean(unit, container, table),
            None => self.add_row_fallbacks(unit),
        }
    }

    fn is_table(&self, ty: &TypeDescriptor) -> bool {
        self.resolver
            .is_instance_of(ty, Capability::Table.marker(&self.config.api))
    }

    /// The table declared in `container`, or else in the nearest super class declaring one.
    fn find_table<'a>(&'a self, container: &'a TypeDescriptor) -> Option<&'a TypeDescriptor> {
        for owner in self.chain(container) {
            let mut tables = owner
                .types
                .iter()
                .filter(|t| t.flags.is_public() && self.is_table(t));
            if let Some(table) = tables.next() {
                if tables.next().is_some() {
                    tracing::warn!(
                        target: "mirror.synth",
                        container = %owner.name,
                        table = %table.name,
                        "more than one table declared; using the first"
                    );
                }
                return Some(table);
            }
        }
        None
    }

    fn row_base(&self) -> Signature {
        Signature::class(self.config.data.table_row_data.clone())
    }

    fn override_annotation(&self) -> AnnotationGenerator {
        AnnotationGenerator::new(Signature::class(self.config.annotations.override_.clone()))
    }

    fn add_table_bean(&self, unit: &mut SynthesizedType, container: &TypeDescriptor, table: &TypeDescriptor) {
        let row_name = row_data_name(&unit.name);
        let row_qualified = format!("{}${row_name}", unit.qualified_name);
        let is_abstract = table.is_abstract() || container.is_abstract();
        let row = self.build_row_data(row_name, row_qualified, table, self.row_data_super(table), is_abstract);
        let row_sig = row.signature();
        let rows_sig = Signature::array(row_sig.clone(), 1);
        unit.add_type(row);

        let int = Signature::primitive(PrimitiveType::Int);
        let accessor = |name: &str, return_type: Signature| {
            SynthesizedMethod::new(MemberCategory::OverrideMethod, name, Flags::PUBLIC, Some(return_type))
        };

        unit.add_method(
            accessor("addRow", row_sig.clone())
                .with_annotation(self.override_annotation())
                .with_body(MethodBody::CastSuperCall {
                    cast: row_sig.clone(),
                    method: "addRow".to_owned(),
                    args: Vec::new(),
                }),
        );
        unit.add_method(
            accessor("addRow", row_sig.clone())
                .with_parameter("rowState", int.clone())
                .with_annotation(self.override_annotation())
                .with_body(MethodBody::CastSuperCall {
                    cast: row_sig.clone(),
                    method: "addRow".to_owned(),
                    args: vec!["rowState".to_owned()],
                }),
        );

        let create_row = accessor("createRow", row_sig.clone()).with_annotation(self.override_annotation());
        let create_row = if is_abstract {
            SynthesizedMethod {
                flags: Flags::PUBLIC | Flags::ABSTRACT,
                ..create_row
            }
        } else {
            create_row.with_body(MethodBody::Instantiate(row_sig.clone()))
        };
        unit.add_method(create_row);

        unit.add_method(
            accessor("getRowType", self.row_type_signature())
                .with_annotation(self.override_annotation())
                .with_body(MethodBody::ClassLiteral(row_sig.clone())),
        );
        unit.add_method(
            accessor("getRows", rows_sig.clone())
                .with_annotation(self.override_annotation())
                .with_body(MethodBody::CastSuperCall {
                    cast: rows_sig.clone(),
                    method: "getRows".to_owned(),
                    args: Vec::new(),
                }),
        );
        unit.add_method(
            accessor("rowAt", row_sig.clone())
                .with_parameter("index", int)
                .with_annotation(self.override_annotation())
                .with_body(MethodBody::CastSuperCall {
                    cast: row_sig,
                    method: "rowAt".to_owned(),
                    args: vec!["index".to_owned()],
                }),
        );
        unit.add_method(
            accessor("setRows", Signature::primitive(PrimitiveType::Void))
                .with_parameter("rows", rows_sig)
                .with_body(MethodBody::SuperCall {
                    method: "setRows".to_owned(),
                    args: vec!["rows".to_owned()],
                }),
        );
    }

    /// `Class<? extends AbstractTableRowData>`
    fn row_type_signature(&self) -> Signature {
        Signature::generic(
            "java.lang.Class",
            vec![Signature::wildcard_extends(self.row_base())],
        )
    }

    /// Containers without a table still implement the abstract row factory.
    fn add_row_fallbacks(&self, unit: &mut SynthesizedType) {
        let base = self.row_base();
        unit.add_method(
            SynthesizedMethod::new(MemberCategory::OverrideMethod, "createRow", Flags::PUBLIC, Some(base.clone()))
                .with_annotation(self.override_annotation())
                .with_body(MethodBody::AnonymousInstance(base.clone())),
        );
        unit.add_method(
            SynthesizedMethod::new(
                MemberCategory::OverrideMethod,
                "getRowType",
                Flags::PUBLIC,
                Some(self.row_type_signature()),
            )
            .with_annotation(self.override_annotation())
            .with_body(MethodBody::ClassLiteral(base)),
        );
    }

    /// Row data of the super table when it has a derived counterpart, else the configured base.
    fn row_data_super(&self, table: &TypeDescriptor) -> Signature {
        let inherited = self
            .resolver
            .super_class_of(table)
            .filter(|super_table| self.is_table(super_table))
            .and_then(|super_table| self.row_data_of(super_table));
        match inherited {
            Some(row) => Signature::class(row),
            None => self.row_base(),
        }
    }

    /// Qualified name of the row data synthesized for `table`.
    fn row_data_of(&self, table: &TypeDescriptor) -> Option<String> {
        let owner = self.declaring_type_of(table)?;
        let data = self.derived_type_of(owner)?;
        let row = row_data_name(simple_name(&data));
        Some(format!("{data}${row}"))
    }

    fn build_row_data(
        &self,
        name: String,
        qualified: String,
        columns_owner: &TypeDescriptor,
        super_type: Signature,
        is_abstract: bool,
    ) -> SynthesizedType {
        let mut flags = Flags::PUBLIC | Flags::STATIC;
        if is_abstract {
            flags |= Flags::ABSTRACT;
        }
        let mut row = SynthesizedType::new(MemberCategory::RowDataType, name, qualified, flags);
        row.super_type = Some(super_type);
        add_serialization_members(&mut row);

        let column_marker = Capability::Column.marker(&self.config.api);
        for column in columns_owner
            .types
            .iter()
            .filter(|t| t.flags.is_public() && self.resolver.is_instance_of(t, column_marker))
        {
            if self.column_policy(column) == InclusionPolicy::Ignore {
                tracing::debug!(target: "mirror.synth", column = %column.name, "column ignored");
                continue;
            }
            self.add_column(&mut row, column);
        }
        row
    }

    fn column_value_type(&self, column: &TypeDescriptor) -> Signature {
        let api = &self.config.api;
        let value = self
            .resolver
            .resolve_hierarchy(column, &[])
            .get(&api.column)
            .and_then(|bindings| bindings.get_index(api.column_value_ordinal))
            .map(Signature::box_primitive);
        value.unwrap_or_else(|| {
            tracing::warn!(
                target: "mirror.synth",
                column = %column.name,
                "column value type not resolvable; using Object"
            );
            Signature::class(self.config.data.object.clone())
        })
    }

    fn add_column(&self, row: &mut SynthesizedType, column: &TypeDescriptor) {
        let column_name = form_data_name(column.simple_name());
        let bean = decapitalize(column_name);
        let constant = escape_keyword(&bean);
        let member = format!("m_{bean}");
        let value_type = self.column_value_type(column);
        let upper = capitalize(column_name);

        row.add_field(SynthesizedField {
            key: SortKey::new(MemberCategory::ColumnConstant, constant.clone()),
            name: constant,
            flags: Flags::PUBLIC | Flags::STATIC | Flags::FINAL,
            signature: Signature::class("java.lang.String"),
            initializer: Some(ValueGenerator::Str(bean)),
        });
        row.add_field(SynthesizedField {
            key: SortKey::new(MemberCategory::MemberField, member.clone()),
            name: member.clone(),
            flags: Flags::PRIVATE,
            signature: value_type.clone(),
            initializer: None,
        });
        row.add_method(
            SynthesizedMethod::new(
                MemberCategory::RowAccessor,
                format!("{}{upper}", getter_prefix(&value_type)),
                Flags::PUBLIC,
                Some(value_type.clone()),
            )
            .with_body(MethodBody::ReturnField(member.clone())),
        );
        let argument = format!("new{upper}");
        row.add_method(
            SynthesizedMethod::new(
                MemberCategory::RowAccessor,
                format!("set{upper}"),
                Flags::PUBLIC,
                Some(Signature::primitive(PrimitiveType::Void)),
            )
            .with_parameter(argument.clone(), value_type)
            .with_body(MethodBody::AssignField {
                field: member,
                value: argument,
            }),
        );
    }

    /// Row data for a table extension, pointing at the row data it extends.
    pub(crate) fn add_table_extension(&self, unit: &mut SynthesizedType, extension: &TypeDescriptor) {
        let row_name = row_data_name(extension.simple_name());
        if unit.find_type(&row_name).is_some() {
            return;
        }
        let qualified = format!("{}${row_name}", unit.qualified_name);
        let mut row = self.build_row_data(row_name, qualified, extension, self.row_base(), extension.is_abstract());

        match self.extended_row_data(extension) {
            Some(extended) => row.annotations.push(
                AnnotationGenerator::new(Signature::class(self.config.annotations.extends.clone()))
                    .with_element("value", ValueGenerator::TypeRef(Signature::class(extended))),
            ),
            None => tracing::warn!(
                target: "mirror.synth",
                extension = %extension.name,
                "extended table has no row data"
            ),
        }
        unit.add_type(row);
    }

    fn extended_row_data(&self, extension: &TypeDescriptor) -> Option<String> {
        let api = &self.config.api;
        let hierarchy = self.resolver.resolve_hierarchy(extension, &[]);
        let owner = hierarchy
            .get(&api.table_extension)?
            .get_index(api.table_extension_owner_ordinal)?;
        let table = self.model().type_by_name(owner.qualified_name()?)?;
        self.row_data_of(table)
    }
}
